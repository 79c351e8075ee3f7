use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use serde::{Deserialize, Serialize};

use crate::{errors, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub requester_id: i64,
    pub description: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Requester }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Requester => Entity::belongs_to(user::Entity)
                .from(Column::RequesterId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(db: &C, requester_id: i64, description: &str, created_at: DateTime) -> Result<Model, errors::ModelError> {
    if description.trim().is_empty() {
        return Err(errors::ModelError::Validation("description required".into()));
    }
    let am = ActiveModel {
        requester_id: Set(requester_id),
        description: Set(description.to_string()),
        created_at: Set(created_at),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}
