use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use serde::{Deserialize, Serialize};

use crate::{errors, item, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub item_id: i64,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Author, Item }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Author => Entity::belongs_to(user::Entity)
                .from(Column::AuthorId)
                .to(user::Column::Id)
                .into(),
            Relation::Item => Entity::belongs_to(item::Entity)
                .from(Column::ItemId)
                .to(item::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::Author.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(db: &C, author_id: i64, item_id: i64, text: &str, created_at: DateTime) -> Result<Model, errors::ModelError> {
    if text.trim().is_empty() {
        return Err(errors::ModelError::Validation("comment text required".into()));
    }
    let am = ActiveModel {
        text: Set(text.to_string()),
        author_id: Set(author_id),
        item_id: Set(item_id),
        created_at: Set(created_at),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}
