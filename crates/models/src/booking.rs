use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use serde::{Deserialize, Serialize};

use crate::{errors, item, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub booker_id: i64,
    pub item_id: i64,
    pub start_date: DateTime,
    pub end_date: DateTime,
    /// WAITING, APPROVED, REJECTED or CANCELED
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Booker, Item }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Booker => Entity::belongs_to(user::Entity)
                .from(Column::BookerId)
                .to(user::Column::Id)
                .into(),
            Relation::Item => Entity::belongs_to(item::Entity)
                .from(Column::ItemId)
                .to(item::Column::Id)
                .into(),
        }
    }
}

impl Related<item::Entity> for Entity {
    fn to() -> RelationDef { Relation::Item.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub const STATUSES: [&str; 4] = ["WAITING", "APPROVED", "REJECTED", "CANCELED"];

pub async fn create<C: ConnectionTrait>(
    db: &C,
    booker_id: i64,
    item_id: i64,
    start_date: DateTime,
    end_date: DateTime,
    status: &str,
) -> Result<Model, errors::ModelError> {
    if !STATUSES.contains(&status) {
        return Err(errors::ModelError::Validation(format!("unknown booking status {status}")));
    }
    if end_date <= start_date {
        return Err(errors::ModelError::Validation("booking must end after it starts".into()));
    }
    let am = ActiveModel {
        booker_id: Set(booker_id),
        item_id: Set(item_id),
        start_date: Set(start_date),
        end_date: Set(end_date),
        status: Set(status.to_string()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}
