use sea_orm::{entity::prelude::*, sea_query::{Expr, Func, LikeExpr}, Condition, Set, ConnectionTrait, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::{errors, request, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner_id: i64,
    pub request_id: Option<i64>,
    pub name: String,
    pub description: String,
    pub available: bool,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Owner, Request }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(user::Entity)
                .from(Column::OwnerId)
                .to(user::Column::Id)
                .into(),
            Relation::Request => Entity::belongs_to(request::Entity)
                .from(Column::RequestId)
                .to(request::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    owner_id: i64,
    request_id: Option<i64>,
    name: &str,
    description: &str,
    available: bool,
) -> Result<Model, errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("item name required".into()));
    }
    if description.trim().is_empty() {
        return Err(errors::ModelError::Validation("item description required".into()));
    }
    let am = ActiveModel {
        owner_id: Set(owner_id),
        request_id: Set(request_id),
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        available: Set(available),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// `text` as a literal `LIKE` operand: the escape character, `%` and `_`
/// lose their wildcard meaning.
pub fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Available items whose name or description contains `text`, ignoring case.
pub async fn search_available<C: ConnectionTrait>(db: &C, text: &str) -> Result<Vec<Model>, errors::ModelError> {
    let pattern = format!("%{}%", escape_like(&text.trim().to_lowercase()));
    let matches_text = Condition::any()
        .add(Expr::expr(Func::lower(Expr::col((Entity, Column::Name)))).like(LikeExpr::new(pattern.clone()).escape('\\')))
        .add(Expr::expr(Func::lower(Expr::col((Entity, Column::Description)))).like(LikeExpr::new(pattern).escape('\\')));
    let found = Entity::find()
        .filter(Column::Available.eq(true))
        .filter(matches_text)
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(found)
}
