use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::item::domain::Item;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: i64,
    pub requester_id: i64,
    pub description: String,
    pub created: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewRequest {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct RequestDraft {
    pub requester_id: i64,
    pub description: String,
    pub created: NaiveDateTime,
}

/// An item offered in reply to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub item_id: i64,
    pub owner_id: i64,
    pub name: String,
}

impl From<&Item> for Answer {
    fn from(i: &Item) -> Self {
        Self { item_id: i.id, owner_id: i.owner_id, name: i.name.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestWithAnswers {
    #[serde(flatten)]
    pub request: Request,
    pub items: Vec<Answer>,
}

impl From<models::request::Model> for Request {
    fn from(m: models::request::Model) -> Self {
        Self { id: m.id, requester_id: m.requester_id, description: m.description, created: m.created_at }
    }
}
