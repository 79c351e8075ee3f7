use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub owner_id: i64,
    pub request_id: Option<i64>,
    pub name: String,
    pub description: String,
    pub available: bool,
}

/// Creation payload. `available` is optional on the wire so a missing flag
/// surfaces as a validation error instead of a decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub available: Option<bool>,
    pub request_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

/// Validated item ready to be stored.
#[derive(Debug, Clone)]
pub struct ItemDraft {
    pub owner_id: i64,
    pub request_id: Option<i64>,
    pub name: String,
    pub description: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub item_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub text: String,
    pub created: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewComment {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub item_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created: NaiveDateTime,
}

/// Item as shown on its page and in the owner's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    #[serde(flatten)]
    pub item: Item,
    /// End of the latest approved booking that has already started.
    pub last_booking: Option<NaiveDateTime>,
    /// Start of the nearest approved booking still ahead.
    pub next_booking: Option<NaiveDateTime>,
    pub comments: Vec<Comment>,
}

impl From<models::item::Model> for Item {
    fn from(m: models::item::Model) -> Self {
        Self {
            id: m.id,
            owner_id: m.owner_id,
            request_id: m.request_id,
            name: m.name,
            description: m.description,
            available: m.available,
        }
    }
}
