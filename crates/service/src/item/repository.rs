use async_trait::async_trait;

use super::domain::{Comment, CommentDraft, Item, ItemDraft};
use crate::errors::ServiceError;

#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn create(&self, draft: &ItemDraft) -> Result<Item, ServiceError>;
    async fn find(&self, id: i64) -> Result<Option<Item>, ServiceError>;
    async fn update(&self, item: &Item) -> Result<Item, ServiceError>;
    async fn delete(&self, id: i64) -> Result<bool, ServiceError>;
    /// Owner's items ordered by id.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Item>, ServiceError>;
    /// Available items whose name or description contains `text`, ignoring case.
    async fn search_available(&self, text: &str) -> Result<Vec<Item>, ServiceError>;
    /// Items created in answer to any of the given requests.
    async fn list_by_requests(&self, request_ids: &[i64]) -> Result<Vec<Item>, ServiceError>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, draft: &CommentDraft) -> Result<Comment, ServiceError>;
    /// Comments of the given items, oldest first.
    async fn list_by_items(&self, item_ids: &[i64]) -> Result<Vec<Comment>, ServiceError>;
}
