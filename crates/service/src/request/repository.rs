use async_trait::async_trait;

use super::domain::{Request, RequestDraft};
use crate::errors::ServiceError;

#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn create(&self, draft: &RequestDraft) -> Result<Request, ServiceError>;
    async fn find(&self, id: i64) -> Result<Option<Request>, ServiceError>;
    /// The user's own requests, newest first.
    async fn list_by_requester(&self, requester_id: i64) -> Result<Vec<Request>, ServiceError>;
    /// Everybody else's requests, newest first.
    async fn list_excluding_requester(&self, requester_id: i64) -> Result<Vec<Request>, ServiceError>;
}
