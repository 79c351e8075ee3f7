use async_trait::async_trait;
use common::BookingStatus;

use super::domain::{Booking, BookingDraft};
use crate::errors::ServiceError;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, draft: &BookingDraft) -> Result<Booking, ServiceError>;
    async fn find(&self, id: i64) -> Result<Option<Booking>, ServiceError>;
    async fn set_status(&self, id: i64, status: BookingStatus) -> Result<Booking, ServiceError>;
    async fn list_by_booker(&self, booker_id: i64) -> Result<Vec<Booking>, ServiceError>;
    /// Bookings of every item owned by `owner_id`.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Booking>, ServiceError>;
    async fn list_by_items(&self, item_ids: &[i64]) -> Result<Vec<Booking>, ServiceError>;
}
