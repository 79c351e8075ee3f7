use async_trait::async_trait;

use super::domain::{NewUser, User};
use crate::errors::ServiceError;

/// Persistence for users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, input: &NewUser) -> Result<User, ServiceError>;
    async fn find(&self, id: i64) -> Result<Option<User>, ServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError>;
    /// All users ordered by id.
    async fn list(&self) -> Result<Vec<User>, ServiceError>;
    async fn update(&self, user: &User) -> Result<User, ServiceError>;
    /// Removes the user with everything that references it; false when absent.
    async fn delete(&self, id: i64) -> Result<bool, ServiceError>;
}
