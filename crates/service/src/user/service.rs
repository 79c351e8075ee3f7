use std::sync::Arc;

use models::user::{validate_email, validate_name};
use tracing::{info, debug, instrument};

use super::domain::{NewUser, User, UserPatch};
use super::repository::UserRepository;
use crate::errors::ServiceError;

pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self { Self { repo } }

    /// Register a user; the email must not be taken.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, input: NewUser) -> Result<User, ServiceError> {
        validate_name(&input.name)?;
        validate_email(&input.email)?;
        if let Some(existing) = self.repo.find_by_email(&input.email).await? {
            debug!(user_id = existing.id, "email taken");
            return Err(ServiceError::Conflict(format!("Email {} is already in use", input.email)));
        }
        let user = self.repo.create(&input).await?;
        info!(user_id = user.id, "user_created");
        Ok(user)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i64, patch: UserPatch) -> Result<User, ServiceError> {
        let mut user = self.get(id).await?;
        if let Some(name) = patch.name {
            validate_name(&name)?;
            user.name = name;
        }
        if let Some(email) = patch.email {
            validate_email(&email)?;
            if email != user.email {
                if let Some(other) = self.repo.find_by_email(&email).await? {
                    if other.id != id {
                        return Err(ServiceError::Conflict(format!("Email {} is already in use", email)));
                    }
                }
            }
            user.email = email;
        }
        let updated = self.repo.update(&user).await?;
        info!(user_id = id, "user_updated");
        Ok(updated)
    }

    pub async fn get(&self, id: i64) -> Result<User, ServiceError> {
        self.repo.find(id).await?.ok_or_else(|| ServiceError::not_found("User", id))
    }

    pub async fn list(&self) -> Result<Vec<User>, ServiceError> {
        self.repo.list().await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("User", id));
        }
        info!(user_id = id, "user_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::AppServices;
    use crate::errors::ServiceError;
    use crate::user::domain::{NewUser, UserPatch};

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser { name: name.into(), email: email.into() }
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let svc = AppServices::in_memory();
        svc.users.create(new_user("Ann", "ann@example.com")).await.unwrap();
        let err = svc.users.create(new_user("Bob", "ann@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn invalid_input_is_rejected() {
        let svc = AppServices::in_memory();
        let err = svc.users.create(new_user("", "a@b.c")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
        assert!(svc.users.create(new_user("Ann", "not-an-email")).await.is_err());
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let svc = AppServices::in_memory();
        let ann = svc.users.create(new_user("Ann", "ann@example.com")).await.unwrap();
        let bob = svc.users.create(new_user("Bob", "bob@example.com")).await.unwrap();

        let renamed = svc.users.update(ann.id, UserPatch { name: Some("Anna".into()), email: None }).await.unwrap();
        assert_eq!(renamed.email, "ann@example.com");
        assert_eq!(renamed.name, "Anna");

        // keeping your own email is fine, taking somebody else's is not
        svc.users.update(ann.id, UserPatch { name: None, email: Some("ann@example.com".into()) }).await.unwrap();
        let err = svc.users.update(ann.id, UserPatch { name: None, email: Some(bob.email.clone()) }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let svc = AppServices::in_memory();
        assert!(matches!(svc.users.get(99).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.users.delete(99).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.users.update(99, UserPatch::default()).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_and_delete() {
        let svc = AppServices::in_memory();
        let ann = svc.users.create(new_user("Ann", "ann@example.com")).await.unwrap();
        svc.users.create(new_user("Bob", "bob@example.com")).await.unwrap();
        assert_eq!(svc.users.list().await.unwrap().len(), 2);
        svc.users.delete(ann.id).await.unwrap();
        let left: Vec<_> = svc.users.list().await.unwrap().into_iter().map(|u| u.name).collect();
        assert_eq!(left, vec!["Bob".to_string()]);
    }
}
