use std::{collections::HashMap, sync::Arc};

use tracing::{info, instrument};

use super::domain::{Answer, NewRequest, Request, RequestDraft, RequestWithAnswers};
use super::repository::RequestRepository;
use crate::errors::ServiceError;
use crate::item::repository::ItemRepository;
use crate::user::repository::UserRepository;

pub struct RequestService {
    requests: Arc<dyn RequestRepository>,
    items: Arc<dyn ItemRepository>,
    users: Arc<dyn UserRepository>,
}

impl RequestService {
    pub fn new(
        requests: Arc<dyn RequestRepository>,
        items: Arc<dyn ItemRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { requests, items, users }
    }

    async fn ensure_user(&self, id: i64) -> Result<(), ServiceError> {
        self.users.find(id).await?.ok_or_else(|| ServiceError::not_found("User", id))?;
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, requester_id: i64, input: NewRequest) -> Result<Request, ServiceError> {
        if input.description.trim().is_empty() {
            return Err(ServiceError::validation("description must not be blank"));
        }
        self.ensure_user(requester_id).await?;
        let draft = RequestDraft { requester_id, description: input.description, created: crate::now() };
        let request = self.requests.create(&draft).await?;
        info!(request_id = request.id, requester_id, "request_created");
        Ok(request)
    }

    pub async fn list_own(&self, requester_id: i64) -> Result<Vec<RequestWithAnswers>, ServiceError> {
        self.ensure_user(requester_id).await?;
        let own = self.requests.list_by_requester(requester_id).await?;
        self.with_answers(own).await
    }

    pub async fn list_others(&self, requester_id: i64) -> Result<Vec<Request>, ServiceError> {
        self.ensure_user(requester_id).await?;
        self.requests.list_excluding_requester(requester_id).await
    }

    pub async fn get(&self, request_id: i64) -> Result<RequestWithAnswers, ServiceError> {
        let request = self
            .requests
            .find(request_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Request", request_id))?;
        let mut found = self.with_answers(vec![request]).await?;
        found.pop().ok_or_else(|| ServiceError::not_found("Request", request_id))
    }

    async fn with_answers(&self, requests: Vec<Request>) -> Result<Vec<RequestWithAnswers>, ServiceError> {
        let ids: Vec<i64> = requests.iter().map(|r| r.id).collect();
        let mut answers: HashMap<i64, Vec<Answer>> = HashMap::new();
        for item in self.items.list_by_requests(&ids).await? {
            if let Some(rid) = item.request_id {
                answers.entry(rid).or_default().push(Answer::from(&item));
            }
        }
        Ok(requests
            .into_iter()
            .map(|request| {
                let items = answers.remove(&request.id).unwrap_or_default();
                RequestWithAnswers { request, items }
            })
            .collect())
    }
}
