use std::{collections::HashMap, sync::Arc};

use common::BookingState;
use tracing::{info, instrument};

use super::domain::{Comment, CommentDraft, Item, ItemDetails, ItemDraft, ItemPatch, NewComment, NewItem};
use super::repository::{CommentRepository, ItemRepository};
use crate::booking::{domain::Booking, repository::BookingRepository, state};
use crate::errors::ServiceError;
use crate::request::repository::RequestRepository;
use crate::user::repository::UserRepository;

pub struct ItemService {
    items: Arc<dyn ItemRepository>,
    comments: Arc<dyn CommentRepository>,
    bookings: Arc<dyn BookingRepository>,
    users: Arc<dyn UserRepository>,
    requests: Arc<dyn RequestRepository>,
}

fn require_text(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{} must not be blank", field)));
    }
    Ok(())
}

impl ItemService {
    pub fn new(
        items: Arc<dyn ItemRepository>,
        comments: Arc<dyn CommentRepository>,
        bookings: Arc<dyn BookingRepository>,
        users: Arc<dyn UserRepository>,
        requests: Arc<dyn RequestRepository>,
    ) -> Self {
        Self { items, comments, bookings, users, requests }
    }

    async fn ensure_user(&self, id: i64) -> Result<(), ServiceError> {
        self.users.find(id).await?.ok_or_else(|| ServiceError::not_found("User", id))?;
        Ok(())
    }

    async fn item(&self, id: i64) -> Result<Item, ServiceError> {
        self.items.find(id).await?.ok_or_else(|| ServiceError::not_found("Item", id))
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, owner_id: i64, input: NewItem) -> Result<Item, ServiceError> {
        require_text("name", &input.name)?;
        require_text("description", &input.description)?;
        let available = input.available.ok_or_else(|| ServiceError::validation("available is required"))?;
        self.ensure_user(owner_id).await?;
        if let Some(request_id) = input.request_id {
            self.requests.find(request_id).await?.ok_or_else(|| ServiceError::not_found("Request", request_id))?;
        }
        let draft = ItemDraft {
            owner_id,
            request_id: input.request_id,
            name: input.name,
            description: input.description,
            available,
        };
        let item = self.items.create(&draft).await?;
        info!(item_id = item.id, owner_id, "item_created");
        Ok(item)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, owner_id: i64, item_id: i64, patch: ItemPatch) -> Result<Item, ServiceError> {
        let mut item = self.item(item_id).await?;
        if item.owner_id != owner_id {
            return Err(ServiceError::NotFound(format!("User {} is not the owner of item {}", owner_id, item_id)));
        }
        if let Some(name) = patch.name {
            require_text("name", &name)?;
            item.name = name;
        }
        if let Some(description) = patch.description {
            require_text("description", &description)?;
            item.description = description;
        }
        if let Some(available) = patch.available {
            item.available = available;
        }
        let item = self.items.update(&item).await?;
        info!(item_id, "item_updated");
        Ok(item)
    }

    pub async fn get(&self, item_id: i64) -> Result<ItemDetails, ServiceError> {
        let item = self.item(item_id).await?;
        let mut details = self.details(vec![item]).await?;
        details.pop().ok_or_else(|| ServiceError::not_found("Item", item_id))
    }

    pub async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<ItemDetails>, ServiceError> {
        self.ensure_user(owner_id).await?;
        let items = self.items.list_by_owner(owner_id).await?;
        self.details(items).await
    }

    /// Blank text finds nothing.
    pub async fn search(&self, text: &str) -> Result<Vec<Item>, ServiceError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.items.search_available(text.trim()).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, owner_id: i64, item_id: i64) -> Result<(), ServiceError> {
        let item = self.item(item_id).await?;
        if item.owner_id != owner_id {
            return Err(ServiceError::NotFound(format!("User {} is not the owner of item {}", owner_id, item_id)));
        }
        self.items.delete(item_id).await?;
        info!(item_id, "item_deleted");
        Ok(())
    }

    /// Only someone who has actually had the item (a current or finished
    /// approved booking) may comment on it.
    #[instrument(skip(self, input))]
    pub async fn add_comment(&self, author_id: i64, item_id: i64, input: NewComment) -> Result<Comment, ServiceError> {
        require_text("text", &input.text)?;
        self.item(item_id).await?;
        self.ensure_user(author_id).await?;
        let now = crate::now();
        let rented = self
            .bookings
            .list_by_items(&[item_id])
            .await?
            .iter()
            .filter(|b| b.booker_id == author_id)
            .any(|b| matches!(b.state(now), BookingState::Current | BookingState::Past));
        if !rented {
            return Err(ServiceError::Validation(format!("User {} has not rented item {}", author_id, item_id)));
        }
        let draft = CommentDraft { item_id, author_id, text: input.text, created: now };
        let comment = self.comments.create(&draft).await?;
        info!(comment_id = comment.id, item_id, author_id, "comment_added");
        Ok(comment)
    }

    async fn details(&self, items: Vec<Item>) -> Result<Vec<ItemDetails>, ServiceError> {
        let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
        let mut comments: HashMap<i64, Vec<Comment>> = HashMap::new();
        for c in self.comments.list_by_items(&ids).await? {
            comments.entry(c.item_id).or_default().push(c);
        }
        let mut bookings: HashMap<i64, Vec<Booking>> = HashMap::new();
        for b in self.bookings.list_by_items(&ids).await? {
            bookings.entry(b.item_id).or_default().push(b);
        }
        let now = crate::now();
        Ok(items
            .into_iter()
            .map(|item| {
                let (last_booking, next_booking) = bookings
                    .get(&item.id)
                    .map(|bs| state::last_and_next(bs, now))
                    .unwrap_or((None, None));
                let comments = comments.remove(&item.id).unwrap_or_default();
                ItemDetails { item, last_booking, next_booking, comments }
            })
            .collect())
    }
}
