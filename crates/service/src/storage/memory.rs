use std::{collections::{BTreeMap, HashSet}, sync::Arc};

use async_trait::async_trait;
use common::BookingStatus;
use tokio::sync::RwLock;

use crate::booking::{domain::{Booking, BookingDraft}, repository::BookingRepository};
use crate::errors::ServiceError;
use crate::item::{
    domain::{Comment, CommentDraft, Item, ItemDraft},
    repository::{CommentRepository, ItemRepository},
};
use crate::request::{domain::{Request, RequestDraft}, repository::RequestRepository};
use crate::user::{domain::{NewUser, User}, repository::UserRepository};

/// Rows keyed by id; ids are never reused.
struct Table<V> {
    rows: BTreeMap<i64, V>,
    last_id: i64,
}

impl<V> Default for Table<V> {
    fn default() -> Self { Self { rows: BTreeMap::new(), last_id: 0 } }
}

impl<V: Clone> Table<V> {
    fn insert_with(&mut self, build: impl FnOnce(i64) -> V) -> V {
        self.last_id += 1;
        let row = build(self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }
}

#[derive(Clone)]
struct StoredComment {
    id: i64,
    item_id: i64,
    author_id: i64,
    text: String,
    created: chrono::NaiveDateTime,
}

#[derive(Default)]
struct Tables {
    users: Table<User>,
    items: Table<Item>,
    bookings: Table<Booking>,
    requests: Table<Request>,
    comments: Table<StoredComment>,
}

impl Tables {
    fn comment(&self, c: &StoredComment) -> Comment {
        let author_name = self.users.rows.get(&c.author_id).map(|u| u.name.clone()).unwrap_or_default();
        Comment { id: c.id, item_id: c.item_id, author_id: c.author_id, author_name, text: c.text.clone(), created: c.created }
    }
}

/// In-process storage: every table lives in one map set behind a lock.
/// References are kept consistent on delete the way the schema's cascades do.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

fn newest_first(mut v: Vec<Request>) -> Vec<Request> {
    v.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
    v
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, input: &NewUser) -> Result<User, ServiceError> {
        let mut t = self.inner.write().await;
        if t.users.rows.values().any(|u| u.email == input.email) {
            return Err(ServiceError::Conflict(format!("Email {} is already in use", input.email)));
        }
        Ok(t.users.insert_with(|id| User { id, name: input.name.clone(), email: input.email.clone() }))
    }

    async fn find(&self, id: i64) -> Result<Option<User>, ServiceError> {
        Ok(self.inner.read().await.users.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.inner.read().await.users.rows.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.inner.read().await.users.rows.values().cloned().collect())
    }

    async fn update(&self, user: &User) -> Result<User, ServiceError> {
        let mut t = self.inner.write().await;
        if t.users.rows.values().any(|u| u.email == user.email && u.id != user.id) {
            return Err(ServiceError::Conflict(format!("Email {} is already in use", user.email)));
        }
        let row = t.users.rows.get_mut(&user.id).ok_or_else(|| ServiceError::not_found("User", user.id))?;
        *row = user.clone();
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let mut t = self.inner.write().await;
        if t.users.rows.remove(&id).is_none() {
            return Ok(false);
        }
        let owned: HashSet<i64> = t.items.rows.values().filter(|i| i.owner_id == id).map(|i| i.id).collect();
        let asked: HashSet<i64> = t.requests.rows.values().filter(|r| r.requester_id == id).map(|r| r.id).collect();
        t.bookings.rows.retain(|_, b| b.booker_id != id && !owned.contains(&b.item_id));
        t.comments.rows.retain(|_, c| c.author_id != id && !owned.contains(&c.item_id));
        t.items.rows.retain(|_, i| i.owner_id != id);
        t.requests.rows.retain(|_, r| r.requester_id != id);
        for item in t.items.rows.values_mut() {
            if item.request_id.is_some_and(|r| asked.contains(&r)) {
                item.request_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn create(&self, draft: &ItemDraft) -> Result<Item, ServiceError> {
        let mut t = self.inner.write().await;
        Ok(t.items.insert_with(|id| Item {
            id,
            owner_id: draft.owner_id,
            request_id: draft.request_id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            available: draft.available,
        }))
    }

    async fn find(&self, id: i64) -> Result<Option<Item>, ServiceError> {
        Ok(self.inner.read().await.items.rows.get(&id).cloned())
    }

    async fn update(&self, item: &Item) -> Result<Item, ServiceError> {
        let mut t = self.inner.write().await;
        let row = t.items.rows.get_mut(&item.id).ok_or_else(|| ServiceError::not_found("Item", item.id))?;
        *row = item.clone();
        Ok(item.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let mut t = self.inner.write().await;
        if t.items.rows.remove(&id).is_none() {
            return Ok(false);
        }
        t.bookings.rows.retain(|_, b| b.item_id != id);
        t.comments.rows.retain(|_, c| c.item_id != id);
        Ok(true)
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Item>, ServiceError> {
        let t = self.inner.read().await;
        Ok(t.items.rows.values().filter(|i| i.owner_id == owner_id).cloned().collect())
    }

    async fn search_available(&self, text: &str) -> Result<Vec<Item>, ServiceError> {
        let needle = text.to_lowercase();
        let t = self.inner.read().await;
        Ok(t.items
            .rows
            .values()
            .filter(|i| i.available)
            .filter(|i| i.name.to_lowercase().contains(&needle) || i.description.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn list_by_requests(&self, request_ids: &[i64]) -> Result<Vec<Item>, ServiceError> {
        let t = self.inner.read().await;
        Ok(t.items
            .rows
            .values()
            .filter(|i| i.request_id.is_some_and(|r| request_ids.contains(&r)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create(&self, draft: &CommentDraft) -> Result<Comment, ServiceError> {
        let mut t = self.inner.write().await;
        let stored = t.comments.insert_with(|id| StoredComment {
            id,
            item_id: draft.item_id,
            author_id: draft.author_id,
            text: draft.text.clone(),
            created: draft.created,
        });
        Ok(t.comment(&stored))
    }

    async fn list_by_items(&self, item_ids: &[i64]) -> Result<Vec<Comment>, ServiceError> {
        let t = self.inner.read().await;
        let mut found: Vec<Comment> = t
            .comments
            .rows
            .values()
            .filter(|c| item_ids.contains(&c.item_id))
            .map(|c| t.comment(c))
            .collect();
        found.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(found)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create(&self, draft: &BookingDraft) -> Result<Booking, ServiceError> {
        let mut t = self.inner.write().await;
        Ok(t.bookings.insert_with(|id| Booking {
            id,
            booker_id: draft.booker_id,
            item_id: draft.item_id,
            start: draft.start,
            end: draft.end,
            status: draft.status,
        }))
    }

    async fn find(&self, id: i64) -> Result<Option<Booking>, ServiceError> {
        Ok(self.inner.read().await.bookings.rows.get(&id).cloned())
    }

    async fn set_status(&self, id: i64, status: BookingStatus) -> Result<Booking, ServiceError> {
        let mut t = self.inner.write().await;
        let row = t.bookings.rows.get_mut(&id).ok_or_else(|| ServiceError::not_found("Booking", id))?;
        row.status = status;
        Ok(row.clone())
    }

    async fn list_by_booker(&self, booker_id: i64) -> Result<Vec<Booking>, ServiceError> {
        let t = self.inner.read().await;
        Ok(t.bookings.rows.values().filter(|b| b.booker_id == booker_id).cloned().collect())
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Booking>, ServiceError> {
        let t = self.inner.read().await;
        let owned: HashSet<i64> = t.items.rows.values().filter(|i| i.owner_id == owner_id).map(|i| i.id).collect();
        Ok(t.bookings.rows.values().filter(|b| owned.contains(&b.item_id)).cloned().collect())
    }

    async fn list_by_items(&self, item_ids: &[i64]) -> Result<Vec<Booking>, ServiceError> {
        let t = self.inner.read().await;
        Ok(t.bookings.rows.values().filter(|b| item_ids.contains(&b.item_id)).cloned().collect())
    }
}

#[async_trait]
impl RequestRepository for MemoryStore {
    async fn create(&self, draft: &RequestDraft) -> Result<Request, ServiceError> {
        let mut t = self.inner.write().await;
        Ok(t.requests.insert_with(|id| Request {
            id,
            requester_id: draft.requester_id,
            description: draft.description.clone(),
            created: draft.created,
        }))
    }

    async fn find(&self, id: i64) -> Result<Option<Request>, ServiceError> {
        Ok(self.inner.read().await.requests.rows.get(&id).cloned())
    }

    async fn list_by_requester(&self, requester_id: i64) -> Result<Vec<Request>, ServiceError> {
        let t = self.inner.read().await;
        Ok(newest_first(t.requests.rows.values().filter(|r| r.requester_id == requester_id).cloned().collect()))
    }

    async fn list_excluding_requester(&self, requester_id: i64) -> Result<Vec<Request>, ServiceError> {
        let t = self.inner.read().await;
        Ok(newest_first(t.requests.rows.values().filter(|r| r.requester_id != requester_id).cloned().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_not_reused() {
        let store = MemoryStore::new();
        let a = UserRepository::create(&store, &NewUser { name: "A".into(), email: "a@x.io".into() }).await.unwrap();
        UserRepository::delete(&store, a.id).await.unwrap();
        let b = UserRepository::create(&store, &NewUser { name: "B".into(), email: "b@x.io".into() }).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn deleting_a_user_cleans_up_references() {
        let store = MemoryStore::new();
        let owner = UserRepository::create(&store, &NewUser { name: "O".into(), email: "o@x.io".into() }).await.unwrap();
        let asker = UserRepository::create(&store, &NewUser { name: "A".into(), email: "a@x.io".into() }).await.unwrap();
        let now = crate::now();
        let req = RequestRepository::create(&store, &RequestDraft { requester_id: asker.id, description: "tent".into(), created: now })
            .await
            .unwrap();
        let item = ItemRepository::create(
            &store,
            &ItemDraft { owner_id: owner.id, request_id: Some(req.id), name: "Tent".into(), description: "big".into(), available: true },
        )
        .await
        .unwrap();
        BookingRepository::create(
            &store,
            &BookingDraft { booker_id: asker.id, item_id: item.id, start: now, end: now + chrono::Duration::hours(1), status: BookingStatus::Waiting },
        )
        .await
        .unwrap();

        assert!(UserRepository::delete(&store, asker.id).await.unwrap());
        let kept = ItemRepository::find(&store, item.id).await.unwrap().unwrap();
        assert_eq!(kept.request_id, None);
        assert!(BookingRepository::list_by_items(&store, &[item.id]).await.unwrap().is_empty());
        assert!(!UserRepository::delete(&store, asker.id).await.unwrap());
    }
}
