use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::booking::{repository::BookingRepository, BookingService};
use crate::item::{repository::{CommentRepository, ItemRepository}, ItemService};
use crate::request::{repository::RequestRepository, RequestService};
use crate::storage::{MemoryStore, SeaOrmStore};
use crate::user::{repository::UserRepository, UserService};

/// The four domain services sharing one storage backend.
#[derive(Clone)]
pub struct AppServices {
    pub users: Arc<UserService>,
    pub items: Arc<ItemService>,
    pub bookings: Arc<BookingService>,
    pub requests: Arc<RequestService>,
}

impl AppServices {
    pub fn from_db(db: DatabaseConnection) -> Self {
        Self::with_store(Arc::new(SeaOrmStore::new(db)))
    }

    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository + ItemRepository + CommentRepository + BookingRepository + RequestRepository + 'static,
    {
        let users: Arc<dyn UserRepository> = store.clone();
        let items: Arc<dyn ItemRepository> = store.clone();
        let comments: Arc<dyn CommentRepository> = store.clone();
        let bookings: Arc<dyn BookingRepository> = store.clone();
        let requests: Arc<dyn RequestRepository> = store;
        Self {
            users: Arc::new(UserService::new(users.clone())),
            items: Arc::new(ItemService::new(items.clone(), comments, bookings.clone(), users.clone(), requests.clone())),
            bookings: Arc::new(BookingService::new(bookings, items.clone(), users.clone())),
            requests: Arc::new(RequestService::new(requests, items, users)),
        }
    }
}
