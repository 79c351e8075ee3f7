use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDateTime;
use common::{BookingState, BookingStatus};
use tracing::{info, instrument};

use super::domain::{Booking, BookingDraft, BookingView, NewBooking};
use super::repository::BookingRepository;
use super::state;
use crate::errors::ServiceError;
use crate::item::{domain::Item, repository::ItemRepository};
use crate::user::{domain::User, repository::UserRepository};

pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    items: Arc<dyn ItemRepository>,
    users: Arc<dyn UserRepository>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        items: Arc<dyn ItemRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { bookings, items, users }
    }

    async fn user(&self, id: i64) -> Result<User, ServiceError> {
        self.users.find(id).await?.ok_or_else(|| ServiceError::not_found("User", id))
    }

    async fn item(&self, id: i64) -> Result<Item, ServiceError> {
        self.items.find(id).await?.ok_or_else(|| ServiceError::not_found("Item", id))
    }

    async fn booking(&self, id: i64) -> Result<Booking, ServiceError> {
        self.bookings.find(id).await?.ok_or_else(|| ServiceError::not_found("Booking", id))
    }

    /// Ask to rent an item. The booking starts out WAITING for the owner.
    #[instrument(skip(self, input))]
    pub async fn create(&self, booker_id: i64, input: NewBooking) -> Result<BookingView, ServiceError> {
        let item_id = input.item_id.ok_or_else(|| ServiceError::validation("itemId is required"))?;
        let start = input.start.ok_or_else(|| ServiceError::validation("start is required"))?;
        let end = input.end.ok_or_else(|| ServiceError::validation("end is required"))?;
        if end <= start {
            return Err(ServiceError::validation("Booking end must be after its start"));
        }
        let item = self.item(item_id).await?;
        let booker = self.user(booker_id).await?;
        if item.owner_id == booker_id {
            return Err(ServiceError::NotFound(format!("Item {} cannot be booked by its owner", item_id)));
        }
        if !item.available {
            return Err(ServiceError::Validation(format!("Item {} is not available", item_id)));
        }
        let draft = BookingDraft { booker_id, item_id, start, end, status: BookingStatus::Waiting };
        let booking = self.bookings.create(&draft).await?;
        info!(booking_id = booking.id, booker_id, item_id, "booking_created");
        Ok(BookingView::new(&booking, booker, &item, crate::now()))
    }

    /// Owner's answer to a booking. A later call overrides an earlier decision.
    #[instrument(skip(self))]
    pub async fn approve(&self, owner_id: i64, booking_id: i64, approved: bool) -> Result<BookingView, ServiceError> {
        let booking = self.booking(booking_id).await?;
        let item = self.item(booking.item_id).await?;
        if item.owner_id != owner_id {
            return Err(ServiceError::Validation(format!("User {} is not the owner of item {}", owner_id, item.id)));
        }
        let status = if approved { BookingStatus::Approved } else { BookingStatus::Rejected };
        let booking = self.bookings.set_status(booking_id, status).await?;
        info!(booking_id, status = %status, "booking_decided");
        let booker = self.user(booking.booker_id).await?;
        Ok(BookingView::new(&booking, booker, &item, crate::now()))
    }

    /// Visible to the booker and to the item owner only.
    pub async fn get(&self, user_id: i64, booking_id: i64) -> Result<BookingView, ServiceError> {
        let booking = self.booking(booking_id).await?;
        let item = self.item(booking.item_id).await?;
        if booking.booker_id != user_id && item.owner_id != user_id {
            return Err(ServiceError::Validation(format!("User {} is neither booker nor owner of booking {}", user_id, booking_id)));
        }
        let booker = self.user(booking.booker_id).await?;
        Ok(BookingView::new(&booking, booker, &item, crate::now()))
    }

    #[instrument(skip(self))]
    pub async fn list_by_booker(&self, booker_id: i64, wanted: BookingState) -> Result<Vec<BookingView>, ServiceError> {
        self.user(booker_id).await?;
        let now = crate::now();
        let picked = state::select(self.bookings.list_by_booker(booker_id).await?, wanted, now);
        self.views(picked, now).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_owner(&self, owner_id: i64, wanted: BookingState) -> Result<Vec<BookingView>, ServiceError> {
        self.user(owner_id).await?;
        if self.items.list_by_owner(owner_id).await?.is_empty() {
            return Err(ServiceError::NotFound("The user does not have the items".into()));
        }
        let now = crate::now();
        let picked = state::select(self.bookings.list_by_owner(owner_id).await?, wanted, now);
        self.views(picked, now).await
    }

    async fn views(&self, bookings: Vec<Booking>, now: NaiveDateTime) -> Result<Vec<BookingView>, ServiceError> {
        let mut users: HashMap<i64, User> = HashMap::new();
        let mut items: HashMap<i64, Item> = HashMap::new();
        let mut out = Vec::with_capacity(bookings.len());
        for b in &bookings {
            if !users.contains_key(&b.booker_id) {
                users.insert(b.booker_id, self.user(b.booker_id).await?);
            }
            if !items.contains_key(&b.item_id) {
                items.insert(b.item_id, self.item(b.item_id).await?);
            }
            if let (Some(booker), Some(item)) = (users.get(&b.booker_id), items.get(&b.item_id)) {
                out.push(BookingView::new(b, booker.clone(), item, now));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use common::{BookingState, BookingStatus};

    use crate::booking::domain::NewBooking;
    use crate::errors::ServiceError;
    use crate::item::domain::NewItem;
    use crate::user::domain::NewUser;
    use crate::AppServices;

    struct World {
        svc: AppServices,
        owner: i64,
        booker: i64,
        item: i64,
    }

    async fn world() -> World {
        let svc = AppServices::in_memory();
        let owner = svc.users.create(NewUser { name: "Owner".into(), email: "owner@example.com".into() }).await.unwrap().id;
        let booker = svc.users.create(NewUser { name: "Booker".into(), email: "booker@example.com".into() }).await.unwrap().id;
        let item = svc
            .items
            .create(owner, NewItem { name: "Drill".into(), description: "cordless".into(), available: Some(true), request_id: None })
            .await
            .unwrap()
            .id;
        World { svc, owner, booker, item }
    }

    fn period(from_days: i64, to_days: i64) -> (Option<chrono::NaiveDateTime>, Option<chrono::NaiveDateTime>) {
        let n = crate::now();
        (Some(n + Duration::days(from_days)), Some(n + Duration::days(to_days)))
    }

    fn new_booking(item: i64, from_days: i64, to_days: i64) -> NewBooking {
        let (start, end) = period(from_days, to_days);
        NewBooking { item_id: Some(item), start, end }
    }

    #[tokio::test]
    async fn create_starts_waiting() {
        let w = world().await;
        let b = w.svc.bookings.create(w.booker, new_booking(w.item, 1, 2)).await.unwrap();
        assert_eq!(b.status, BookingStatus::Waiting);
        assert_eq!(b.state, BookingState::Waiting);
        assert_eq!(b.booker.id, w.booker);
        assert_eq!(b.item.id, w.item);
    }

    #[tokio::test]
    async fn create_rejects_bad_requests() {
        let w = world().await;
        let n = crate::now() + Duration::days(1);
        let same = NewBooking { item_id: Some(w.item), start: Some(n), end: Some(n) };
        assert!(matches!(w.svc.bookings.create(w.booker, same).await, Err(ServiceError::Validation(_))));
        assert!(matches!(w.svc.bookings.create(w.booker, new_booking(w.item, 2, 1)).await, Err(ServiceError::Validation(_))));
        assert!(matches!(w.svc.bookings.create(w.booker, new_booking(404, 1, 2)).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(w.svc.bookings.create(404, new_booking(w.item, 1, 2)).await, Err(ServiceError::NotFound(_))));
        // owner cannot book their own item
        assert!(matches!(w.svc.bookings.create(w.owner, new_booking(w.item, 1, 2)).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn unavailable_item_cannot_be_booked() {
        let w = world().await;
        w.svc
            .items
            .update(w.owner, w.item, crate::item::domain::ItemPatch { available: Some(false), ..Default::default() })
            .await
            .unwrap();
        let err = w.svc.bookings.create(w.booker, new_booking(w.item, 1, 2)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn only_owner_decides_and_may_change_the_decision() {
        let w = world().await;
        let b = w.svc.bookings.create(w.booker, new_booking(w.item, 1, 2)).await.unwrap();
        let err = w.svc.bookings.approve(w.booker, b.id, true).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let approved = w.svc.bookings.approve(w.owner, b.id, true).await.unwrap();
        assert_eq!(approved.status, BookingStatus::Approved);
        assert_eq!(approved.state, BookingState::Future);

        let rejected = w.svc.bookings.approve(w.owner, b.id, false).await.unwrap();
        assert_eq!(rejected.status, BookingStatus::Rejected);
        assert_eq!(rejected.state, BookingState::Rejected);
        let reapproved = w.svc.bookings.approve(w.owner, b.id, true).await.unwrap();
        assert_eq!(reapproved.status, BookingStatus::Approved);
        assert!(matches!(w.svc.bookings.approve(w.owner, 999, true).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn get_is_limited_to_booker_and_owner() {
        let w = world().await;
        let stranger = w.svc.users.create(NewUser { name: "S".into(), email: "s@example.com".into() }).await.unwrap().id;
        let b = w.svc.bookings.create(w.booker, new_booking(w.item, 1, 2)).await.unwrap();
        assert_eq!(w.svc.bookings.get(w.booker, b.id).await.unwrap().id, b.id);
        assert_eq!(w.svc.bookings.get(w.owner, b.id).await.unwrap().id, b.id);
        assert!(matches!(w.svc.bookings.get(stranger, b.id).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn lists_filter_by_state() {
        let w = world().await;
        let past = w.svc.bookings.create(w.booker, new_booking(w.item, -5, -4)).await.unwrap();
        let current = w.svc.bookings.create(w.booker, new_booking(w.item, -1, 1)).await.unwrap();
        let future = w.svc.bookings.create(w.booker, new_booking(w.item, 3, 4)).await.unwrap();
        let waiting = w.svc.bookings.create(w.booker, new_booking(w.item, 5, 6)).await.unwrap();
        let rejected = w.svc.bookings.create(w.booker, new_booking(w.item, 7, 8)).await.unwrap();
        for id in [past.id, current.id, future.id] {
            w.svc.bookings.approve(w.owner, id, true).await.unwrap();
        }
        w.svc.bookings.approve(w.owner, rejected.id, false).await.unwrap();

        let ids = |v: Vec<crate::booking::domain::BookingView>| v.into_iter().map(|b| b.id).collect::<Vec<_>>();
        let all = w.svc.bookings.list_by_booker(w.booker, BookingState::All).await.unwrap();
        assert_eq!(ids(all), vec![rejected.id, waiting.id, future.id, current.id, past.id]);
        assert_eq!(ids(w.svc.bookings.list_by_booker(w.booker, BookingState::Past).await.unwrap()), vec![past.id]);
        assert_eq!(ids(w.svc.bookings.list_by_booker(w.booker, BookingState::Current).await.unwrap()), vec![current.id]);
        assert_eq!(ids(w.svc.bookings.list_by_owner(w.owner, BookingState::Future).await.unwrap()), vec![future.id]);
        assert_eq!(ids(w.svc.bookings.list_by_owner(w.owner, BookingState::Waiting).await.unwrap()), vec![waiting.id]);
        assert_eq!(ids(w.svc.bookings.list_by_owner(w.owner, BookingState::Rejected).await.unwrap()), vec![rejected.id]);
        assert_eq!(
            ids(w.svc.bookings.list_by_owner(w.owner, BookingState::Approved).await.unwrap()),
            vec![future.id, current.id, past.id]
        );
    }

    #[tokio::test]
    async fn owner_list_needs_items() {
        let w = world().await;
        assert!(matches!(w.svc.bookings.list_by_owner(w.booker, BookingState::All).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(w.svc.bookings.list_by_booker(404, BookingState::All).await, Err(ServiceError::NotFound(_))));
        assert!(w.svc.bookings.list_by_owner(w.owner, BookingState::All).await.unwrap().is_empty());
    }
}
