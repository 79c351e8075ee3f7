use chrono::NaiveDateTime;
use common::{BookingState, BookingStatus};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;
use crate::item::domain::Item;
use crate::user::domain::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub booker_id: i64,
    pub item_id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
}

impl Booking {
    pub fn state(&self, now: NaiveDateTime) -> BookingState {
        BookingState::derive(self.status, self.start, self.end, now)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub item_id: Option<i64>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub booker_id: i64,
    pub item_id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
}

/// Item fields embedded in a booking response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
}

impl From<&Item> for ItemSummary {
    fn from(i: &Item) -> Self {
        Self {
            id: i.id,
            name: i.name.clone(),
            description: i.description.clone(),
            available: i.available,
            request_id: i.request_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: BookingStatus,
    pub state: BookingState,
    pub booker: User,
    pub item: ItemSummary,
}

impl BookingView {
    pub fn new(booking: &Booking, booker: User, item: &Item, now: NaiveDateTime) -> Self {
        Self {
            id: booking.id,
            start: booking.start,
            end: booking.end,
            status: booking.status,
            state: booking.state(now),
            booker,
            item: ItemSummary::from(item),
        }
    }
}

impl TryFrom<models::booking::Model> for Booking {
    type Error = ServiceError;

    fn try_from(m: models::booking::Model) -> Result<Self, Self::Error> {
        let status = m
            .status
            .parse::<BookingStatus>()
            .map_err(|e| ServiceError::Db(format!("booking {}: {}", m.id, e)))?;
        Ok(Self { id: m.id, booker_id: m.booker_id, item_id: m.item_id, start: m.start_date, end: m.end_date, status })
    }
}
