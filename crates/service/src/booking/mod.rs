//! Bookings: requests to rent an item for a period, the owner's decision,
//! and lists filtered by the state derived from both.

pub mod domain;
pub mod repository;
pub mod service;
pub mod state;

pub use common::{BookingState, BookingStatus};
pub use service::BookingService;
