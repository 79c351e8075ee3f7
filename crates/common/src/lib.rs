//! Pieces shared by the server and gateway tiers: logging setup, the
//! `X-Sharer-User-Id` identity header, booking state rules and small wire types.

pub mod types;
pub mod utils;
pub mod sharer;
pub mod booking;

pub use sharer::{OptionalSharerUserId, SharerUserId, USER_ID_HEADER};
pub use booking::{BookingState, BookingStatus, UnknownState, UnknownStatus};
