//! Service layer holding the ShareIt business rules.
//! - Each domain is split into `domain` (records and inputs), `repository`
//!   (storage trait) and `service` (rules).
//! - Storage lives in `storage`: SeaORM over `models`, or in-process maps.
//! - `AppServices` wires one storage backend into all four services.

pub mod errors;
pub mod user;
pub mod item;
pub mod booking;
pub mod request;
pub mod storage;
pub mod registry;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use registry::AppServices;

/// Wall-clock "now" in local time, the reference for booking states.
pub fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}
