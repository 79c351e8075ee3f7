//! Users: registration, profile edits and lookups.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::UserService;
