//! Item requests: "I am looking for X", answered by items created for them.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::RequestService;
