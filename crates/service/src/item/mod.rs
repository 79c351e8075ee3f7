//! Items offered for rent and the comments left on them.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::ItemService;
