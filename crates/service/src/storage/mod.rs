//! Storage backends implementing every repository trait.

pub mod memory;
pub mod seaorm;

pub use memory::MemoryStore;
pub use seaorm::SeaOrmStore;
