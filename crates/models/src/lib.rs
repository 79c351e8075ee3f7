//! SeaORM entities of the relational store plus connection helpers.

pub mod errors;
pub mod db;
pub mod user;
pub mod request;
pub mod item;
pub mod booking;
pub mod comment;

#[cfg(test)]
mod tests;
