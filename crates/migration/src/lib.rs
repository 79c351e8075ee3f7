//! Migrator registering table migrations in foreign-key order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250401_000001_create_users;
mod m20250401_000002_create_requests;
mod m20250401_000003_create_items;
mod m20250401_000004_create_bookings;
mod m20250401_000005_create_comments;
mod m20250401_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250401_000001_create_users::Migration),
            Box::new(m20250401_000002_create_requests::Migration),
            Box::new(m20250401_000003_create_items::Migration),
            Box::new(m20250401_000004_create_bookings::Migration),
            Box::new(m20250401_000005_create_comments::Migration),
            // Indexes should always be applied last
            Box::new(m20250401_000010_add_indexes::Migration),
        ]
    }
}
