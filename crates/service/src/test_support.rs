#![cfg(test)]
use tokio::sync::OnceCell;
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};

// Shared databases are migrated only once per test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// A migrated connection. `TEST_DATABASE_URL` points the tests at a shared
/// database; otherwise every call gets its own in-memory SQLite.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        let db = connect_with_config(&DatabaseConfig::sqlite_memory()).await?;
        migration::Migrator::up(&db, None).await?;
        return Ok(db);
    };

    let cfg = DatabaseConfig { url, min_connections: 1, acquire_timeout: std::time::Duration::from_secs(10), ..DatabaseConfig::default() };
    MIGRATED
        .get_or_try_init(|| async {
            let db = connect_with_config(&cfg).await?;
            migration::Migrator::up(&db, None).await?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;
    connect_with_config(&cfg).await
}
