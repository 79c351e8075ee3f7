use std::net::SocketAddr;

use axum::Router;
use configs::{AppConfig, StorageKind};
use migration::{Migrator, MigratorTrait};
use models::db::{connect_with_config, DatabaseConfig};
use service::AppServices;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let raw = format!("{}:{}", cfg.server.host, cfg.server.port);
    raw.parse().map_err(|_| StartupError::BindAddress(raw))
}

/// Services over the configured storage. The database is migrated first.
pub async fn build_services(cfg: &AppConfig) -> anyhow::Result<AppServices> {
    match cfg.server.storage {
        StorageKind::Memory => {
            info!(storage = "memory", "using in-process storage");
            Ok(AppServices::in_memory())
        }
        StorageKind::Database => {
            let db = connect_with_config(&DatabaseConfig::from(&cfg.database)).await?;
            Migrator::up(&db, None).await?;
            info!(storage = "database", "migrations applied");
            Ok(AppServices::from_db(db))
        }
    }
}

pub fn app(services: AppServices) -> Router {
    routes::build_router(ServerState::new(services), build_cors())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

/// Load configuration (file, then environment) and serve until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_or_env()?;
    run_with(cfg).await
}

pub async fn run_with(cfg: AppConfig) -> anyhow::Result<()> {
    let services = build_services(&cfg).await?;
    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "starting shareit server");
    axum::serve(listener, app(services))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_from_config() {
        let mut cfg = AppConfig::default();
        cfg.server.port = 9191;
        assert_eq!(bind_addr(&cfg).unwrap().port(), 9191);
        cfg.server.host = "not a host".into();
        assert!(bind_addr(&cfg).is_err());
    }

    #[tokio::test]
    async fn memory_storage_needs_no_database() {
        let mut cfg = AppConfig::default();
        cfg.server.storage = StorageKind::Memory;
        let svc = build_services(&cfg).await.unwrap();
        assert!(svc.users.list().await.unwrap().is_empty());
    }
}
