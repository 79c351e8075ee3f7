use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use configs::{AppConfig, GatewayConfig};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::client::ShareItClient;
use crate::observability::GatewayMetrics;
use crate::routes;
use crate::state::GatewayState;

fn bind_addr(cfg: &GatewayConfig) -> anyhow::Result<SocketAddr> {
    let raw = format!("{}:{}", cfg.host, cfg.port);
    raw.parse().map_err(|_| anyhow::anyhow!("invalid bind address {raw}"))
}

pub fn build_state(cfg: &GatewayConfig) -> anyhow::Result<GatewayState> {
    let metrics = Arc::new(GatewayMetrics::new()?);
    let client = ShareItClient::new(&cfg.server_url, Duration::from_secs(cfg.request_timeout_secs), metrics.clone())?;
    Ok(GatewayState::new(client, metrics))
}

pub fn app(state: GatewayState) -> Router {
    routes::build_router(state, CorsLayer::very_permissive())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

/// Gateway settings from `config.toml` and the environment; serve until Ctrl+C.
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_gateway_or_env()?;
    run_with(cfg).await
}

pub async fn run_with(cfg: GatewayConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg)?;
    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, server_url = %cfg.server_url, "starting shareit gateway");
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_from_config() {
        let mut cfg = GatewayConfig::default();
        assert_eq!(bind_addr(&cfg).unwrap().port(), 8080);
        cfg.host = "nowhere at all".into();
        assert!(bind_addr(&cfg).is_err());
    }

    #[test]
    fn state_targets_configured_server() {
        let cfg = GatewayConfig { server_url: "http://server:9090".into(), ..Default::default() };
        let state = build_state(&cfg).unwrap();
        assert_eq!(state.metrics.upstream_errors_total.get(), 0);
    }
}
