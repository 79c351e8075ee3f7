pub mod users;
pub mod items;
pub mod bookings;
pub mod requests;

use axum::{extract::{rejection::JsonRejection, State}, routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::errors::GatewayError;
use crate::state::GatewayState;
use crate::validation::Validate;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics(State(state): State<GatewayState>) -> (axum::http::StatusCode, String) {
    state.metrics.encode()
}

/// Decoded and validated request body; both failure kinds count as rejections.
pub(crate) fn validated<T: Validate>(state: &GatewayState, payload: Result<Json<T>, JsonRejection>) -> Result<T, GatewayError> {
    let Json(body) = state.reject_counted(payload.map_err(GatewayError::from))?;
    state.checked(body)
}

pub fn build_router(state: GatewayState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .merge(users::router())
        .merge(items::router())
        .merge(bookings::router())
        .merge(requests::router())
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
