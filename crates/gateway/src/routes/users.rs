use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};

use crate::client::Relayed;
use crate::errors::GatewayError;
use crate::state::GatewayState;
use crate::validation::{UserCreate, UserUpdate};

use super::validated;

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/users", get(list).post(create))
        .route("/users/:id", get(get_one).patch(update).delete(remove))
}

pub async fn create(State(state): State<GatewayState>, payload: Result<Json<UserCreate>, JsonRejection>) -> Result<Relayed, GatewayError> {
    let user = validated(&state, payload)?;
    state.users.create(&user).await
}

pub async fn list(State(state): State<GatewayState>) -> Result<Relayed, GatewayError> {
    state.users.list().await
}

pub async fn get_one(State(state): State<GatewayState>, Path(id): Path<i64>) -> Result<Relayed, GatewayError> {
    state.users.get(id).await
}

pub async fn update(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Relayed, GatewayError> {
    let patch = validated(&state, payload)?;
    state.users.update(id, &patch).await
}

pub async fn remove(State(state): State<GatewayState>, Path(id): Path<i64>) -> Result<Relayed, GatewayError> {
    state.users.delete(id).await
}
