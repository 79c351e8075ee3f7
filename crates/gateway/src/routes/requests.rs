use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use common::{OptionalSharerUserId, SharerUserId};

use crate::client::Relayed;
use crate::errors::GatewayError;
use crate::state::GatewayState;
use crate::validation::RequestCreate;

use super::validated;

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/requests", get(list_own).post(create))
        .route("/requests/all", get(list_others))
        .route("/requests/:id", get(get_one))
}

pub async fn create(
    State(state): State<GatewayState>,
    SharerUserId(requester): SharerUserId,
    payload: Result<Json<RequestCreate>, JsonRejection>,
) -> Result<Relayed, GatewayError> {
    let request = validated(&state, payload)?;
    state.requests.create(requester, &request).await
}

pub async fn list_own(State(state): State<GatewayState>, SharerUserId(requester): SharerUserId) -> Result<Relayed, GatewayError> {
    state.requests.list_own(requester).await
}

pub async fn list_others(State(state): State<GatewayState>, SharerUserId(requester): SharerUserId) -> Result<Relayed, GatewayError> {
    state.requests.list_others(requester).await
}

pub async fn get_one(State(state): State<GatewayState>, OptionalSharerUserId(user): OptionalSharerUserId, Path(id): Path<i64>) -> Result<Relayed, GatewayError> {
    state.requests.get(user, id).await
}
