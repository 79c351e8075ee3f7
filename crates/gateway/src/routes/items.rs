use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use common::{OptionalSharerUserId, SharerUserId};
use serde::Deserialize;

use crate::client::Relayed;
use crate::errors::GatewayError;
use crate::state::GatewayState;
use crate::validation::{CommentCreate, ItemCreate, ItemUpdate};

use super::validated;

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/items", get(list_own).post(create))
        .route("/items/search", get(search))
        .route("/items/:id", get(get_one).patch(update).delete(remove))
        .route("/items/:id/comment", post(add_comment))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub text: String,
}

pub async fn create(
    State(state): State<GatewayState>,
    SharerUserId(owner): SharerUserId,
    payload: Result<Json<ItemCreate>, JsonRejection>,
) -> Result<Relayed, GatewayError> {
    let item = validated(&state, payload)?;
    state.items.create(owner, &item).await
}

pub async fn update(
    State(state): State<GatewayState>,
    SharerUserId(owner): SharerUserId,
    Path(id): Path<i64>,
    payload: Result<Json<ItemUpdate>, JsonRejection>,
) -> Result<Relayed, GatewayError> {
    let patch = validated(&state, payload)?;
    state.items.update(owner, id, &patch).await
}

pub async fn get_one(State(state): State<GatewayState>, OptionalSharerUserId(user): OptionalSharerUserId, Path(id): Path<i64>) -> Result<Relayed, GatewayError> {
    state.items.get(user, id).await
}

pub async fn list_own(State(state): State<GatewayState>, SharerUserId(owner): SharerUserId) -> Result<Relayed, GatewayError> {
    state.items.list_by_owner(owner).await
}

pub async fn search(State(state): State<GatewayState>, OptionalSharerUserId(user): OptionalSharerUserId, Query(q): Query<SearchQuery>) -> Result<Relayed, GatewayError> {
    state.items.search(user, &q.text).await
}

pub async fn remove(State(state): State<GatewayState>, SharerUserId(owner): SharerUserId, Path(id): Path<i64>) -> Result<Relayed, GatewayError> {
    state.items.delete(owner, id).await
}

pub async fn add_comment(
    State(state): State<GatewayState>,
    SharerUserId(author): SharerUserId,
    Path(id): Path<i64>,
    payload: Result<Json<CommentCreate>, JsonRejection>,
) -> Result<Relayed, GatewayError> {
    let comment = validated(&state, payload)?;
    state.items.add_comment(author, id, &comment).await
}
