use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use common::SharerUserId;
use serde::Deserialize;
use service::item::domain::{Comment, Item, ItemDetails, ItemPatch, NewComment, NewItem};

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
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

#[utoipa::path(post, path = "/items", tag = "items", request_body = crate::openapi::NewItemDoc,
    params(("X-Sharer-User-Id" = i64, Header, description = "Owner id")),
    responses((status = 200, description = "Created", body = crate::openapi::ItemDoc), (status = 400, description = "Bad Request"), (status = 404, description = "Owner or request not found")))]
pub async fn create(
    State(state): State<ServerState>,
    SharerUserId(owner): SharerUserId,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> Result<Json<Item>, JsonApiError> {
    let Json(input) = payload?;
    Ok(Json(state.services.items.create(owner, input).await?))
}

#[utoipa::path(patch, path = "/items/{id}", tag = "items", request_body = crate::openapi::ItemPatchDoc,
    params(("id" = i64, Path, description = "Item id"), ("X-Sharer-User-Id" = i64, Header, description = "Owner id")),
    responses((status = 200, description = "Updated", body = crate::openapi::ItemDoc), (status = 404, description = "Item not found or not the owner")))]
pub async fn update(
    State(state): State<ServerState>,
    SharerUserId(owner): SharerUserId,
    Path(id): Path<i64>,
    payload: Result<Json<ItemPatch>, JsonRejection>,
) -> Result<Json<Item>, JsonApiError> {
    let Json(patch) = payload?;
    Ok(Json(state.services.items.update(owner, id, patch).await?))
}

#[utoipa::path(get, path = "/items/{id}", tag = "items", params(("id" = i64, Path, description = "Item id")),
    responses((status = 200, description = "Item with comments and booking dates", body = crate::openapi::ItemDetailsDoc), (status = 404, description = "Not Found")))]
pub async fn get_one(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<Json<ItemDetails>, JsonApiError> {
    Ok(Json(state.services.items.get(id).await?))
}

#[utoipa::path(get, path = "/items", tag = "items", params(("X-Sharer-User-Id" = i64, Header, description = "Owner id")),
    responses((status = 200, description = "Owner's items", body = [crate::openapi::ItemDetailsDoc]), (status = 404, description = "Unknown user")))]
pub async fn list_own(State(state): State<ServerState>, SharerUserId(owner): SharerUserId) -> Result<Json<Vec<ItemDetails>>, JsonApiError> {
    Ok(Json(state.services.items.list_by_owner(owner).await?))
}

#[utoipa::path(get, path = "/items/search", tag = "items", params(("text" = String, Query, description = "Substring of name or description")),
    responses((status = 200, description = "Matching available items", body = [crate::openapi::ItemDoc])))]
pub async fn search(State(state): State<ServerState>, Query(q): Query<SearchQuery>) -> Result<Json<Vec<Item>>, JsonApiError> {
    Ok(Json(state.services.items.search(&q.text).await?))
}

#[utoipa::path(delete, path = "/items/{id}", tag = "items",
    params(("id" = i64, Path, description = "Item id"), ("X-Sharer-User-Id" = i64, Header, description = "Owner id")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Item not found or not the owner")))]
pub async fn remove(State(state): State<ServerState>, SharerUserId(owner): SharerUserId, Path(id): Path<i64>) -> Result<(), JsonApiError> {
    state.services.items.delete(owner, id).await?;
    Ok(())
}

#[utoipa::path(post, path = "/items/{id}/comment", tag = "items", request_body = crate::openapi::NewCommentDoc,
    params(("id" = i64, Path, description = "Item id"), ("X-Sharer-User-Id" = i64, Header, description = "Author id")),
    responses((status = 200, description = "Comment added", body = crate::openapi::CommentDoc), (status = 400, description = "Author never rented the item"), (status = 404, description = "Not Found")))]
pub async fn add_comment(
    State(state): State<ServerState>,
    SharerUserId(author): SharerUserId,
    Path(id): Path<i64>,
    payload: Result<Json<NewComment>, JsonRejection>,
) -> Result<Json<Comment>, JsonApiError> {
    let Json(input) = payload?;
    Ok(Json(state.services.items.add_comment(author, id, input).await?))
}
