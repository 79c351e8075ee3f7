use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use common::SharerUserId;
use service::request::domain::{NewRequest, Request, RequestWithAnswers};

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/requests", get(list_own).post(create))
        .route("/requests/all", get(list_others))
        .route("/requests/:id", get(get_one))
}

#[utoipa::path(post, path = "/requests", tag = "requests", request_body = crate::openapi::NewRequestDoc,
    params(("X-Sharer-User-Id" = i64, Header, description = "Requester id")),
    responses((status = 200, description = "Created", body = crate::openapi::RequestDoc), (status = 400, description = "Bad Request"), (status = 404, description = "Unknown user")))]
pub async fn create(
    State(state): State<ServerState>,
    SharerUserId(user): SharerUserId,
    payload: Result<Json<NewRequest>, JsonRejection>,
) -> Result<Json<Request>, JsonApiError> {
    let Json(input) = payload?;
    Ok(Json(state.services.requests.create(user, input).await?))
}

#[utoipa::path(get, path = "/requests", tag = "requests", params(("X-Sharer-User-Id" = i64, Header, description = "Requester id")),
    responses((status = 200, description = "Own requests with answers, newest first", body = [crate::openapi::RequestWithAnswersDoc]), (status = 404, description = "Unknown user")))]
pub async fn list_own(State(state): State<ServerState>, SharerUserId(user): SharerUserId) -> Result<Json<Vec<RequestWithAnswers>>, JsonApiError> {
    Ok(Json(state.services.requests.list_own(user).await?))
}

#[utoipa::path(get, path = "/requests/all", tag = "requests", params(("X-Sharer-User-Id" = i64, Header, description = "Caller id")),
    responses((status = 200, description = "Other users' requests, newest first", body = [crate::openapi::RequestDoc]), (status = 404, description = "Unknown user")))]
pub async fn list_others(State(state): State<ServerState>, SharerUserId(user): SharerUserId) -> Result<Json<Vec<Request>>, JsonApiError> {
    Ok(Json(state.services.requests.list_others(user).await?))
}

#[utoipa::path(get, path = "/requests/{id}", tag = "requests", params(("id" = i64, Path, description = "Request id")),
    responses((status = 200, description = "Request with answers", body = crate::openapi::RequestWithAnswersDoc), (status = 404, description = "Not Found")))]
pub async fn get_one(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<Json<RequestWithAnswers>, JsonApiError> {
    Ok(Json(state.services.requests.get(id).await?))
}
