use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use service::user::domain::{NewUser, User, UserPatch};

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/users", get(list).post(create))
        .route("/users/:id", get(get_one).patch(update).delete(remove))
}

#[utoipa::path(post, path = "/users", tag = "users", request_body = crate::openapi::NewUserDoc,
    responses((status = 200, description = "Created", body = crate::openapi::UserDoc), (status = 400, description = "Bad Request"), (status = 409, description = "Email taken")))]
pub async fn create(State(state): State<ServerState>, payload: Result<Json<NewUser>, JsonRejection>) -> Result<Json<User>, JsonApiError> {
    let Json(input) = payload?;
    Ok(Json(state.services.users.create(input).await?))
}

#[utoipa::path(get, path = "/users", tag = "users", responses((status = 200, description = "All users", body = [crate::openapi::UserDoc])))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<User>>, JsonApiError> {
    Ok(Json(state.services.users.list().await?))
}

#[utoipa::path(get, path = "/users/{id}", tag = "users", params(("id" = i64, Path, description = "User id")),
    responses((status = 200, description = "User", body = crate::openapi::UserDoc), (status = 404, description = "Not Found")))]
pub async fn get_one(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<Json<User>, JsonApiError> {
    Ok(Json(state.services.users.get(id).await?))
}

#[utoipa::path(patch, path = "/users/{id}", tag = "users", params(("id" = i64, Path, description = "User id")), request_body = crate::openapi::UserPatchDoc,
    responses((status = 200, description = "Updated", body = crate::openapi::UserDoc), (status = 404, description = "Not Found"), (status = 409, description = "Email taken")))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> Result<Json<User>, JsonApiError> {
    let Json(patch) = payload?;
    Ok(Json(state.services.users.update(id, patch).await?))
}

#[utoipa::path(delete, path = "/users/{id}", tag = "users", params(("id" = i64, Path, description = "User id")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn remove(State(state): State<ServerState>, Path(id): Path<i64>) -> Result<(), JsonApiError> {
    state.services.users.delete(id).await?;
    Ok(())
}
