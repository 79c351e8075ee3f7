use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    routing::get,
    Json, Router,
};
use common::{BookingState, SharerUserId};
use serde::Deserialize;
use service::booking::domain::{BookingView, NewBooking};

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/bookings", get(list_by_booker).post(create))
        .route("/bookings/owner", get(list_by_owner))
        .route("/bookings/:id", get(get_one).patch(decide))
}

#[derive(Debug, Deserialize)]
pub struct StateQuery {
    pub state: Option<String>,
}

impl StateQuery {
    fn parse(&self) -> Result<BookingState, JsonApiError> {
        match &self.state {
            Some(raw) => Ok(raw.parse::<BookingState>()?),
            None => Ok(BookingState::All),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DecisionQuery {
    pub approved: bool,
}

#[utoipa::path(post, path = "/bookings", tag = "bookings", request_body = crate::openapi::NewBookingDoc,
    params(("X-Sharer-User-Id" = i64, Header, description = "Booker id")),
    responses((status = 200, description = "Created, waiting for the owner", body = crate::openapi::BookingDoc), (status = 400, description = "Bad period or unavailable item"), (status = 404, description = "Not Found")))]
pub async fn create(
    State(state): State<ServerState>,
    SharerUserId(booker): SharerUserId,
    payload: Result<Json<NewBooking>, JsonRejection>,
) -> Result<Json<BookingView>, JsonApiError> {
    let Json(input) = payload?;
    Ok(Json(state.services.bookings.create(booker, input).await?))
}

#[utoipa::path(patch, path = "/bookings/{id}", tag = "bookings",
    params(("id" = i64, Path, description = "Booking id"), ("approved" = bool, Query, description = "Owner decision"), ("X-Sharer-User-Id" = i64, Header, description = "Owner id")),
    responses((status = 200, description = "Decided", body = crate::openapi::BookingDoc), (status = 400, description = "Not the owner"), (status = 404, description = "Not Found")))]
pub async fn decide(
    State(state): State<ServerState>,
    SharerUserId(owner): SharerUserId,
    Path(id): Path<i64>,
    query: Result<Query<DecisionQuery>, QueryRejection>,
) -> Result<Json<BookingView>, JsonApiError> {
    let Query(q) = query?;
    Ok(Json(state.services.bookings.approve(owner, id, q.approved).await?))
}

#[utoipa::path(get, path = "/bookings/{id}", tag = "bookings",
    params(("id" = i64, Path, description = "Booking id"), ("X-Sharer-User-Id" = i64, Header, description = "Booker or owner id")),
    responses((status = 200, description = "Booking", body = crate::openapi::BookingDoc), (status = 400, description = "Neither booker nor owner"), (status = 404, description = "Not Found")))]
pub async fn get_one(State(state): State<ServerState>, SharerUserId(user): SharerUserId, Path(id): Path<i64>) -> Result<Json<BookingView>, JsonApiError> {
    Ok(Json(state.services.bookings.get(user, id).await?))
}

#[utoipa::path(get, path = "/bookings", tag = "bookings",
    params(("state" = Option<String>, Query, description = "ALL, WAITING, APPROVED, REJECTED, CURRENT, PAST or FUTURE"), ("X-Sharer-User-Id" = i64, Header, description = "Booker id")),
    responses((status = 200, description = "Booker's bookings, newest first", body = [crate::openapi::BookingDoc]), (status = 400, description = "Unknown state"), (status = 404, description = "Unknown user")))]
pub async fn list_by_booker(
    State(state): State<ServerState>,
    SharerUserId(user): SharerUserId,
    Query(q): Query<StateQuery>,
) -> Result<Json<Vec<BookingView>>, JsonApiError> {
    let wanted = q.parse()?;
    Ok(Json(state.services.bookings.list_by_booker(user, wanted).await?))
}

#[utoipa::path(get, path = "/bookings/owner", tag = "bookings",
    params(("state" = Option<String>, Query, description = "ALL, WAITING, APPROVED, REJECTED, CURRENT, PAST or FUTURE"), ("X-Sharer-User-Id" = i64, Header, description = "Owner id")),
    responses((status = 200, description = "Bookings of the owner's items, newest first", body = [crate::openapi::BookingDoc]), (status = 400, description = "Unknown state"), (status = 404, description = "Unknown user or no items")))]
pub async fn list_by_owner(
    State(state): State<ServerState>,
    SharerUserId(user): SharerUserId,
    Query(q): Query<StateQuery>,
) -> Result<Json<Vec<BookingView>>, JsonApiError> {
    let wanted = q.parse()?;
    Ok(Json(state.services.bookings.list_by_owner(user, wanted).await?))
}
