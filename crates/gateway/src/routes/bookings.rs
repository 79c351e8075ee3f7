use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    routing::get,
    Json, Router,
};
use common::{BookingState, SharerUserId};
use serde::Deserialize;

use crate::client::Relayed;
use crate::errors::GatewayError;
use crate::state::GatewayState;
use crate::validation::{parse_approved, BookingCreate};

use super::validated;

pub fn router() -> Router<GatewayState> {
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
    fn parse(&self) -> Result<BookingState, GatewayError> {
        match &self.state {
            Some(raw) => Ok(raw.parse::<BookingState>()?),
            None => Ok(BookingState::All),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DecisionQuery {
    pub approved: Option<String>,
}

pub async fn create(
    State(state): State<GatewayState>,
    SharerUserId(booker): SharerUserId,
    payload: Result<Json<BookingCreate>, JsonRejection>,
) -> Result<Relayed, GatewayError> {
    let booking = validated(&state, payload)?;
    state.bookings.create(booker, &booking).await
}

pub async fn decide(
    State(state): State<GatewayState>,
    SharerUserId(owner): SharerUserId,
    Path(id): Path<i64>,
    query: Result<Query<DecisionQuery>, QueryRejection>,
) -> Result<Relayed, GatewayError> {
    let Query(q) = state.reject_counted(query.map_err(GatewayError::from))?;
    let approved = state.reject_counted(parse_approved(q.approved.as_deref()))?;
    state.bookings.decide(owner, id, approved).await
}

pub async fn get_one(State(state): State<GatewayState>, SharerUserId(user): SharerUserId, Path(id): Path<i64>) -> Result<Relayed, GatewayError> {
    state.bookings.get(user, id).await
}

pub async fn list_by_booker(
    State(state): State<GatewayState>,
    SharerUserId(booker): SharerUserId,
    Query(q): Query<StateQuery>,
) -> Result<Relayed, GatewayError> {
    let wanted = state.reject_counted(q.parse())?;
    state.bookings.list_by_booker(booker, wanted).await
}

pub async fn list_by_owner(
    State(state): State<GatewayState>,
    SharerUserId(owner): SharerUserId,
    Query(q): Query<StateQuery>,
) -> Result<Relayed, GatewayError> {
    let wanted = state.reject_counted(q.parse())?;
    state.bookings.list_by_owner(owner, wanted).await
}
