use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::{types::ErrorBody, UnknownState};
use models::errors::ModelError;
use service::ServiceError;
use thiserror::Error;
use tracing::error;

/// JSON error response: `{"error": "...", "message": "..."}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let error = status.canonical_reason().unwrap_or("Error").to_string();
        Self { status, error, message: Some(message.into()) }
    }

    pub fn bad_request(message: impl Into<String>) -> Self { Self::new(StatusCode::BAD_REQUEST, message) }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.error, self.message))).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(m) => Self::new(StatusCode::BAD_REQUEST, m),
            ServiceError::Model(ModelError::Validation(m)) => Self::new(StatusCode::BAD_REQUEST, m),
            ServiceError::NotFound(m) => Self::new(StatusCode::NOT_FOUND, m),
            ServiceError::Conflict(m) => Self::new(StatusCode::CONFLICT, m),
            other => {
                error!(error = %other, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

impl From<UnknownState> for JsonApiError {
    fn from(e: UnknownState) -> Self {
        Self { status: StatusCode::BAD_REQUEST, error: e.to_string(), message: None }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(e: JsonRejection) -> Self { Self::bad_request(e.body_text()) }
}

impl From<QueryRejection> for JsonApiError {
    fn from(e: QueryRejection) -> Self { Self::bad_request(e.body_text()) }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid bind address {0}")]
    BindAddress(String),
}
