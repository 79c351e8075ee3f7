use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::{types::ErrorBody, UnknownState};
use thiserror::Error;
use tracing::{error, warn};

/// Failures produced by the gateway itself. Anything the server answers is
/// relayed as-is and never becomes a `GatewayError`.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    UnknownState(#[from] UnknownState),
    #[error("{0}")]
    Payload(String),
    #[error("server unreachable: {0}")]
    Upstream(String),
    #[error("client setup failed: {0}")]
    Client(String),
}

impl GatewayError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::UnknownState(_) | Self::Payload(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::UnknownState(e) => ErrorBody::new(e.to_string(), None),
            Self::Upstream(_) => {
                warn!(error = %self, "forwarding failed");
                ErrorBody::new(reason(status), Some(self.to_string()))
            }
            Self::Client(_) => {
                error!(error = %self, "gateway misconfigured");
                ErrorBody::new(reason(status), Some(self.to_string()))
            }
            _ => ErrorBody::new(reason(status), Some(self.to_string())),
        };
        (status, Json(body)).into_response()
    }
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Error")
}

impl From<JsonRejection> for GatewayError {
    fn from(e: JsonRejection) -> Self { Self::Payload(e.body_text()) }
}

impl From<QueryRejection> for GatewayError {
    fn from(e: QueryRejection) -> Self { Self::Payload(e.body_text()) }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self { Self::Upstream(e.to_string()) }
}
