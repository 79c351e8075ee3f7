//! Caller identity carried in the `X-Sharer-User-Id` header.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::types::ErrorBody;

pub const USER_ID_HEADER: &str = "X-Sharer-User-Id";

/// Id of the user performing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharerUserId(pub i64);

#[derive(Debug)]
pub struct UserIdRejection(String);

impl IntoResponse for UserIdRejection {
    fn into_response(self) -> Response {
        let body = ErrorBody::new("Bad Request", Some(self.0));
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

fn parse_header(parts: &Parts) -> Option<Result<SharerUserId, UserIdRejection>> {
    let raw = parts.headers.get(USER_ID_HEADER)?;
    let id = raw
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(SharerUserId)
        .ok_or_else(|| UserIdRejection(format!("{USER_ID_HEADER} must be an integer")));
    Some(id)
}

#[async_trait]
impl<S> FromRequestParts<S> for SharerUserId
where
    S: Send + Sync,
{
    type Rejection = UserIdRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parse_header(parts).unwrap_or_else(|| Err(UserIdRejection(format!("missing {USER_ID_HEADER} header"))))
    }
}

/// Identity for routes where the header may be left out. A header that is
/// present but not an integer is still rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalSharerUserId(pub Option<i64>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalSharerUserId
where
    S: Send + Sync,
{
    type Rejection = UserIdRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parse_header(parts).transpose().map(|id| OptionalSharerUserId(id.map(|u| u.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> Result<SharerUserId, UserIdRejection> {
        let (mut parts, _) = req.into_parts();
        SharerUserId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn reads_numeric_header() {
        let req = Request::builder().header(USER_ID_HEADER, "42").body(()).unwrap();
        assert_eq!(extract(req).await.unwrap(), SharerUserId(42));
    }

    #[tokio::test]
    async fn rejects_missing_or_garbage() {
        let missing = Request::builder().body(()).unwrap();
        assert!(extract(missing).await.is_err());

        let garbage = Request::builder().header(USER_ID_HEADER, "abc").body(()).unwrap();
        let rejection = extract(garbage).await.unwrap_err();
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }

    async fn extract_optional(req: Request<()>) -> Result<OptionalSharerUserId, UserIdRejection> {
        let (mut parts, _) = req.into_parts();
        OptionalSharerUserId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn optional_identity_still_rejects_garbage() {
        let missing = Request::builder().body(()).unwrap();
        assert_eq!(extract_optional(missing).await.unwrap(), OptionalSharerUserId(None));

        let present = Request::builder().header(USER_ID_HEADER, " 7 ").body(()).unwrap();
        assert_eq!(extract_optional(present).await.unwrap(), OptionalSharerUserId(Some(7)));

        let garbage = Request::builder().header(USER_ID_HEADER, "seven").body(()).unwrap();
        let rejection = extract_optional(garbage).await.unwrap_err();
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
