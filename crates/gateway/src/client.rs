//! Forwarding to the server tier. Whatever the server answers (2xx, 4xx or
//! 5xx) is handed back to the caller untouched.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use common::{BookingState, USER_ID_HEADER};
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::GatewayError;
use crate::observability::GatewayMetrics;
use crate::validation::{BookingCreate, CommentCreate, ItemCreate, ItemUpdate, RequestCreate, UserCreate, UserUpdate};

/// A server answer relayed verbatim.
#[derive(Debug)]
pub struct Relayed {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl IntoResponse for Relayed {
    fn into_response(self) -> Response {
        let mut resp = (self.status, self.body).into_response();
        match self.content_type {
            Some(ct) => {
                resp.headers_mut().insert(header::CONTENT_TYPE, ct);
            }
            None => {
                resp.headers_mut().remove(header::CONTENT_TYPE);
            }
        }
        resp
    }
}

#[derive(Clone)]
pub struct ShareItClient {
    http: reqwest::Client,
    base_url: String,
    metrics: Arc<GatewayMetrics>,
}

impl ShareItClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration, metrics: Arc<GatewayMetrics>) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url, metrics })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        user: Option<i64>,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<Relayed, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(id) = user {
            req = req.header(USER_ID_HEADER, id.to_string());
        }
        if let Some(json) = body {
            req = req.json(&json);
        }

        let started = Instant::now();
        let result = req.send().await;
        self.metrics.upstream_duration.observe(started.elapsed().as_secs_f64());

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                self.metrics.upstream_errors_total.inc();
                warn!(%method, %url, error = %e, "server unreachable");
                return Err(e.into());
            }
        };
        let status = resp.status();
        let content_type = resp.headers().get(header::CONTENT_TYPE).cloned();
        let body = resp.bytes().await.map_err(|e| {
            self.metrics.upstream_errors_total.inc();
            GatewayError::from(e)
        })?;
        self.metrics.forwarded_total.with_label_values(&[method.as_str(), status.as_str()]).inc();
        debug!(%method, %url, status = status.as_u16(), "forwarded");
        Ok(Relayed { status, content_type, body })
    }

    fn to_json<B: Serialize>(body: &B) -> Result<serde_json::Value, GatewayError> {
        serde_json::to_value(body).map_err(|e| GatewayError::Payload(e.to_string()))
    }

    pub async fn get(&self, path: &str, user: Option<i64>, query: &[(&str, String)]) -> Result<Relayed, GatewayError> {
        self.send(Method::GET, path, user, query, None).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, user: Option<i64>, body: &B) -> Result<Relayed, GatewayError> {
        self.send(Method::POST, path, user, &[], Some(Self::to_json(body)?)).await
    }

    pub async fn patch<B: Serialize>(
        &self,
        path: &str,
        user: Option<i64>,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Relayed, GatewayError> {
        let json = body.map(Self::to_json).transpose()?;
        self.send(Method::PATCH, path, user, query, json).await
    }

    pub async fn delete(&self, path: &str, user: Option<i64>) -> Result<Relayed, GatewayError> {
        self.send(Method::DELETE, path, user, &[], None).await
    }
}

#[derive(Clone)]
pub struct UserClient {
    inner: ShareItClient,
}

impl UserClient {
    pub fn new(inner: ShareItClient) -> Self { Self { inner } }

    pub async fn create(&self, user: &UserCreate) -> Result<Relayed, GatewayError> {
        self.inner.post("/users", None, user).await
    }

    pub async fn update(&self, id: i64, patch: &UserUpdate) -> Result<Relayed, GatewayError> {
        self.inner.patch(&format!("/users/{id}"), None, &[], Some(patch)).await
    }

    pub async fn get(&self, id: i64) -> Result<Relayed, GatewayError> {
        self.inner.get(&format!("/users/{id}"), None, &[]).await
    }

    pub async fn list(&self) -> Result<Relayed, GatewayError> {
        self.inner.get("/users", None, &[]).await
    }

    pub async fn delete(&self, id: i64) -> Result<Relayed, GatewayError> {
        self.inner.delete(&format!("/users/{id}"), None).await
    }
}

#[derive(Clone)]
pub struct ItemClient {
    inner: ShareItClient,
}

impl ItemClient {
    pub fn new(inner: ShareItClient) -> Self { Self { inner } }

    pub async fn create(&self, owner: i64, item: &ItemCreate) -> Result<Relayed, GatewayError> {
        self.inner.post("/items", Some(owner), item).await
    }

    pub async fn update(&self, owner: i64, id: i64, patch: &ItemUpdate) -> Result<Relayed, GatewayError> {
        self.inner.patch(&format!("/items/{id}"), Some(owner), &[], Some(patch)).await
    }

    pub async fn get(&self, user: Option<i64>, id: i64) -> Result<Relayed, GatewayError> {
        self.inner.get(&format!("/items/{id}"), user, &[]).await
    }

    pub async fn list_by_owner(&self, owner: i64) -> Result<Relayed, GatewayError> {
        self.inner.get("/items", Some(owner), &[]).await
    }

    pub async fn search(&self, user: Option<i64>, text: &str) -> Result<Relayed, GatewayError> {
        self.inner.get("/items/search", user, &[("text", text.to_string())]).await
    }

    pub async fn delete(&self, owner: i64, id: i64) -> Result<Relayed, GatewayError> {
        self.inner.delete(&format!("/items/{id}"), Some(owner)).await
    }

    pub async fn add_comment(&self, author: i64, item_id: i64, comment: &CommentCreate) -> Result<Relayed, GatewayError> {
        self.inner.post(&format!("/items/{item_id}/comment"), Some(author), comment).await
    }
}

#[derive(Clone)]
pub struct BookingClient {
    inner: ShareItClient,
}

impl BookingClient {
    pub fn new(inner: ShareItClient) -> Self { Self { inner } }

    pub async fn create(&self, booker: i64, booking: &BookingCreate) -> Result<Relayed, GatewayError> {
        self.inner.post("/bookings", Some(booker), booking).await
    }

    pub async fn decide(&self, owner: i64, id: i64, approved: bool) -> Result<Relayed, GatewayError> {
        self.inner
            .patch::<()>(&format!("/bookings/{id}"), Some(owner), &[("approved", approved.to_string())], None)
            .await
    }

    pub async fn get(&self, user: i64, id: i64) -> Result<Relayed, GatewayError> {
        self.inner.get(&format!("/bookings/{id}"), Some(user), &[]).await
    }

    pub async fn list_by_booker(&self, booker: i64, state: BookingState) -> Result<Relayed, GatewayError> {
        self.inner.get("/bookings", Some(booker), &[("state", state.to_string())]).await
    }

    pub async fn list_by_owner(&self, owner: i64, state: BookingState) -> Result<Relayed, GatewayError> {
        self.inner.get("/bookings/owner", Some(owner), &[("state", state.to_string())]).await
    }
}

#[derive(Clone)]
pub struct RequestClient {
    inner: ShareItClient,
}

impl RequestClient {
    pub fn new(inner: ShareItClient) -> Self { Self { inner } }

    pub async fn create(&self, requester: i64, request: &RequestCreate) -> Result<Relayed, GatewayError> {
        self.inner.post("/requests", Some(requester), request).await
    }

    pub async fn list_own(&self, requester: i64) -> Result<Relayed, GatewayError> {
        self.inner.get("/requests", Some(requester), &[]).await
    }

    pub async fn list_others(&self, requester: i64) -> Result<Relayed, GatewayError> {
        self.inner.get("/requests/all", Some(requester), &[]).await
    }

    pub async fn get(&self, user: Option<i64>, id: i64) -> Result<Relayed, GatewayError> {
        self.inner.get(&format!("/requests/{id}"), user, &[]).await
    }
}
