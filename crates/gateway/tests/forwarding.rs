use std::net::SocketAddr;

use chrono::{Duration, Local};
use configs::GatewayConfig;
use reqwest::StatusCode;
use serde_json::{json, Value};
use service::AppServices;

const USER: &str = "X-Sharer-User-Id";

async fn serve(router: axum::Router) -> anyhow::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(addr)
}

/// In-memory server behind a gateway; returns the gateway base URL.
async fn stack() -> anyhow::Result<String> {
    let server_addr = serve(server::app(AppServices::in_memory())).await?;
    let cfg = GatewayConfig { server_url: format!("http://{server_addr}"), ..Default::default() };
    let gateway_addr = serve(gateway::app(gateway::build_state(&cfg)?)).await?;
    Ok(format!("http://{gateway_addr}"))
}

fn ts(offset: Duration) -> String {
    (Local::now().naive_local() + offset).format("%Y-%m-%dT%H:%M:%S").to_string()
}

struct Api {
    http: reqwest::Client,
    base: String,
}

impl Api {
    async fn new() -> anyhow::Result<Self> {
        Ok(Self { http: reqwest::Client::new(), base: stack().await? })
    }

    async fn call(&self, method: reqwest::Method, path: &str, user: Option<i64>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
        let mut req = self.http.request(method, format!("{}{}", self.base, path));
        if let Some(id) = user {
            req = req.header(USER, id.to_string());
        }
        if let Some(b) = body {
            req = req.json(&b);
        }
        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
        Ok((status, json))
    }

    async fn get(&self, path: &str, user: Option<i64>) -> anyhow::Result<(StatusCode, Value)> {
        self.call(reqwest::Method::GET, path, user, None).await
    }

    async fn post(&self, path: &str, user: Option<i64>, body: Value) -> anyhow::Result<(StatusCode, Value)> {
        self.call(reqwest::Method::POST, path, user, Some(body)).await
    }

    async fn user(&self, name: &str) -> anyhow::Result<i64> {
        let email = format!("{}@example.com", name.to_lowercase());
        let (status, body) = self.post("/users", None, json!({"name": name, "email": email})).await?;
        assert_eq!(status, StatusCode::OK, "{body}");
        Ok(body["id"].as_i64().unwrap_or_default())
    }

    async fn metrics(&self) -> anyhow::Result<String> {
        Ok(self.http.get(format!("{}/metrics", self.base)).send().await?.text().await?)
    }
}

#[tokio::test]
async fn health_is_answered_locally() -> anyhow::Result<()> {
    let api = Api::new().await?;
    let (status, body) = api.get("/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn invalid_user_never_reaches_server() -> anyhow::Result<()> {
    let api = Api::new().await?;
    let (status, body) = api.post("/users", None, json!({"name": "Ann", "email": "not-an-email"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");

    let (status, _) = api.post("/users", None, json!({"email": "ann@example.com"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let text = api.metrics().await?;
    assert!(text.contains("shareit_gateway_validation_rejections_total 2"), "{text}");
    assert!(!text.contains("method=\"POST\""), "{text}");
    Ok(())
}

#[tokio::test]
async fn server_errors_are_relayed_unchanged() -> anyhow::Result<()> {
    let api = Api::new().await?;
    api.user("Ann").await?;
    let (status, body) = api.post("/users", None, json!({"name": "Other", "email": "ann@example.com"})).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");

    let (status, body) = api.get("/users/4242", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");

    let text = api.metrics().await?;
    assert!(text.contains("method=\"POST\",status=\"409\""), "{text}");
    Ok(())
}

#[tokio::test]
async fn identity_header_is_required() -> anyhow::Result<()> {
    let api = Api::new().await?;
    let (status, _) = api.get("/items", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let resp = api.http.get(format!("{}/bookings", api.base)).header(USER, "abc").send().await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn malformed_identity_is_rejected_where_optional() -> anyhow::Result<()> {
    let api = Api::new().await?;
    let owner = api.user("Owner").await?;
    let (_, item) = api.post("/items", Some(owner), json!({"name": "Saw", "description": "Hand saw", "available": true})).await?;
    let item_id = item["id"].as_i64().unwrap_or_default();

    for path in [format!("/items/{item_id}"), "/items/search?text=saw".to_string(), "/requests/1".to_string()] {
        let resp = api.http.get(format!("{}{}", api.base, path)).header(USER, "abc").send().await?;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{path}");
    }

    let (status, body) = api.get(&format!("/items/{item_id}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Saw");
    let (status, found) = api.get("/items/search?text=saw", Some(owner)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().map(|a| a.len()), Some(1));

    let text = api.metrics().await?;
    assert!(!text.contains("method=\"GET\",status=\"400\""), "{text}");
    Ok(())
}

#[tokio::test]
async fn booking_checks_and_lifecycle() -> anyhow::Result<()> {
    let api = Api::new().await?;
    let owner = api.user("Owner").await?;
    let booker = api.user("Booker").await?;

    let (status, _) = api.post("/items", Some(owner), json!({"name": "Tent", "description": "Two person"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, item) = api.post("/items", Some(owner), json!({"name": "Tent", "description": "Two person", "available": true})).await?;
    assert_eq!(status, StatusCode::OK, "{item}");
    let item_id = item["id"].as_i64().unwrap_or_default();

    let past = json!({"itemId": item_id, "start": ts(-Duration::days(2)), "end": ts(Duration::days(1))});
    let (status, body) = api.post("/bookings", Some(booker), past).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "start must not be in the past");

    let missing_item = json!({"start": ts(Duration::days(1)), "end": ts(Duration::days(2))});
    let (status, _) = api.post("/bookings", Some(booker), missing_item).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // end before start passes the gateway and is refused by the server
    let reversed = json!({"itemId": item_id, "start": ts(Duration::days(3)), "end": ts(Duration::days(2))});
    let (status, _) = api.post("/bookings", Some(booker), reversed).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let ok = json!({"itemId": item_id, "start": ts(Duration::days(1)), "end": ts(Duration::days(2))});
    let (status, booking) = api.post("/bookings", Some(booker), ok).await?;
    assert_eq!(status, StatusCode::OK, "{booking}");
    assert_eq!(booking["status"], "WAITING");
    let booking_id = booking["id"].as_i64().unwrap_or_default();

    let (status, _) = api.call(reqwest::Method::PATCH, &format!("/bookings/{booking_id}?approved=maybe"), Some(owner), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, decided) = api.call(reqwest::Method::PATCH, &format!("/bookings/{booking_id}?approved=true"), Some(owner), None).await?;
    assert_eq!(status, StatusCode::OK, "{decided}");
    assert_eq!(decided["state"], "FUTURE");

    let (status, list) = api.get("/bookings?state=future", Some(booker)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(|a| a.len()), Some(1));

    let (status, body) = api.get("/bookings/owner?state=SOON", Some(owner)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown state: SOON");

    let (status, _) = api.get(&format!("/bookings/{booking_id}"), Some(booker)).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn items_requests_and_comments_forwarded() -> anyhow::Result<()> {
    let api = Api::new().await?;
    let asker = api.user("Asker").await?;
    let owner = api.user("Owner").await?;

    let (status, _) = api.post("/requests", Some(asker), json!({"description": "  "})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, request) = api.post("/requests", Some(asker), json!({"description": "Need a ladder"})).await?;
    assert_eq!(status, StatusCode::OK);
    let request_id = request["id"].as_i64().unwrap_or_default();

    let body = json!({"name": "Ladder", "description": "3m aluminium", "available": true, "requestId": request_id});
    let (status, item) = api.post("/items", Some(owner), body).await?;
    assert_eq!(status, StatusCode::OK, "{item}");
    let item_id = item["id"].as_i64().unwrap_or_default();

    let (_, own) = api.get("/requests", Some(asker)).await?;
    assert_eq!(own[0]["items"][0]["itemId"], item_id);
    let (_, one) = api.get(&format!("/requests/{request_id}"), None).await?;
    assert_eq!(one["description"], "Need a ladder");

    let (_, found) = api.get("/items/search?text=LADDER", None).await?;
    assert_eq!(found.as_array().map(|a| a.len()), Some(1));

    let (status, _) = api.post(&format!("/items/{item_id}/comment"), Some(asker), json!({"text": ""})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    // valid text, but the author never rented the item
    let (status, body) = api.post(&format!("/items/{item_id}/comment"), Some(asker), json!({"text": "Looks sturdy"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");

    let (status, _) = api.call(reqwest::Method::PATCH, &format!("/items/{item_id}"), Some(asker), Some(json!({"name": "Mine"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, patched) = api.call(reqwest::Method::PATCH, &format!("/items/{item_id}"), Some(owner), Some(json!({"available": false}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["name"], "Ladder");
    assert_eq!(patched["available"], false);

    let (status, _) = api.call(reqwest::Method::DELETE, &format!("/items/{item_id}"), Some(owner), None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_bad_gateway() -> anyhow::Result<()> {
    let dead = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?;
    let cfg = GatewayConfig { server_url: format!("http://{dead}"), ..Default::default() };
    let base = serve(gateway::app(gateway::build_state(&cfg)?)).await?;
    let resp = reqwest::get(format!("http://{base}/users")).await?;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = resp.json().await?;
    assert_eq!(body["error"], "Bad Gateway");
    Ok(())
}
