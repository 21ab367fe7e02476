//! An in-process stand-in for the marketplace API.
//!
//! Binds to a random local port, answers with canned JSON per method and path,
//! and records every request it receives.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use knawat_mp::{ClientConfig, MarketplaceClient};
use serde_json::Value;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json_body(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body should be JSON")
    }
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: String,
    delay: Duration,
}

#[derive(Clone, Default)]
struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    routes: Arc<Mutex<HashMap<(String, String), Canned>>>,
}

pub struct MockMarketplace {
    addr: SocketAddr,
    state: MockState,
}

impl MockMarketplace {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = MockState::default();

        let app = Router::new().fallback(handle).with_state(state.clone());
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// A client pointed at this mock, without a token.
    pub fn client(&self) -> MarketplaceClient {
        let config = ClientConfig::new("key", "secret").with_base_url(self.base_url());
        MarketplaceClient::new(config).unwrap()
    }

    /// A client pointed at this mock, holding the given token.
    pub fn client_with_token(&self, token: &str) -> MarketplaceClient {
        let config = ClientConfig::new("key", "secret")
            .with_base_url(self.base_url())
            .with_token(token);
        MarketplaceClient::new(config).unwrap()
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.respond_raw(method, path, status, &body.to_string());
    }

    pub fn respond_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        self.insert(method, path, status, body, Duration::ZERO);
    }

    pub fn respond_slowly(&self, method: &str, path: &str, body: Value, delay: Duration) {
        self.insert(method, path, 200, &body.to_string(), delay);
    }

    /// Answers `/token` with the given token.
    pub fn issue_token(&self, token: &str) {
        self.respond(
            "POST",
            "/api/token",
            200,
            serde_json::json!({ "channel": { "token": token } }),
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }

    fn insert(&self, method: &str, path: &str, status: u16, body: &str, delay: Duration) {
        let canned = Canned {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
            delay,
        };
        self.state
            .routes
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), canned);
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let canned = state
        .routes
        .lock()
        .unwrap()
        .get(&(method.to_string(), uri.path().to_string()))
        .cloned();

    let Some(canned) = canned else {
        return (StatusCode::NOT_FOUND, r#"{"message":"Not Found"}"#).into_response();
    };

    if !canned.delay.is_zero() {
        tokio::time::sleep(canned.delay).await;
    }

    (
        canned.status,
        [(header::CONTENT_TYPE, "application/json")],
        canned.body,
    )
        .into_response()
}
