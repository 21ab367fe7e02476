use reqwest::{header::HeaderMap, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::MarketplaceError;

/// A single marketplace request, described before it is sent.
#[derive(Debug)]
pub(crate) struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub bearer: Option<String>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            bearer: None,
            body: None,
        }
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Serializes the given payload as this request's JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, payload: &B) -> Result<Self, MarketplaceError> {
        self.body = Some(serde_json::to_string(payload)?);
        Ok(self)
    }
}

/// Sends the request as-is, without interpreting the response.
pub(crate) async fn send(
    client: &reqwest::Client,
    headers: &HeaderMap,
    request: ApiRequest,
) -> Result<reqwest::Response, MarketplaceError> {
    debug!(method = %request.method, url = %request.url, "sending marketplace request");

    let mut builder = client
        .request(request.method, request.url)
        .headers(headers.clone());
    if let Some(token) = request.bearer {
        builder = builder.bearer_auth(token);
    }
    if let Some(body) = request.body {
        builder = builder.body(body);
    }

    let response = builder.send().await?;
    debug!(status = %response.status(), "marketplace responded");
    Ok(response)
}

/// Ensures the response was successful and decodes its body as JSON.
pub(crate) async fn decode(response: reqwest::Response) -> Result<Value, MarketplaceError> {
    let status = response.status();
    let response_text = response.text().await?;

    if !status.is_success() {
        return Err(MarketplaceError::Status {
            status,
            body: response_text,
        });
    }

    parse_body(status, &response_text)
}

/// Creates and executes a request, returning the decoded JSON response.
pub(crate) async fn execute(
    client: &reqwest::Client,
    headers: &HeaderMap,
    request: ApiRequest,
) -> Result<Value, MarketplaceError> {
    let response = send(client, headers, request).await?;
    decode(response).await
}

fn parse_body(status: StatusCode, text: &str) -> Result<Value, MarketplaceError> {
    // Deletions may legitimately come back empty.
    if status == StatusCode::NO_CONTENT && text.trim().is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_str(text)?)
}
