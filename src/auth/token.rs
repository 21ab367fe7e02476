use std::future::Future;

use reqwest::{header::HeaderMap, Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{info, warn};
use url::Url;

use crate::api::http_client::{self, ApiRequest};
use crate::config::ConsumerCredentials;
use crate::error::MarketplaceError;

/// The only part of the `/token` response we care about.
#[derive(Deserialize)]
struct TokenResponse {
    channel: Option<Channel>,
}

#[derive(Deserialize)]
struct Channel {
    token: String,
}

/// Exchanges the consumer key and secret for a bearer token.
pub(crate) async fn exchange_token(
    client: &reqwest::Client,
    headers: &HeaderMap,
    endpoint: Url,
    credentials: &ConsumerCredentials,
) -> Result<String, MarketplaceError> {
    let request = ApiRequest::new(Method::POST, endpoint).json(credentials)?;
    let response = http_client::send(client, headers, request).await?;

    // Rejected credentials are an authentication failure rather than a plain status error.
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        let response_text = response.text().await?;
        let body = serde_json::from_str(&response_text).unwrap_or(Value::Null);
        warn!(%status, "marketplace rejected the consumer credentials");
        return Err(MarketplaceError::AuthenticationFailed { response: body });
    }

    let body = http_client::decode(response).await?;
    let token = token_from_response(body)?;
    info!("obtained a marketplace token");
    Ok(token)
}

/// Pulls `channel.token` out of a token exchange response.
fn token_from_response(body: Value) -> Result<String, MarketplaceError> {
    let parsed: TokenResponse = serde_json::from_value(body.clone())?;
    match parsed.channel {
        Some(channel) => Ok(channel.token),
        None => {
            warn!("token response did not contain a channel");
            Err(MarketplaceError::AuthenticationFailed { response: body })
        }
    }
}

/// Holds the bearer token shared by every request of a client.
///
/// The lock is held for the duration of a refresh, so concurrent callers
/// without a token wait on the one exchange in flight instead of starting
/// their own.
pub(crate) struct TokenCache {
    token: Mutex<Option<String>>,
}

impl TokenCache {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            token: Mutex::new(initial),
        }
    }

    pub async fn peek(&self) -> Option<String> {
        self.token.lock().await.clone()
    }

    /// Returns the held token, running `refresh` only if there is none yet.
    /// A failed refresh leaves the cache empty.
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> Result<String, MarketplaceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, MarketplaceError>>,
    {
        let mut held = self.token.lock().await;
        if let Some(token) = held.as_ref() {
            return Ok(token.clone());
        }

        let token = refresh().await?;
        *held = Some(token.clone());
        Ok(token)
    }

    /// Unconditionally runs `refresh` and stores its result.
    pub async fn replace_with<F, Fut>(&self, refresh: F) -> Result<String, MarketplaceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, MarketplaceError>>,
    {
        let mut held = self.token.lock().await;
        let token = refresh().await?;
        *held = Some(token.clone());
        Ok(token)
    }
}
