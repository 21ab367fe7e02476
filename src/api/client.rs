use reqwest::header::{self, HeaderMap, HeaderValue};
use serde_json::Value;
use url::Url;

use super::http_client::{self, ApiRequest};
use crate::auth::{self, TokenCache};
use crate::config::{ClientConfig, ConsumerCredentials};
use crate::error::MarketplaceError;

/// A client for the marketplace API.
///
/// Every method issues a single request (preceded by one token exchange if
/// no token is known yet) and hands back the decoded JSON untouched.
/// The client can be shared across tasks; all of them reuse the same token.
pub struct MarketplaceClient {
    /// The underlying transport, including its connection pool.
    http: reqwest::Client,
    base_url: Url,
    /// Headers sent with every request.
    default_headers: HeaderMap,
    credentials: ConsumerCredentials,
    token: TokenCache,
}

impl MarketplaceClient {
    /// Creates a new client with its own HTTP transport.
    pub fn new(config: ClientConfig) -> Result<Self, MarketplaceError> {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Creates a new client around an existing `reqwest::Client`.
    ///
    /// Useful for sharing a connection pool, or for configuring timeouts and
    /// proxies on the transport itself.
    pub fn with_http_client(
        config: ClientConfig,
        http: reqwest::Client,
    ) -> Result<Self, MarketplaceError> {
        let base_url = parse_base_url(&config.base_url)?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        Ok(Self {
            http,
            base_url,
            default_headers,
            credentials: config.credentials,
            token: TokenCache::new(config.token),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The token currently held, if any. This never talks to the marketplace.
    pub async fn cached_token(&self) -> Option<String> {
        self.token.peek().await
    }

    /// Returns a usable bearer token, exchanging our credentials for one if
    /// we don't hold one yet.
    ///
    /// Concurrent callers share a single exchange. Once obtained, the token
    /// is reused for the lifetime of this client.
    pub async fn token(&self) -> Result<String, MarketplaceError> {
        self.token
            .get_or_refresh(|| self.exchange_token())
            .await
    }

    /// Obtains a fresh token from `/token`, replacing any held token.
    pub async fn refresh_token(&self) -> Result<String, MarketplaceError> {
        self.token
            .replace_with(|| self.exchange_token())
            .await
    }

    async fn exchange_token(&self) -> Result<String, MarketplaceError> {
        let endpoint = self.endpoint(&["token"])?;
        auth::exchange_token(
            &self.http,
            &self.default_headers,
            endpoint,
            &self.credentials,
        )
        .await
    }

    /// Builds an absolute URL from our base URL and the given path segments.
    /// Each segment is percent-encoded on its own.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, MarketplaceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MarketplaceError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends an authorized request, obtaining a token first if necessary.
    pub(crate) async fn call(&self, request: ApiRequest) -> Result<Value, MarketplaceError> {
        let token = self.token().await?;
        http_client::execute(&self.http, &self.default_headers, request.bearer(token)).await
    }
}

impl std::fmt::Debug for MarketplaceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketplaceClient")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, MarketplaceError> {
    let url = Url::parse(base_url)
        .map_err(|error| MarketplaceError::InvalidBaseUrl(format!("{base_url}: {error}")))?;

    // We append path segments to this later, which `data:` style URLs can't hold.
    if url.cannot_be_a_base() {
        return Err(MarketplaceError::InvalidBaseUrl(base_url.to_string()));
    }

    Ok(url)
}
