use serde::Serialize;

/// The marketplace API used unless a client is configured otherwise.
pub const DEFAULT_BASE_URL: &str = "https://mp.knawat.io/api";

/// Environment variable hosting applications conventionally read a base URL override from.
///
/// The client never consults the environment itself; pass the value to
/// [`ClientConfig::with_base_url`] if you want to honor it.
pub const BASE_URL_ENV_VAR: &str = "MP_BASEURL";

/// The consumer key and secret pair exchanged for a bearer token.
///
/// This is serialized as-is for the body of the `/token` request.
#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ConsumerCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
}

// The secret should never end up in logs.
impl std::fmt::Debug for ConsumerCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .finish()
    }
}

/// Everything needed to construct a [`MarketplaceClient`](crate::MarketplaceClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub credentials: ConsumerCredentials,
    /// A previously obtained token. When present, no token exchange happens
    /// until [`refresh_token`](crate::MarketplaceClient::refresh_token) is called.
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: ConsumerCredentials {
                consumer_key: consumer_key.into(),
                consumer_secret: consumer_secret.into(),
            },
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
