use reqwest::StatusCode;
use serde_json::Value;

/// Possible errors while talking to the marketplace.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error("request error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("unable to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("request returned with invalid status code: {status} - {body}")]
    Status { status: StatusCode, body: String },
    /// The token exchange was rejected. `response` holds whatever the marketplace sent back.
    #[error("authentication with the marketplace failed")]
    AuthenticationFailed { response: Value },
    #[error("response is missing the `{0}` field")]
    MissingField(&'static str),
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
