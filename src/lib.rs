//! A client for the Knawat dropshipping marketplace API.
//!
//! ```no_run
//! use knawat_mp::{ClientConfig, MarketplaceClient, ProductQuery};
//!
//! # async fn run() -> Result<(), knawat_mp::MarketplaceError> {
//! let client = MarketplaceClient::new(ClientConfig::new("consumer key", "consumer secret"))?;
//! let products = client.get_products(&ProductQuery::default()).await?;
//! println!("{products}");
//! # Ok(())
//! # }
//! ```
//!
//! A token is obtained from the consumer key and secret on first use and
//! reused afterwards. Responses are returned as [`serde_json::Value`].

mod api;
mod auth;
mod config;
mod error;

pub use api::{MarketplaceClient, OrderQuery, ProductQuery};
pub use config::{ClientConfig, ConsumerCredentials, BASE_URL_ENV_VAR, DEFAULT_BASE_URL};
pub use error::MarketplaceError;
