mod catalog;
mod client;
pub(crate) mod http_client;
mod orders;

pub use catalog::ProductQuery;
pub use client::MarketplaceClient;
pub use orders::OrderQuery;
