use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::http_client::ApiRequest;
use super::MarketplaceClient;
use crate::error::MarketplaceError;

/// Paging for listing orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderQuery {
    pub limit: u32,
    pub page: u32,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self { limit: 25, page: 1 }
    }
}

impl MarketplaceClient {
    /// Lists current orders.
    pub async fn get_orders(&self, query: &OrderQuery) -> Result<Value, MarketplaceError> {
        let mut url = self.endpoint(&["orders"])?;
        url.query_pairs_mut()
            .append_pair("limit", &query.limit.to_string())
            .append_pair("page", &query.page.to_string());
        self.call(ApiRequest::new(Method::GET, url)).await
    }

    pub async fn get_order_by_id(&self, id: &str) -> Result<Value, MarketplaceError> {
        let url = self.endpoint(&["orders", id])?;
        self.call(ApiRequest::new(Method::GET, url)).await
    }

    /// Creates a new order. `data` is sent as the request body directly.
    pub async fn create_order<D>(&self, data: &D) -> Result<Value, MarketplaceError>
    where
        D: Serialize + ?Sized,
    {
        let url = self.endpoint(&["order"])?;
        let request = ApiRequest::new(Method::POST, url).json(data)?;
        self.call(request).await
    }

    pub async fn update_order<D>(&self, order_id: &str, data: &D) -> Result<Value, MarketplaceError>
    where
        D: Serialize + ?Sized,
    {
        let url = self.endpoint(&["order", order_id])?;
        let request = ApiRequest::new(Method::PUT, url).json(data)?;
        self.call(request).await
    }
}
