use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::http_client::ApiRequest;
use super::MarketplaceClient;
use crate::error::MarketplaceError;

/// Filters for listing the products imported into our store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub limit: u32,
    pub page: u32,
    /// Only return products updated after this UNIX timestamp.
    pub last_update: Option<i64>,
    pub keyword: Option<String>,
    pub hide_out_of_stock: bool,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            limit: 10,
            page: 1,
            last_update: None,
            keyword: None,
            hide_out_of_stock: false,
        }
    }
}

impl ProductQuery {
    /// Appends every parameter to the given URL.
    /// Absent values are still sent, as empty strings.
    fn append_to(&self, url: &mut Url) {
        let last_update = self
            .last_update
            .map(|timestamp| timestamp.to_string())
            .unwrap_or_default();

        url.query_pairs_mut()
            .append_pair("limit", &self.limit.to_string())
            .append_pair("page", &self.page.to_string())
            .append_pair("lastUpdate", &last_update)
            .append_pair("keyword", self.keyword.as_deref().unwrap_or_default())
            .append_pair("hideOutOfStock", if self.hide_out_of_stock { "1" } else { "0" });
    }
}

#[derive(Serialize)]
struct AddProductsBody<'a, P: ?Sized> {
    products: &'a P,
}

#[derive(Serialize)]
struct UpdateProductBody<'a, D: ?Sized> {
    data: &'a D,
}

impl MarketplaceClient {
    /// Lists imported products.
    pub async fn get_products(&self, query: &ProductQuery) -> Result<Value, MarketplaceError> {
        let mut url = self.endpoint(&["catalog", "products"])?;
        query.append_to(&mut url);
        self.call(ApiRequest::new(Method::GET, url)).await
    }

    pub async fn get_product_by_sku(&self, sku: &str) -> Result<Value, MarketplaceError> {
        let url = self.endpoint(&["catalog", "products", sku])?;
        self.call(ApiRequest::new(Method::GET, url)).await
    }

    /// Returns the total number of imported products.
    pub async fn get_products_count(&self) -> Result<u64, MarketplaceError> {
        let url = self.endpoint(&["catalog", "products", "count"])?;
        let response = self.call(ApiRequest::new(Method::GET, url)).await?;
        response
            .get("total")
            .and_then(Value::as_u64)
            .ok_or(MarketplaceError::MissingField("total"))
    }

    /// Adds products to our list. `products` is sent as `{"products": ...}`.
    pub async fn add_products<P>(&self, products: &P) -> Result<Value, MarketplaceError>
    where
        P: Serialize + ?Sized,
    {
        let url = self.endpoint(&["catalog", "add"])?;
        let request = ApiRequest::new(Method::POST, url).json(&AddProductsBody { products })?;
        self.call(request).await
    }

    /// Updates a product's external identifiers. `data` is sent as `{"data": ...}`.
    pub async fn update_product_by_sku<D>(
        &self,
        sku: &str,
        data: &D,
    ) -> Result<Value, MarketplaceError>
    where
        D: Serialize + ?Sized,
    {
        let url = self.endpoint(&["catalog", "update", sku])?;
        let request = ApiRequest::new(Method::PUT, url).json(&UpdateProductBody { data })?;
        self.call(request).await
    }

    /// Removes a product from our list.
    pub async fn delete_product_by_sku(&self, sku: &str) -> Result<Value, MarketplaceError> {
        let url = self.endpoint(&["catalog", "products", sku])?;
        self.call(ApiRequest::new(Method::DELETE, url)).await
    }

    pub async fn get_categories(&self) -> Result<Value, MarketplaceError> {
        let url = self.endpoint(&["catalog", "categories"])?;
        self.call(ApiRequest::new(Method::GET, url)).await
    }
}
