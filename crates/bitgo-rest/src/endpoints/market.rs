//! Currency, product and order book endpoints

use crate::client::{path_segment, BitgoRestClient};
use crate::error::RestResult;
use crate::types::{Currency, DataResponse, Level1, Level2, Product};
use tracing::{debug, instrument};

/// Market data endpoints
///
/// All of them are scoped to a trading account.
pub struct MarketEndpoints<'a> {
    client: &'a BitgoRestClient,
}

impl<'a> MarketEndpoints<'a> {
    pub fn new(client: &'a BitgoRestClient) -> Self {
        Self { client }
    }

    /// List all currencies available to the account
    #[instrument(skip(self))]
    pub async fn list_currencies(&self, account_id: &str) -> RestResult<Vec<Currency>> {
        let path = format!("/accounts/{}/currencies", path_segment("account_id", account_id)?);
        let response: DataResponse<Currency> = self.client.get(&path, &[]).await?;
        Ok(response.data)
    }

    /// List all products available to the account
    #[instrument(skip(self))]
    pub async fn list_products(&self, account_id: &str) -> RestResult<Vec<Product>> {
        let path = format!("/accounts/{}/products", path_segment("account_id", account_id)?);
        let response: DataResponse<Product> = self.client.get(&path, &[]).await?;
        debug!("Fetched {} products", response.data.len());
        Ok(response.data)
    }

    /// Get the level1 (top of book) snapshot of a product
    ///
    /// # Arguments
    /// * `account_id` - Trading account id
    /// * `product` - Product name (e.g., "BTC-USD")
    #[instrument(skip(self))]
    pub async fn get_level1(&self, account_id: &str, product: &str) -> RestResult<Level1> {
        let path = format!(
            "/accounts/{}/products/{}/level1",
            path_segment("account_id", account_id)?,
            path_segment("product", product)?
        );
        self.client.get(&path, &[]).await
    }

    /// Get the level2 order book snapshot of a product
    ///
    /// # Arguments
    /// * `account_id` - Trading account id
    /// * `product` - Product name (e.g., "BTC-USD")
    #[instrument(skip(self))]
    pub async fn get_level2(&self, account_id: &str, product: &str) -> RestResult<Level2> {
        let path = format!(
            "/accounts/{}/products/{}/level2",
            path_segment("account_id", account_id)?,
            path_segment("product", product)?
        );
        self.client.get(&path, &[]).await
    }
}
