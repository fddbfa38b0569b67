//! User and account endpoints

use crate::client::{path_segment, BitgoRestClient};
use crate::error::RestResult;
use crate::types::{Account, Balance, DataResponse, User};
use tracing::{debug, instrument};

/// User, account and balance endpoints
pub struct AccountEndpoints<'a> {
    client: &'a BitgoRestClient,
}

impl<'a> AccountEndpoints<'a> {
    pub fn new(client: &'a BitgoRestClient) -> Self {
        Self { client }
    }

    /// Get the current user's public information
    #[instrument(skip(self))]
    pub async fn get_current_user(&self) -> RestResult<User> {
        debug!("Fetching current user");
        self.client.get("/user/current", &[]).await
    }

    /// List the trading accounts the current user belongs to
    #[instrument(skip(self))]
    pub async fn list_accounts(&self) -> RestResult<Vec<Account>> {
        let response: DataResponse<Account> = self.client.get("/accounts", &[]).await?;
        debug!("Fetched {} accounts", response.data.len());
        Ok(response.data)
    }

    /// Get balance information about a single trading account
    ///
    /// # Arguments
    /// * `account_id` - Trading account id
    #[instrument(skip(self))]
    pub async fn get_balance(&self, account_id: &str) -> RestResult<Vec<Balance>> {
        let path = format!("/accounts/{}/balances", path_segment("account_id", account_id)?);
        let response: DataResponse<Balance> = self.client.get(&path, &[]).await?;
        Ok(response.data)
    }
}
