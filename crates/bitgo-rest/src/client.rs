//! Main REST client implementation

use crate::endpoints::{AccountEndpoints, MarketEndpoints, TradingEndpoints};
use crate::error::{RestError, RestResult};
use crate::pagination::{Page, PageFetcher, PagedRequest, Paginator, CURSOR_REQUEST_PARAM};
use crate::types::{
    Account, Balance, Order, OrderQuery, OrderRequest, Trade, TradeQuery, User,
};
use bitgo_auth::AccessToken;
use bitgo_types::Environment;
use futures::future::BoxFuture;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// BitGo Prime trading REST API client
///
/// Every endpoint is account-scoped and authenticated with the access token.
///
/// # Example
///
/// ```no_run
/// use bitgo_rest::BitgoRestClient;
/// use bitgo_auth::AccessToken;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = BitgoRestClient::new(AccessToken::from_env()?)?;
///     let user = client.get_current_user().await?;
///     println!("Hello {}", user.first_name);
///
///     for account in client.list_accounts().await? {
///         println!("{}: {}", account.id, account.name);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct BitgoRestClient {
    http_client: Client,
    base_url: String,
    token: AccessToken,
}

impl BitgoRestClient {
    /// Create a production client with default settings
    pub fn new(token: AccessToken) -> RestResult<Self> {
        Self::with_config(token, ClientConfig::default())
    }

    /// Create a client from `BITGO_ACCESS_TOKEN` and `BITGO_ENV`
    pub fn from_env() -> RestResult<Self> {
        let token = AccessToken::from_env()?;
        let environment = Environment::from_env()
            .map_err(|e| RestError::InvalidParameter(e.to_string()))?;
        Self::with_config(token, ClientConfig::for_environment(environment))
    }

    /// Create a client with custom configuration
    pub fn with_config(token: AccessToken, config: ClientConfig) -> RestResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_deref().unwrap_or("bitgo-rest/0.1.0"))
            .build()?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        info!(base_url = %base_url, "Created BitGo REST client");

        Ok(Self {
            http_client,
            base_url,
            token,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Endpoint Groups
    // ========================================================================

    /// User, account and balance endpoints
    pub fn account(&self) -> AccountEndpoints<'_> {
        AccountEndpoints::new(self)
    }

    /// Order and trade endpoints
    pub fn trading(&self) -> TradingEndpoints<'_> {
        TradingEndpoints::new(self)
    }

    /// Currency, product and order book endpoints
    pub fn market(&self) -> MarketEndpoints<'_> {
        MarketEndpoints::new(self)
    }

    // ========================================================================
    // Shortcuts
    // ========================================================================

    /// Get the current user's public information
    pub async fn get_current_user(&self) -> RestResult<User> {
        self.account().get_current_user().await
    }

    /// List the trading accounts the current user belongs to
    pub async fn list_accounts(&self) -> RestResult<Vec<Account>> {
        self.account().list_accounts().await
    }

    /// Get balances of a trading account
    pub async fn get_account_balance(&self, account_id: &str) -> RestResult<Vec<Balance>> {
        self.account().get_balance(account_id).await
    }

    /// List orders of a trading account, one page per pull
    pub fn list_orders(
        &self,
        account_id: &str,
        query: &OrderQuery,
    ) -> RestResult<PagedRequest<'_, Vec<Order>>> {
        self.trading().list_orders(account_id, query)
    }

    /// Place a new order
    pub async fn place_order(&self, account_id: &str, order: &OrderRequest) -> RestResult<Order> {
        self.trading().place_order(account_id, order).await
    }

    /// Request cancellation of an order
    pub async fn cancel_order(&self, account_id: &str, order_id: &str) -> RestResult<()> {
        self.trading().cancel_order(account_id, order_id).await
    }

    /// List trades of a trading account, one page per pull
    pub fn list_trades(
        &self,
        account_id: &str,
        query: &TradeQuery,
    ) -> RestResult<PagedRequest<'_, Vec<Trade>>> {
        self.trading().list_trades(account_id, query)
    }

    // ========================================================================
    // Request Plumbing
    // ========================================================================

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authenticated GET
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> RestResult<T> {
        debug!(path, params = query.len(), "GET");
        let body = self
            .execute(self.http_client.get(self.url(path)).query(query))
            .await?;
        decode(&body)
    }

    /// Authenticated POST with a JSON body
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> RestResult<T> {
        debug!(path, "POST");
        let body = self
            .execute(self.http_client.post(self.url(path)).json(body))
            .await?;
        decode(&body)
    }

    /// Authenticated PUT whose response body is ignored
    pub(crate) async fn put_empty(&self, path: &str) -> RestResult<()> {
        debug!(path, "PUT");
        self.execute(self.http_client.put(self.url(path))).await?;
        Ok(())
    }

    /// Send the request and return the body of a successful response
    async fn execute(&self, request: RequestBuilder) -> RestResult<String> {
        let response = request.bearer_auth(self.token.expose()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RestError::from_response(status.as_u16(), &body));
        }
        Ok(body)
    }

    /// Build a lazy page sequence over a cursor-paginated GET endpoint
    ///
    /// Each fetch sends `query` plus `prevId=<cursor>` once a cursor is known.
    pub(crate) fn paginate<'a, T>(
        &'a self,
        path: String,
        query: Vec<(&'static str, String)>,
    ) -> PagedRequest<'a, T>
    where
        T: DeserializeOwned + Send + 'a,
    {
        let fetch: PageFetcher<'a, T> = Box::new(move |cursor: Option<String>| {
            let mut params = query.clone();
            if let Some(cursor) = cursor {
                params.push((CURSOR_REQUEST_PARAM, cursor));
            }
            let path = path.clone();
            let request: BoxFuture<'a, RestResult<Page<T>>> =
                Box::pin(async move { self.get::<Page<T>>(&path, &params).await });
            request
        });

        Paginator::new(fetch)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> RestResult<T> {
    serde_json::from_str(body).map_err(|e| RestError::Parse(format!("{}: {}", e, body)))
}

/// Validate an id before it is interpolated into a request path
pub(crate) fn path_segment<'s>(name: &str, value: &'s str) -> RestResult<&'s str> {
    if value.is_empty() || value.contains(['/', '?', '#']) {
        return Err(RestError::InvalidParameter(format!(
            "{} is not a valid path segment: {:?}",
            name, value
        )));
    }
    Ok(value)
}

impl std::fmt::Debug for BitgoRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitgoRestClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token)
            .finish()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST base URL, including the `/api/prime/trading/v1` prefix
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Production)
    }
}

impl ClientConfig {
    /// Create a new configuration for production
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration pointing at the given environment
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            base_url: environment.rest_url().to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }

    /// Override the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> AccessToken {
        AccessToken::new("v2xtesttoken").unwrap()
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(60)
            .with_user_agent("test-agent");

        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.user_agent, Some("test-agent".to_string()));
        assert_eq!(config.base_url, Environment::Production.rest_url());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ClientConfig::for_environment(Environment::Test)
            .with_base_url("http://127.0.0.1:9999/api/");
        let client = BitgoRestClient::with_config(token(), config).unwrap();

        assert_eq!(client.base_url(), "http://127.0.0.1:9999/api");
        assert_eq!(client.url("/accounts"), "http://127.0.0.1:9999/api/accounts");
    }

    #[test]
    fn test_debug_hides_token() {
        let client = BitgoRestClient::new(token()).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("v2xtesttoken"));
    }

    #[test]
    fn test_path_segment_validation() {
        assert_eq!(path_segment("account_id", "abc123").unwrap(), "abc123");
        assert!(path_segment("account_id", "").is_err());
        assert!(path_segment("order_id", "../x").is_err());
        assert!(path_segment("product", "BTC-USD?x=1").is_err());
    }
}
