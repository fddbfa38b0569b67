//! High-level client bundling REST and WebSocket access

use crate::config::{SdkConfig, SdkConfigBuilder};
use crate::error::SdkResult;
use bitgo_rest::{BitgoRestClient, Order, OrderQuery, Trade, TradeQuery};
use bitgo_types::Environment;
use bitgo_ws::SubscriptionSession;
use tracing::info;

/// BitGo Prime trading client
///
/// Owns the REST client and hands out WebSocket sessions for the same token
/// and environment.
///
/// # Example
///
/// ```no_run
/// use bitgo_sdk::prelude::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = BitgoClient::new(
///         BitgoClient::builder()
///             .token(AccessToken::from_env()?)
///             .environment(Environment::Test)
///             .build(),
///     )?;
///
///     let account = client.rest().list_accounts().await?.remove(0);
///     let orders = client.all_orders(&account.id, &OrderQuery::new()).await?;
///     println!("{} orders", orders.len());
///
///     let mut session = client.session();
///     session.subscribe_orders(&account.id)?;
///     session.on_order(|update| println!("{} {}", update.order_id, update.status));
///     session.run().await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BitgoClient {
    config: SdkConfig,
    rest: BitgoRestClient,
}

impl BitgoClient {
    /// Start building a configuration
    pub fn builder() -> SdkConfigBuilder {
        SdkConfig::builder()
    }

    /// Create a client from a validated configuration
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        config.validate()?;
        let rest = BitgoRestClient::with_config(config.token.clone(), config.rest_config())?;

        info!(environment = %config.environment, "BitGo client ready");
        Ok(Self { config, rest })
    }

    /// Create a client from `BITGO_ACCESS_TOKEN` and `BITGO_ENV`
    pub fn from_env() -> SdkResult<Self> {
        Self::new(SdkConfig::from_env()?)
    }

    /// Configuration in effect
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Target environment
    pub fn environment(&self) -> Environment {
        self.config.environment
    }

    /// REST client
    pub fn rest(&self) -> &BitgoRestClient {
        &self.rest
    }

    /// New, unconnected WebSocket session
    ///
    /// Each call returns an independent session with its own connection.
    pub fn session(&self) -> SubscriptionSession {
        SubscriptionSession::new(self.config.token.clone(), self.config.session_config())
    }

    /// Fetch every page of an account's orders
    pub async fn all_orders(&self, account_id: &str, query: &OrderQuery) -> SdkResult<Vec<Order>> {
        Ok(self.rest.list_orders(account_id, query)?.collect_all().await?)
    }

    /// Fetch every page of an account's trades
    pub async fn all_trades(&self, account_id: &str, query: &TradeQuery) -> SdkResult<Vec<Trade>> {
        Ok(self.rest.list_trades(account_id, query)?.collect_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::SdkError;
    use bitgo_auth::AccessToken;
    use bitgo_ws::SessionState;

    fn token() -> AccessToken {
        AccessToken::new("v2xtesttoken").unwrap()
    }

    #[test]
    fn test_client_from_builder() {
        let client = BitgoClient::new(
            BitgoClient::builder()
                .token(token())
                .environment(Environment::Test)
                .build(),
        )
        .unwrap();

        assert_eq!(client.environment(), Environment::Test);
        assert_eq!(client.rest().base_url(), Environment::Test.rest_url());
    }

    #[test]
    fn test_session_uses_configured_url() {
        let client = BitgoClient::new(
            BitgoClient::builder()
                .token(token())
                .ws_url("ws://127.0.0.1:9001/ws")
                .build(),
        )
        .unwrap();

        let session = client.session();
        assert_eq!(session.endpoint(), "ws://127.0.0.1:9001/ws");
        assert_eq!(session.state(), SessionState::Unconnected);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = BitgoClient::new(
            BitgoClient::builder()
                .token(token())
                .rest_url("app.bitgo.com")
                .build(),
        );

        assert!(matches!(
            result,
            Err(SdkError::Config(ConfigError::InvalidRestUrl { .. }))
        ));
    }
}
