//! Client configuration
//!
//! [`SdkConfig`] holds everything both clients need: the access token, the
//! environment and the timeouts. Build it with [`SdkConfig::builder`] or
//! [`BitgoClient::builder`](crate::BitgoClient::builder).
//!
//! # Example
//!
//! ```
//! use bitgo_sdk::config::SdkConfig;
//! use bitgo_auth::AccessToken;
//! use bitgo_types::Environment;
//!
//! let config = SdkConfig::builder()
//!     .token(AccessToken::new("v2xexample").unwrap())
//!     .environment(Environment::Test)
//!     .request_timeout_secs(10)
//!     .build();
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.rest_config().base_url, Environment::Test.rest_url());
//! ```

use bitgo_auth::AccessToken;
use bitgo_rest::ClientConfig;
use bitgo_types::Environment;
use bitgo_ws::SessionConfig;
use std::time::Duration;
use typed_builder::TypedBuilder;

/// Default REST request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub use bitgo_ws::transport::DEFAULT_CONNECT_TIMEOUT;

/// Configuration validation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// REST URL is not http(s)
    #[error("invalid REST URL: {url} (expected http:// or https://)")]
    InvalidRestUrl { url: String },

    /// WebSocket URL is not ws(s)
    #[error("invalid WebSocket URL: {url} (expected ws:// or wss://)")]
    InvalidWsUrl { url: String },

    /// Request timeout of zero
    #[error("request timeout must be at least 1 second")]
    RequestTimeoutTooShort,

    /// Handshake timeout below one second
    #[error("connection timeout must be at least 1 second")]
    ConnectTimeoutTooShort,
}

/// SDK configuration
#[derive(Debug, Clone, TypedBuilder)]
pub struct SdkConfig {
    /// Access token for REST requests and the WebSocket handshake
    pub token: AccessToken,

    /// Target environment
    #[builder(default)]
    pub environment: Environment,

    /// REST request timeout in seconds
    #[builder(default = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    /// WebSocket handshake timeout
    #[builder(default = DEFAULT_CONNECT_TIMEOUT)]
    pub connect_timeout: Duration,

    /// REST URL overriding the environment's
    #[builder(default, setter(strip_option, into))]
    pub rest_url: Option<String>,

    /// WebSocket URL overriding the environment's
    #[builder(default, setter(strip_option, into))]
    pub ws_url: Option<String>,

    /// Custom user agent for REST requests
    #[builder(default, setter(strip_option, into))]
    pub user_agent: Option<String>,
}

impl SdkConfig {
    /// Load the token from `BITGO_ACCESS_TOKEN` and the environment from `BITGO_ENV`
    pub fn from_env() -> crate::SdkResult<Self> {
        let token = AccessToken::from_env()?;
        let environment = Environment::from_env()?;
        Ok(Self::builder().token(token).environment(environment).build())
    }

    /// REST base URL in effect
    pub fn rest_url(&self) -> &str {
        self.rest_url
            .as_deref()
            .unwrap_or_else(|| self.environment.rest_url())
    }

    /// WebSocket URL in effect
    pub fn ws_url(&self) -> &str {
        self.ws_url
            .as_deref()
            .unwrap_or_else(|| self.environment.ws_url())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rest_url = self.rest_url();
        if !(rest_url.starts_with("https://") || rest_url.starts_with("http://")) {
            return Err(ConfigError::InvalidRestUrl {
                url: rest_url.to_string(),
            });
        }

        let ws_url = self.ws_url();
        if !(ws_url.starts_with("wss://") || ws_url.starts_with("ws://")) {
            return Err(ConfigError::InvalidWsUrl {
                url: ws_url.to_string(),
            });
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::RequestTimeoutTooShort);
        }
        if self.connect_timeout < Duration::from_secs(1) {
            return Err(ConfigError::ConnectTimeoutTooShort);
        }

        Ok(())
    }

    /// Configuration for the REST client
    pub fn rest_config(&self) -> ClientConfig {
        let config = ClientConfig::for_environment(self.environment)
            .with_base_url(self.rest_url())
            .with_timeout(self.request_timeout_secs);

        match &self.user_agent {
            Some(agent) => config.with_user_agent(agent.clone()),
            None => config,
        }
    }

    /// Configuration for WebSocket sessions
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::for_environment(self.environment)
            .with_url(self.ws_url())
            .with_timeout(self.connect_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> AccessToken {
        AccessToken::new("v2xtesttoken").unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = SdkConfig::builder().token(token()).build();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(config.connect_timeout, SessionConfig::default().connect_timeout);
        assert_eq!(config.rest_url(), Environment::Production.rest_url());
        assert_eq!(config.ws_url(), Environment::Production.ws_url());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_url_overrides() {
        let config = SdkConfig::builder()
            .token(token())
            .environment(Environment::Test)
            .rest_url("http://127.0.0.1:8080/api")
            .ws_url("ws://127.0.0.1:8081/ws")
            .user_agent("desk-tool/1.0")
            .build();

        let rest = config.rest_config();
        assert_eq!(rest.base_url, "http://127.0.0.1:8080/api");
        assert_eq!(rest.user_agent.as_deref(), Some("desk-tool/1.0"));
        assert_eq!(config.session_config().url, "ws://127.0.0.1:8081/ws");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let config = SdkConfig::builder()
            .token(token())
            .ws_url("https://app.bitgo.com/ws")
            .build();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWsUrl { .. })));

        let config = SdkConfig::builder()
            .token(token())
            .rest_url("ftp://example.com")
            .build();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRestUrl { .. })));

        let config = SdkConfig::builder()
            .token(token())
            .request_timeout_secs(0)
            .build();
        assert_eq!(config.validate(), Err(ConfigError::RequestTimeoutTooShort));

        let config = SdkConfig::builder()
            .token(token())
            .connect_timeout(Duration::from_millis(200))
            .build();
        assert_eq!(config.validate(), Err(ConfigError::ConnectTimeoutTooShort));
    }
}
