//! API environment definitions

use crate::error::BitgoError;
use std::fmt;
use std::str::FromStr;

/// Environment variable selecting the environment
pub const ENV_VAR: &str = "BITGO_ENV";

/// BitGo Prime trading environments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Live trading (default)
    #[default]
    Production,
    /// Sandbox at bitgo-test.com
    Test,
}

impl Environment {
    /// Base URL for REST requests
    pub fn rest_url(&self) -> &'static str {
        match self {
            Self::Production => "https://app.bitgo.com/api/prime/trading/v1",
            Self::Test => "https://app.bitgo-test.com/api/prime/trading/v1",
        }
    }

    /// URL of the WebSocket endpoint
    pub fn ws_url(&self) -> &'static str {
        match self {
            Self::Production => "wss://app.bitgo.com/api/prime/trading/v1/ws",
            Self::Test => "wss://app.bitgo-test.com/api/prime/trading/v1/ws",
        }
    }

    /// Read the environment from `BITGO_ENV`, defaulting to production when unset
    pub fn from_env() -> Result<Self, BitgoError> {
        match std::env::var(ENV_VAR) {
            Ok(value) => value.parse(),
            Err(_) => Ok(Self::default()),
        }
    }
}

impl FromStr for Environment {
    type Err = BitgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Ok(Self::Production),
            "test" | "testnet" | "sandbox" => Ok(Self::Test),
            other => Err(BitgoError::UnknownEnvironment(other.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Test => f.write_str("test"),
        }
    }
}
