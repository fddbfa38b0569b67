//! Bearer access token
//!
//! The token is stored using the `secrecy` crate which zeroizes memory on
//! drop and keeps the value out of `Debug` output. Access goes through
//! [`AccessToken::expose`] or [`AccessToken::bearer`].

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::{AuthError, AuthResult};

/// Environment variable holding the access token
pub const TOKEN_ENV_VAR: &str = "BITGO_ACCESS_TOKEN";

/// Long-lived API access token
pub struct AccessToken {
    token: SecretString,
}

impl AccessToken {
    /// Wrap a raw access token
    ///
    /// Rejects empty tokens and tokens containing characters that cannot be
    /// sent in an HTTP header.
    pub fn new(token: impl Into<String>) -> AuthResult<Self> {
        let token = token.into();
        let trimmed = token.trim();

        if trimmed.is_empty() {
            return Err(AuthError::InvalidToken("token is empty".to_string()));
        }
        if trimmed.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(AuthError::InvalidToken(
                "token contains whitespace or control characters".to_string(),
            ));
        }

        Ok(Self {
            token: SecretString::from(trimmed.to_string()),
        })
    }

    /// Read the token from `BITGO_ACCESS_TOKEN`
    pub fn from_env() -> AuthResult<Self> {
        let token = std::env::var(TOKEN_ENV_VAR)
            .map_err(|_| AuthError::EnvVarNotSet(TOKEN_ENV_VAR.to_string()))?;
        debug!("Loaded access token from {}", TOKEN_ENV_VAR);
        Self::new(token)
    }

    /// The raw token
    pub fn expose(&self) -> &str {
        self.token.expose_secret()
    }

    /// Value of the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.expose())
    }
}

impl Clone for AccessToken {
    fn clone(&self) -> Self {
        Self {
            token: SecretString::from(self.expose().to_string()),
        }
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.expose().chars().take(4).collect();
        f.debug_struct("AccessToken")
            .field("token", &format!("{}...", prefix))
            .finish()
    }
}
