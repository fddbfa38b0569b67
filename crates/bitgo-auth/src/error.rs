//! Error types for authentication operations

/// Errors that can occur while loading credentials
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Token is empty or not usable as an HTTP header value
    #[error("Invalid access token: {0}")]
    InvalidToken(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::EnvVarNotSet("BITGO_ACCESS_TOKEN".to_string());
        assert!(err.to_string().contains("BITGO_ACCESS_TOKEN"));
    }
}
