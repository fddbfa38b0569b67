//! SDK error type

use crate::config::ConfigError;
use bitgo_auth::AuthError;
use bitgo_rest::RestError;
use bitgo_types::BitgoError;
use bitgo_ws::WsError;
use thiserror::Error;

/// Any error the SDK can return
#[derive(Error, Debug)]
pub enum SdkError {
    /// Invalid client configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Missing or malformed access token
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// REST request failed
    #[error(transparent)]
    Rest(#[from] RestError),

    /// WebSocket session failed
    #[error(transparent)]
    Ws(#[from] WsError),

    /// Wire data or environment could not be decoded
    #[error(transparent)]
    Types(#[from] BitgoError),
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;
