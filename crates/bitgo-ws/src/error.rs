//! Session error types

use crate::session::SessionState;
use crate::transport::TransportError;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by [`SubscriptionSession`](crate::SubscriptionSession)
#[derive(Error, Debug)]
pub enum WsError {
    /// WebSocket handshake failed
    #[error("Failed to connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    /// WebSocket handshake did not complete in time
    #[error("Connection timeout after {timeout:?} connecting to {url}")]
    ConnectionTimeout { url: String, timeout: Duration },

    /// Established connection failed while sending or receiving
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Operation not allowed in the current session state
    #[error("{operation} not allowed while session is {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    /// Subscribe request could not be encoded
    #[error("Failed to encode subscribe request: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl WsError {
    /// Check if the error happened while opening the connection
    pub fn is_handshake_error(&self) -> bool {
        matches!(
            self,
            WsError::ConnectionFailed { .. } | WsError::ConnectionTimeout { .. }
        )
    }
}

/// Result type alias for session operations
pub type WsResult<T> = Result<T, WsError>;
