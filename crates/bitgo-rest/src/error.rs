//! Error types for REST API operations

use bitgo_auth::AuthError;

/// HTTP status codes the venue documents for its REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatus {
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 429
    TooManyRequests,
    /// Any other non-success code
    Other(u16),
}

impl HttpStatus {
    /// Classify a raw status code
    pub fn from_code(code: u16) -> Self {
        match code {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            429 => Self::TooManyRequests,
            other => Self::Other(other),
        }
    }

    /// The numeric code
    pub fn code(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::TooManyRequests => 429,
            Self::Other(code) => *code,
        }
    }
}

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credentials could not be loaded
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// API answered with a non-success status
    #[error("API error ({}): {message}", .status.code())]
    Api {
        /// Response status
        status: HttpStatus,
        /// Error message from the response body
        message: String,
    },

    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Server handed back a continuation cursor it already issued
    #[error("Pagination cursor repeated: {cursor}")]
    RepeatedCursor {
        /// The repeated `nextBatchPrevId` value
        cursor: String,
    },

    /// Invalid request parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl RestError {
    /// Build an API error from a status code and raw response body
    ///
    /// The venue returns `{"error": ...}` or `{"message": ...}` bodies; any
    /// other body is kept verbatim.
    pub fn from_response(code: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["message", "error"]
                    .iter()
                    .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
            })
            .unwrap_or_else(|| body.trim().to_string());

        Self::Api {
            status: HttpStatus::from_code(code),
            message,
        }
    }

    /// Status of an API error
    pub fn status(&self) -> Option<HttpStatus> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| HttpStatus::from_code(s.as_u16())),
            _ => None,
        }
    }

    /// Check if the request was rejected as a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.status()
            .map(|s| (400..500).contains(&s.code()))
            .unwrap_or(false)
    }

    /// Check if the access token was rejected
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(HttpStatus::Unauthorized) | Some(HttpStatus::Forbidden)
        )
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
