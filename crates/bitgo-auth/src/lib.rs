//! Access token handling for the BitGo Prime trading APIs
//!
//! Both the REST API and the WebSocket handshake authenticate with a long-lived
//! access token sent as `Authorization: Bearer <token>`. This crate keeps the
//! token out of logs and memory dumps.
//!
//! # Example
//!
//! ```no_run
//! use bitgo_auth::AccessToken;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load token from BITGO_ACCESS_TOKEN
//!     let token = AccessToken::from_env()?;
//!     println!("{:?}", token); // prints a redacted form
//!     Ok(())
//! }
//! ```

mod error;
mod token;

pub use error::{AuthError, AuthResult};
pub use token::{AccessToken, TOKEN_ENV_VAR};
