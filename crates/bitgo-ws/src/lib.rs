//! WebSocket client for the BitGo Prime trading API
//!
//! This crate provides [`SubscriptionSession`], a long-lived session over
//! the trading WebSocket.
//!
//! # Features
//!
//! - Subscriptions declared before connecting, sent in order on open
//! - Frames dispatched to handlers keyed by channel and type
//! - Ping probes answered before any other outbound frame
//! - Panicking handlers isolated from the session loop
//! - Close from another task through a [`CloseHandle`]
//!
//! The session does not reconnect. Once it is closed, build a new one.
//!
//! # Example
//!
//! ```no_run
//! use bitgo_auth::AccessToken;
//! use bitgo_ws::{SessionConfig, SubscriptionSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = SubscriptionSession::new(AccessToken::from_env()?, SessionConfig::default());
//!
//!     session.subscribe_orders("acct1")?;
//!     session.on_order(|update| {
//!         println!("{} {} {}", update.order_id, update.status, update.side);
//!     });
//!
//!     session.run().await?;
//!     Ok(())
//! }
//! ```

pub mod dispatch;
pub mod error;
pub mod hooks;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod session;
pub mod subscription;
pub mod transport;

// Re-export main types
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use error::{WsError, WsResult};
pub use hooks::{ConnectInfo, DisconnectInfo, Hooks, SessionEvent, SessionFault};
pub use session::{CloseHandle, SessionConfig, SessionState, SubscriptionSession};
pub use subscription::{SubscriptionIntent, SubscriptionManager};
pub use transport::{Transport, TransportError, TransportEvent, WsTransport};

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockTransport, SentFrame, SentLog, Step};
