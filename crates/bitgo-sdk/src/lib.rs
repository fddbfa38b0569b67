//! High-level SDK for the BitGo Prime trading APIs
//!
//! This crate bundles the REST client and WebSocket sessions behind one
//! configuration: a single access token and environment.
//!
//! # Quick Start
//!
//! ```no_run
//! use bitgo_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads BITGO_ACCESS_TOKEN and BITGO_ENV
//!     let client = BitgoClient::from_env()?;
//!     let account = client.rest().list_accounts().await?.remove(0);
//!
//!     // Page through order history lazily
//!     let mut pages = client.rest().list_orders(&account.id, &OrderQuery::new())?;
//!     while let Some(page) = pages.next_page().await {
//!         for order in page?.data {
//!             println!("{} {} {}", order.id, order.product, order.status);
//!         }
//!     }
//!
//!     // Stream the BTC-USD book
//!     let mut session = client.session();
//!     session.subscribe_order_book(&account.id, "BTC-USD")?;
//!     session.on_level2_snapshot(|book| {
//!         println!("{}: spread = {:?}", book.product, book.spread());
//!     });
//!     session.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - **Typed REST**: Accounts, balances, orders, trades and market data
//! - **Lazy Pagination**: One request per page, cursors followed automatically
//! - **Subscription Sessions**: Declare first, connect once, typed handlers
//! - **Keep-Alive**: Pings answered from the session loop
//! - **Redacted Secrets**: The token never shows up in logs

pub mod client;
pub mod config;
pub mod error;
pub mod prelude;

// Re-export main types
pub use client::BitgoClient;
pub use config::{ConfigError, SdkConfig, SdkConfigBuilder};
pub use error::{SdkError, SdkResult};

// Re-export commonly used types from dependencies
pub use bitgo_auth::AccessToken;
pub use bitgo_rest::{BitgoRestClient, Page, Paginator, RestError};
pub use bitgo_types::{Channel, Environment, Side};
pub use bitgo_ws::{CloseHandle, Hooks, SessionState, SubscriptionSession, WsError};
