//! REST API client for the BitGo Prime trading venue
//!
//! This crate maps the venue's account, order, trade and market data
//! endpoints to typed async calls.
//!
//! # Features
//!
//! - **Account**: Current user, trading accounts, balances
//! - **Trading**: Place market/limit/TWAP orders, cancel, list orders and trades
//! - **Market Data**: Currencies, products, level1 and level2 snapshots
//! - **Pagination**: List endpoints return a lazy [`Paginator`] that follows
//!   `nextBatchPrevId` cursors one request per page
//!
//! # Authentication
//!
//! Every request carries `Authorization: Bearer <token>`; see
//! [`bitgo_auth::AccessToken`].
//!
//! # Example
//!
//! ```no_run
//! use bitgo_rest::{BitgoRestClient, OrderQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BitgoRestClient::from_env()?;
//!     let account = client.list_accounts().await?.remove(0);
//!
//!     let mut pages = client.list_orders(&account.id, &OrderQuery::new().with_limit(100))?;
//!     while let Some(page) = pages.next_page().await {
//!         for order in page?.data {
//!             println!("{} {} {}", order.id, order.side, order.status);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod endpoints;
pub mod error;
pub mod pagination;
pub mod types;

// Re-export main types
pub use client::{BitgoRestClient, ClientConfig};
pub use error::{HttpStatus, RestError, RestResult};
pub use pagination::{Page, PagedRequest, Paginator};

// Re-export endpoint-specific types
pub use types::{
    // Account
    Account, Balance, User,
    // Trading
    Order, OrderQuery, OrderRequest, Trade, TradeQuery,
    // Market data
    Currency, Level1, Level2, Product,
};
