//! Re-exports for convenience
//!
//! Import everything you need with:
//! ```
//! use bitgo_sdk::prelude::*;
//! ```

// Client
pub use crate::client::BitgoClient;
pub use crate::config::{ConfigError, SdkConfig};
pub use crate::error::{SdkError, SdkResult};

// Authentication
pub use bitgo_auth::{AccessToken, AuthError};

// Types from bitgo-types
pub use bitgo_types::{
    Channel, Environment, OrderType, PriceLevel, Side,
    // WebSocket frames
    Level2Error, Level2Snapshot, OrderUpdate, SubscribeRequest,
};

// REST types
pub use bitgo_rest::{
    BitgoRestClient, ClientConfig, HttpStatus, Page, PagedRequest, Paginator, RestError,
    // Account
    Account, Balance, User,
    // Trading
    Order, OrderQuery, OrderRequest, Trade, TradeQuery,
    // Market data
    Currency, Level1, Level2, Product,
};

// WebSocket types
pub use bitgo_ws::{
    CloseHandle, ConnectInfo, DisconnectInfo, Hooks, SessionConfig, SessionEvent, SessionFault, SessionState,
    SubscriptionSession, WsError,
};

// Decimal for prices/quantities
pub use rust_decimal::Decimal;
