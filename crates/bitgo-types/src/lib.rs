//! Shared types for the BitGo Prime trading APIs
//!
//! This crate provides the wire types used by both the REST client and the
//! WebSocket session. It has minimal dependencies and can be used
//! independently.
//!
//! # Key Types
//!
//! - [`Environment`] - Production/test hosts for REST and WebSocket
//! - [`PriceLevel`] - Order book `[price, size]` pair with decimal precision
//! - [`Channel`], [`Side`], [`OrderType`] - Wire enums
//! - [`SubscribeRequest`] - Outbound subscription frame
//! - [`FrameHeader`], [`Level2Snapshot`], [`Level2Error`], [`OrderUpdate`] - Inbound frames
//! - [`BitgoError`] - Shared error type

pub mod enums;
pub mod environment;
pub mod error;
pub mod level;
pub mod messages;

pub use enums::*;
pub use environment::*;
pub use error::*;
pub use level::*;
pub use messages::*;

// Re-export rust_decimal for users
pub use rust_decimal::Decimal;
