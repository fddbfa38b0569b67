//! Channel, Side, and OrderType enums

use serde::{Deserialize, Serialize};
use std::fmt;

/// WebSocket channel types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Level 2 order book snapshots for one product
    Level2,
    /// Order lifecycle and fill updates for one account
    Orders,
}

impl Channel {
    /// Returns the channel name as used in API messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Level2 => "level2",
            Self::Orders => "orders",
        }
    }

    /// Returns true if subscribing requires a product id
    pub fn requires_product(&self) -> bool {
        matches!(self, Self::Level2)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Returns the side name as used in API messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Market order
    Market,
    /// Limit order
    Limit,
    /// Time-weighted average price order, with or without a limit
    Twap,
    /// Any type this SDK does not model yet
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_wire_names() {
        assert_eq!(serde_json::to_string(&Channel::Level2).unwrap(), "\"level2\"");
        assert_eq!(serde_json::to_string(&Channel::Orders).unwrap(), "\"orders\"");
        assert!(Channel::Level2.requires_product());
        assert!(!Channel::Orders.requires_product());
    }

    #[test]
    fn test_side() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        let side: Side = serde_json::from_str("\"sell\"").unwrap();
        assert_eq!(side, Side::Sell);
        assert!(serde_json::from_str::<Side>("\"hold\"").is_err());
    }

    #[test]
    fn test_unknown_order_type() {
        let kind: OrderType = serde_json::from_str("\"steplimit\"").unwrap();
        assert_eq!(kind, OrderType::Unknown);
        let kind: OrderType = serde_json::from_str("\"twap\"").unwrap();
        assert_eq!(kind, OrderType::Twap);
    }
}
