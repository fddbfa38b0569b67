//! Price level types with decimal precision

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single `[price, size]` entry of an order book side
///
/// The venue encodes both values as decimal strings in a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel(pub Decimal, pub Decimal);

impl PriceLevel {
    /// Create a new price level
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self(price, size)
    }

    /// Price of this level
    pub fn price(&self) -> Decimal {
        self.0
    }

    /// Size resting at this price
    pub fn size(&self) -> Decimal {
        self.1
    }

    /// Notional value (price * size)
    pub fn notional(&self) -> Decimal {
        self.0 * self.1
    }
}

/// Best bid (first entry) of a descending bid side
pub fn best_bid(bids: &[PriceLevel]) -> Option<&PriceLevel> {
    bids.first()
}

/// Best ask (first entry) of an ascending ask side
pub fn best_ask(asks: &[PriceLevel]) -> Option<&PriceLevel> {
    asks.first()
}
