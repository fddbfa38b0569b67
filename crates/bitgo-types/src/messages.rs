//! Request and response frames for the BitGo Prime trading WebSocket

use crate::error::{BitgoError, BitgoResult};
use crate::{Channel, OrderType, PriceLevel, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frame `type` value used by keep-alive and system notices
pub const SYSTEM_FRAME_TYPE: &str = "system";

// ============================================================================
// Request Types
// ============================================================================

/// Subscribe request frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    /// Always "subscribe"
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Trading account the subscription belongs to
    pub account_id: String,
    /// Channel to subscribe to
    pub channel: Channel,
    /// Product, for product-scoped channels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

impl SubscribeRequest {
    /// Subscribe to level2 snapshots of one product
    pub fn level2(account_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            kind: "subscribe",
            account_id: account_id.into(),
            channel: Channel::Level2,
            product_id: Some(product_id.into()),
        }
    }

    /// Subscribe to order updates of one account
    pub fn orders(account_id: impl Into<String>) -> Self {
        Self {
            kind: "subscribe",
            account_id: account_id.into(),
            channel: Channel::Orders,
            product_id: None,
        }
    }

    /// Encode as the JSON text sent over the socket
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ============================================================================
// Inbound Frames
// ============================================================================

/// Routing discriminators of an inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    /// `channel` field, absent on some system frames
    pub channel: Option<String>,
    /// `type` field
    pub kind: Option<String>,
}

impl FrameHeader {
    /// Read the discriminators of a decoded frame
    pub fn from_value(value: &Value) -> BitgoResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| BitgoError::UnexpectedMessage("frame is not a JSON object".into()))?;

        let field = |name: &str| object.get(name).and_then(Value::as_str).map(str::to_string);

        Ok(Self {
            channel: field("channel"),
            kind: field("type"),
        })
    }

    /// Returns true for keep-alive and system notices
    pub fn is_system(&self) -> bool {
        self.kind.as_deref() == Some(SYSTEM_FRAME_TYPE)
    }
}

/// Parse raw frame text into JSON, keeping the text on failure
pub fn parse_frame(text: &str) -> BitgoResult<Value> {
    serde_json::from_str(text).map_err(|e| BitgoError::invalid_json(&e, text))
}

/// Level2 order book snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level2Snapshot {
    /// Always "level2"
    pub channel: String,
    /// Always "snapshot"
    #[serde(rename = "type")]
    pub kind: String,
    /// Product, e.g. "BTC-USD"
    pub product: String,
    /// Snapshot time
    pub time: DateTime<Utc>,
    /// Bids, best first
    pub bids: Vec<PriceLevel>,
    /// Asks, best first
    pub asks: Vec<PriceLevel>,
}

impl Level2Snapshot {
    /// Best bid level
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        crate::level::best_bid(&self.bids)
    }

    /// Best ask level
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        crate::level::best_ask(&self.asks)
    }

    /// Ask minus bid, when both sides are present
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price() - self.best_bid()?.price())
    }
}

/// Level2 channel error notice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level2Error {
    /// Always "level2"
    pub channel: String,
    /// Always "error"
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable reason
    pub message: String,
    /// Time of the error
    pub time: DateTime<Utc>,
}

/// Order lifecycle or fill update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    /// Always "orders"
    pub channel: String,
    /// Update time
    pub time: DateTime<Utc>,
    /// Trading account
    pub account_id: String,
    /// Venue order id
    pub order_id: String,
    /// Client-assigned order id
    #[serde(default)]
    pub client_order_id: Option<String>,
    /// Product, e.g. "BTC-USD"
    pub product: String,
    /// Lifecycle status (opened, completed, canceled, error, ...)
    pub status: String,
    /// Order type
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Order side
    pub side: Side,
    /// Requested quantity
    pub quantity: Decimal,
    /// Quantity filled so far
    #[serde(default, alias = "cummulativeQuantity")]
    pub cumulative_quantity: Option<Decimal>,
    /// Average fill price so far
    #[serde(default)]
    pub average_price: Option<Decimal>,
    /// Trade id of the fill this update reports
    #[serde(default, alias = "traddeId")]
    pub trade_id: Option<String>,
    /// Quantity of this fill
    #[serde(default)]
    pub fill_quantity: Option<Decimal>,
    /// Price of this fill
    #[serde(default)]
    pub fill_price: Option<Decimal>,
}

impl OrderUpdate {
    /// Returns true when the update reports a fill
    pub fn is_fill(&self) -> bool {
        self.fill_quantity.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_level2_subscribe_frame() {
        let request = SubscribeRequest::level2("acct1", "BTC-USD");
        let value: Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "subscribe",
                "accountId": "acct1",
                "channel": "level2",
                "productId": "BTC-USD"
            })
        );
    }

    #[test]
    fn test_orders_subscribe_omits_product() {
        let json = SubscribeRequest::orders("acct1").to_json().unwrap();
        assert_eq!(json, r#"{"type":"subscribe","accountId":"acct1","channel":"orders"}"#);
    }

    #[test]
    fn test_frame_header() {
        let value = json!({"channel": "level2", "type": "snapshot"});
        let header = FrameHeader::from_value(&value).unwrap();
        assert_eq!(header.channel.as_deref(), Some("level2"));
        assert_eq!(header.kind.as_deref(), Some("snapshot"));
        assert!(!header.is_system());

        let system = FrameHeader::from_value(&json!({"type": "system", "message": "hi"})).unwrap();
        assert!(system.is_system());
        assert!(system.channel.is_none());

        assert!(FrameHeader::from_value(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_parse_frame_keeps_raw() {
        match parse_frame("{not json") {
            Err(BitgoError::InvalidJson { raw, .. }) => assert_eq!(raw.as_deref(), Some("{not json")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_level2_snapshot() {
        let snapshot: Level2Snapshot = serde_json::from_value(json!({
            "channel": "level2",
            "type": "snapshot",
            "product": "BTC-USD",
            "time": "2022-03-01T12:00:00.000Z",
            "bids": [["43000.5", "1.2"], ["42999", "0.5"]],
            "asks": [["43001", "0.3"]]
        }))
        .unwrap();

        assert_eq!(snapshot.bids.len(), 2);
        assert_eq!(snapshot.spread(), Some(dec!(0.5)));
    }

    #[test]
    fn test_order_update_with_misspelled_fields() {
        let update: OrderUpdate = serde_json::from_value(json!({
            "channel": "orders",
            "time": "2022-03-01T12:00:00Z",
            "accountId": "acct1",
            "orderId": "o-1",
            "clientOrderId": "c-1",
            "product": "BTC-USD",
            "status": "opened",
            "type": "limit",
            "side": "buy",
            "quantity": "1.5",
            "cummulativeQuantity": "0.5",
            "averagePrice": "43000",
            "traddeId": "t-9",
            "fillQuantity": "0.5",
            "fillPrice": "43000"
        }))
        .unwrap();

        assert_eq!(update.order_type, OrderType::Limit);
        assert_eq!(update.cumulative_quantity, Some(dec!(0.5)));
        assert_eq!(update.trade_id.as_deref(), Some("t-9"));
        assert!(update.is_fill());
    }
}
