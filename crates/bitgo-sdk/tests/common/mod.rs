//! Common test fixtures for integration tests
//!
//! Frames follow the shapes published for the trading WebSocket.

#![allow(dead_code)]

/// Level2 snapshot for BTC-USD
pub const LEVEL2_SNAPSHOT: &str = r#"{
    "channel": "level2",
    "type": "snapshot",
    "product": "BTC-USD",
    "time": "2024-03-01T10:00:00.123Z",
    "bids": [["64000.50", "0.25"], ["63999.00", "1.50"], ["63990.00", "3.00"]],
    "asks": [["64001.00", "0.40"], ["64002.25", "2.00"]]
}"#;

/// Level2 error for an unknown product
pub const LEVEL2_ERROR: &str = r#"{
    "channel": "level2",
    "type": "error",
    "message": "Product DOGE-XYZ not found",
    "time": "2024-03-01T10:00:01.000Z"
}"#;

/// Keep-alive frame
pub const SYSTEM_FRAME: &str = r#"{"type": "system", "message": "heartbeat"}"#;

/// Order opened
pub const ORDER_OPENED: &str = r#"{
    "channel": "orders",
    "type": "limit",
    "time": "2024-03-01T10:00:02.000Z",
    "accountId": "acct1",
    "orderId": "ord-1",
    "clientOrderId": "my-1",
    "product": "BTC-USD",
    "status": "opened",
    "side": "buy",
    "quantity": "0.5",
    "averagePrice": "0"
}"#;

/// Partial fill, with the venue's misspelled field names
pub const ORDER_FILLED: &str = r#"{
    "channel": "orders",
    "type": "limit",
    "time": "2024-03-01T10:00:03.000Z",
    "accountId": "acct1",
    "orderId": "ord-1",
    "product": "BTC-USD",
    "status": "opened",
    "side": "buy",
    "quantity": "0.5",
    "cummulativeQuantity": "0.2",
    "averagePrice": "64000.5",
    "traddeId": "trd-9",
    "fillQuantity": "0.2",
    "fillPrice": "64000.5"
}"#;

