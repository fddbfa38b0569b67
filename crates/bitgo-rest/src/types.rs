//! Types for REST API requests and responses

use bitgo_types::{OrderType, PriceLevel, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ============================================================================
// Response Wrapper
// ============================================================================

/// `{"data": [...]}` envelope used by non-paginated list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct DataResponse<T> {
    /// Wrapped records
    pub data: Vec<T>,
}

// ============================================================================
// Account Types
// ============================================================================

/// Public information about the authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User id
    pub id: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email address
    pub email: String,
}

/// Trading account the user belongs to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    /// Account id used in every account-scoped path
    pub id: String,
    /// Display name
    pub name: String,
}

/// Balance of one currency in a trading account
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    /// Currency id
    pub currency_id: String,
    /// Currency symbol, e.g. "BTC"
    pub currency: String,
    /// Total balance
    pub balance: Decimal,
    /// Amount reserved by open orders
    pub held_balance: Decimal,
    /// Amount available for new orders
    pub tradable_balance: Decimal,
}

// ============================================================================
// Trading Types
// ============================================================================

/// Order as reported by the REST API
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Venue order id
    pub id: String,
    /// Trading account
    pub account_id: String,
    /// Client-assigned order id
    #[serde(default)]
    pub client_order_id: Option<String>,
    /// Last update time
    pub time: DateTime<Utc>,
    /// Creation time
    pub creation_date: DateTime<Utc>,
    /// Scheduled start (TWAP)
    #[serde(default)]
    pub scheduled_date: Option<DateTime<Utc>>,
    /// Time of the most recent fill
    #[serde(default)]
    pub last_fill_date: Option<DateTime<Utc>>,
    /// Completion time
    #[serde(default)]
    pub completion_date: Option<DateTime<Utc>>,
    /// Settlement time
    #[serde(default)]
    pub settle_date: Option<DateTime<Utc>>,
    /// Order type
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Funding type (margin, funded)
    pub funding_type: String,
    /// Lifecycle status
    pub status: String,
    /// Product, e.g. "BTC-USD"
    pub product: String,
    /// Order side
    pub side: Side,
    /// Requested quantity
    pub quantity: Decimal,
    /// Currency the quantity is expressed in
    pub quantity_currency: String,
    /// Quantity filled so far
    pub filled_quantity: Decimal,
    /// Average fill price
    pub average_price: Decimal,
}

impl Order {
    /// Quantity not yet filled
    pub fn remaining_quantity(&self) -> Decimal {
        (self.quantity - self.filled_quantity).max(Decimal::ZERO)
    }
}

/// Executed trade
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Trade id
    pub id: String,
    /// Order the trade belongs to
    pub order_id: String,
    /// Execution time
    pub time: DateTime<Utc>,
    /// Product, e.g. "BTC-USD"
    pub product: String,
    /// Trade side
    pub side: Side,
    /// Execution price
    pub price: Decimal,
    /// Executed quantity
    pub quantity: Decimal,
    /// Whether the trade has settled
    pub settled: bool,
}

/// New order request
///
/// Build with [`OrderRequest::market`], [`OrderRequest::limit`] or
/// [`OrderRequest::twap`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Client-assigned order id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    /// Product, e.g. "BTC-USD"
    pub product: String,
    /// Order type
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Order side
    pub side: Side,
    /// Quantity, in quote currency for buys and base currency for sells
    pub quantity: Decimal,
    /// Currency the quantity is expressed in
    pub quantity_currency: String,
    /// Limit price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_price: Option<Decimal>,
    /// Duration in minutes (limit expiry or TWAP length)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// TWAP slice interval in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    /// Scheduled start (TWAP)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_date: Option<DateTime<Utc>>,
}

impl OrderRequest {
    fn base(
        order_type: OrderType,
        product: impl Into<String>,
        side: Side,
        quantity: Decimal,
        quantity_currency: impl Into<String>,
    ) -> Self {
        Self {
            client_order_id: None,
            product: product.into(),
            order_type,
            side,
            quantity,
            quantity_currency: quantity_currency.into(),
            limit_price: None,
            duration: None,
            interval: None,
            schedule_date: None,
        }
    }

    /// Market order
    pub fn market(
        product: impl Into<String>,
        side: Side,
        quantity: Decimal,
        quantity_currency: impl Into<String>,
    ) -> Self {
        Self::base(OrderType::Market, product, side, quantity, quantity_currency)
    }

    /// Limit order
    pub fn limit(
        product: impl Into<String>,
        side: Side,
        quantity: Decimal,
        quantity_currency: impl Into<String>,
        limit_price: Decimal,
    ) -> Self {
        let mut order = Self::base(OrderType::Limit, product, side, quantity, quantity_currency);
        order.limit_price = Some(limit_price);
        order
    }

    /// TWAP order running for `duration` minutes in `interval` minute slices
    pub fn twap(
        product: impl Into<String>,
        side: Side,
        quantity: Decimal,
        quantity_currency: impl Into<String>,
        duration: u32,
        interval: u32,
    ) -> Self {
        let mut order = Self::base(OrderType::Twap, product, side, quantity, quantity_currency);
        order.duration = Some(duration);
        order.interval = Some(interval);
        order
    }

    /// Set the client order id
    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }

    /// Set the duration in minutes
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    /// Set a limit price (limit TWAP)
    pub fn with_limit_price(mut self, price: Decimal) -> Self {
        self.limit_price = Some(price);
        self
    }

    /// Schedule a TWAP start time
    pub fn with_schedule_date(mut self, date: DateTime<Utc>) -> Self {
        self.schedule_date = Some(date);
        self
    }

    /// Check the request before it is sent
    pub fn validate(&self) -> Result<(), String> {
        if self.quantity <= Decimal::ZERO {
            return Err("quantity must be positive".to_string());
        }
        if self.product.is_empty() {
            return Err("product must not be empty".to_string());
        }
        match self.order_type {
            OrderType::Limit if self.limit_price.is_none() => {
                Err("limit orders require a limit price".to_string())
            }
            OrderType::Twap if self.duration.is_none() || self.interval.is_none() => {
                Err("TWAP orders require a duration and an interval".to_string())
            }
            OrderType::Unknown => Err("order type is not supported".to_string()),
            _ => Ok(()),
        }
    }
}

/// Filters for listing orders
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    /// Offset of the first order
    pub offset: Option<u32>,
    /// Maximum number of orders per page
    pub limit: Option<u32>,
    /// Only orders with this client order id
    pub client_order_id: Option<String>,
    /// Created at or after
    pub date_gte: Option<DateTime<Utc>>,
    /// Created before
    pub date_lt: Option<DateTime<Utc>>,
}

impl OrderQuery {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the starting offset
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Filter by client order id
    pub fn with_client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }

    /// Restrict to `[from, to)`
    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.date_gte = Some(from);
        self.date_lt = Some(to);
        self
    }

    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push("offset", self.offset);
        params.push("limit", self.limit);
        params.push("clientOrderId", self.client_order_id.as_ref());
        params.push_date("dateGte", self.date_gte);
        params.push_date("dateLt", self.date_lt);
        params.into_inner()
    }
}

/// Filters for listing trades
#[derive(Debug, Clone, Default)]
pub struct TradeQuery {
    /// Offset of the first trade
    pub offset: Option<u32>,
    /// Maximum number of trades per page
    pub limit: Option<u32>,
    /// Only trades of this order
    pub order_id: Option<String>,
    /// Traded at or after
    pub date_gte: Option<DateTime<Utc>>,
    /// Traded before
    pub date_lt: Option<DateTime<Utc>>,
}

impl TradeQuery {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the starting offset
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Filter by order id
    pub fn with_order_id(mut self, id: impl Into<String>) -> Self {
        self.order_id = Some(id.into());
        self
    }

    /// Restrict to `[from, to)`
    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.date_gte = Some(from);
        self.date_lt = Some(to);
        self
    }

    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push("offset", self.offset);
        params.push("limit", self.limit);
        params.push("orderId", self.order_id.as_ref());
        params.push_date("dateGte", self.date_gte);
        params.push_date("dateLt", self.date_lt);
        params.into_inner()
    }
}

/// Query string builder that drops unset parameters
#[derive(Debug, Default)]
struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
    fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, key: &'static str, value: Option<impl ToString>) {
        if let Some(value) = value {
            self.0.push((key, value.to_string()));
        }
    }

    fn push_date(&mut self, key: &'static str, value: Option<DateTime<Utc>>) {
        self.push(key, value.map(|d| d.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)));
    }

    fn into_inner(self) -> Vec<(&'static str, String)> {
        self.0
    }
}

// ============================================================================
// Market Data Types
// ============================================================================

/// Currency available to an account
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Currency {
    /// Currency id
    pub id: String,
    /// Ticker symbol, e.g. "BTC"
    pub symbol: String,
    /// Display name
    pub name: String,
}

/// Tradable product
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product id
    pub id: String,
    /// Product name, e.g. "BTC-USD"
    pub name: String,
    /// Base currency id
    pub base_currency_id: String,
    /// Base currency symbol
    pub base_currency: String,
    /// Quote currency id
    pub quote_currency_id: String,
    /// Quote currency symbol
    pub quote_currency: String,
    /// Minimum order size in base currency
    pub base_min_size: Decimal,
    /// Maximum order size in base currency
    #[serde(default)]
    pub base_max_size: Option<Decimal>,
    /// Base currency increment
    #[serde(default)]
    pub base_increment: Option<Decimal>,
    /// Minimum order size in quote currency
    pub quote_min_size: Decimal,
    /// Quote currency increment
    pub quote_increment: Decimal,
    /// Trading halted for this product
    pub is_trade_disabled: bool,
}

/// Top of book for a product
///
/// Only the routing fields are typed; quote fields are kept as returned.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Level1 {
    /// Snapshot time
    pub time: DateTime<Utc>,
    /// Product, e.g. "BTC-USD"
    pub product: String,
    /// Remaining quote fields
    #[serde(flatten)]
    pub quote: serde_json::Map<String, serde_json::Value>,
}

/// Level 2 order book snapshot for a product
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Level2 {
    /// Snapshot time
    pub time: DateTime<Utc>,
    /// Product, e.g. "BTC-USD"
    pub product: String,
    /// Bids, best first
    pub bids: Vec<PriceLevel>,
    /// Asks, best first
    pub asks: Vec<PriceLevel>,
}

impl Level2 {
    /// Mid price of the best bid and ask
    pub fn mid_price(&self) -> Option<Decimal> {
        let bid = self.bids.first()?.price();
        let ask = self.asks.first()?.price();
        Some((bid + ask) / Decimal::TWO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_limit_order_serialization() {
        let order = OrderRequest::limit("BTC-USD", Side::Buy, dec!(0.5), "BTC", dec!(43000))
            .with_client_order_id("my-1");
        let value = serde_json::to_value(&order).unwrap();

        assert_eq!(
            value,
            json!({
                "clientOrderId": "my-1",
                "product": "BTC-USD",
                "type": "limit",
                "side": "buy",
                "quantity": "0.5",
                "quantityCurrency": "BTC",
                "limitPrice": "43000"
            })
        );
        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_twap_order_fields() {
        let order = OrderRequest::twap("ETH-USD", Side::Sell, dec!(10), "ETH", 60, 5)
            .with_limit_price(dec!(2500));
        let value = serde_json::to_value(&order).unwrap();

        assert_eq!(value["type"], "twap");
        assert_eq!(value["duration"], 60);
        assert_eq!(value["interval"], 5);
        assert_eq!(value["limitPrice"], "2500");
        assert!(value.get("scheduleDate").is_none());
    }

    #[test]
    fn test_validate_rejects_incomplete_orders() {
        let mut order = OrderRequest::limit("BTC-USD", Side::Buy, dec!(1), "BTC", dec!(1));
        order.limit_price = None;
        assert!(order.validate().is_err());

        let zero = OrderRequest::market("BTC-USD", Side::Sell, Decimal::ZERO, "BTC");
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_order_query_params_skip_unset() {
        let from = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2022, 2, 1, 0, 0, 0).unwrap();
        let params = OrderQuery::new().with_limit(50).between(from, to).to_params();

        assert_eq!(
            params,
            vec![
                ("limit", "50".to_string()),
                ("dateGte", "2022-01-01T00:00:00.000Z".to_string()),
                ("dateLt", "2022-02-01T00:00:00.000Z".to_string()),
            ]
        );
        assert!(TradeQuery::new().to_params().is_empty());
    }

    #[test]
    fn test_order_deserialize() {
        let order: Order = serde_json::from_value(json!({
            "id": "o-1",
            "accountId": "acct1",
            "clientOrderId": null,
            "time": "2022-03-01T12:00:00.000Z",
            "creationDate": "2022-03-01T11:59:00.000Z",
            "scheduledDate": null,
            "lastFillDate": "2022-03-01T12:00:00.000Z",
            "completionDate": null,
            "settleDate": null,
            "type": "market",
            "fundingType": "funded",
            "status": "completed",
            "product": "BTC-USD",
            "side": "sell",
            "quantity": "2",
            "quantityCurrency": "BTC",
            "filledQuantity": "1.25",
            "averagePrice": "43000.10"
        }))
        .unwrap();

        assert_eq!(order.order_type, OrderType::Market);
        assert!(order.client_order_id.is_none());
        assert_eq!(order.remaining_quantity(), dec!(0.75));
    }

    #[test]
    fn test_level1_keeps_quote_fields() {
        let level1: Level1 = serde_json::from_value(json!({
            "time": "2022-03-01T12:00:00Z",
            "product": "BTC-USD",
            "bidPrice": "43000",
            "askPrice": "43001"
        }))
        .unwrap();
        assert_eq!(level1.quote.get("askPrice"), Some(&json!("43001")));
    }

    #[test]
    fn test_level2_mid_price() {
        let book: Level2 = serde_json::from_value(json!({
            "time": "2022-03-01T12:00:00Z",
            "product": "BTC-USD",
            "bids": [["100", "1"]],
            "asks": [["102", "1"]]
        }))
        .unwrap();
        assert_eq!(book.mid_price(), Some(dec!(101)));
    }
}
