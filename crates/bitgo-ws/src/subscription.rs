//! Subscription intents declared before the session connects

use bitgo_types::{Channel, SubscribeRequest};

/// A subscription declared on the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionIntent {
    /// Channel type
    pub channel: Channel,
    /// Trading account
    pub account_id: String,
    /// Product, for level2
    pub product_id: Option<String>,
}

impl SubscriptionIntent {
    /// Level2 order book snapshots of one product
    pub fn level2(account_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            channel: Channel::Level2,
            account_id: account_id.into(),
            product_id: Some(product_id.into()),
        }
    }

    /// Order lifecycle and fill updates of one account
    pub fn orders(account_id: impl Into<String>) -> Self {
        Self {
            channel: Channel::Orders,
            account_id: account_id.into(),
            product_id: None,
        }
    }

    /// Convert to a subscribe request
    pub fn to_request(&self) -> SubscribeRequest {
        match (&self.channel, &self.product_id) {
            (Channel::Level2, Some(product)) => {
                SubscribeRequest::level2(self.account_id.clone(), product.clone())
            }
            _ => SubscribeRequest {
                kind: "subscribe",
                account_id: self.account_id.clone(),
                channel: self.channel,
                product_id: self.product_id.clone(),
            },
        }
    }
}

/// Ordered list of intents, replayed on connect
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    intents: Vec<SubscriptionIntent>,
}

impl SubscriptionManager {
    /// Create a new subscription manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an intent; duplicates are kept
    pub fn add(&mut self, intent: SubscriptionIntent) {
        self.intents.push(intent);
    }

    /// All intents in declaration order
    pub fn all(&self) -> &[SubscriptionIntent] {
        &self.intents
    }

    /// Number of declared intents
    pub fn count(&self) -> usize {
        self.intents.len()
    }

    /// Subscribe requests for every intent, in declaration order
    pub fn requests(&self) -> Vec<SubscribeRequest> {
        self.intents.iter().map(SubscriptionIntent::to_request).collect()
    }
}
