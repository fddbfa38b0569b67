//! Routing of inbound frames to registered handlers
//!
//! Handlers are keyed by `(channel, type)`. A handler registered without a
//! type receives every frame of its channel that has no exact match.
//! Frames of type `system` never reach a handler.

use bitgo_types::{parse_frame, FrameHeader};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

type Handler = Box<dyn FnMut(&Value) -> Result<(), serde_json::Error> + Send>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RouteKey {
    channel: String,
    kind: Option<String>,
}

/// What happened to one inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler ran to completion
    Handled,
    /// `system` frame, dropped
    System,
    /// No handler registered for the frame's channel and type
    Unrouted {
        channel: Option<String>,
        kind: Option<String>,
    },
    /// Not a JSON object
    Malformed(String),
    /// Payload did not decode into the handler's type
    DecodeFailed(String),
    /// Handler panicked
    HandlerPanicked(String),
}

/// Handler table
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<RouteKey, Handler>,
}

impl Dispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw handler for `(channel, kind)`
    ///
    /// `kind == None` matches any type on the channel. Registering the same
    /// route twice replaces the earlier handler.
    pub fn register_raw<F>(&mut self, channel: impl Into<String>, kind: Option<String>, mut handler: F)
    where
        F: FnMut(&Value) + Send + 'static,
    {
        let key = RouteKey {
            channel: channel.into(),
            kind,
        };
        self.handlers.insert(
            key,
            Box::new(move |value| {
                handler(value);
                Ok(())
            }),
        );
    }

    /// Register a handler that receives the frame decoded as `T`
    pub fn register<T, F>(&mut self, channel: impl Into<String>, kind: Option<String>, mut handler: F)
    where
        T: DeserializeOwned,
        F: FnMut(T) + Send + 'static,
    {
        let key = RouteKey {
            channel: channel.into(),
            kind,
        };
        self.handlers.insert(
            key,
            Box::new(move |value| {
                let decoded = T::deserialize(value)?;
                handler(decoded);
                Ok(())
            }),
        );
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handler is registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Route one raw text frame
    pub fn dispatch(&mut self, text: &str) -> DispatchOutcome {
        let value = match parse_frame(text) {
            Ok(value) => value,
            Err(e) => return DispatchOutcome::Malformed(e.to_string()),
        };
        self.dispatch_value(&value)
    }

    /// Route one decoded frame
    pub fn dispatch_value(&mut self, value: &Value) -> DispatchOutcome {
        let header = match FrameHeader::from_value(value) {
            Ok(header) => header,
            Err(e) => return DispatchOutcome::Malformed(e.to_string()),
        };

        if header.is_system() {
            return DispatchOutcome::System;
        }

        let Some(handler) = self.lookup(&header) else {
            return DispatchOutcome::Unrouted {
                channel: header.channel,
                kind: header.kind,
            };
        };

        match catch_unwind(AssertUnwindSafe(|| handler(value))) {
            Ok(Ok(())) => DispatchOutcome::Handled,
            Ok(Err(e)) => DispatchOutcome::DecodeFailed(e.to_string()),
            Err(payload) => DispatchOutcome::HandlerPanicked(panic_message(payload.as_ref())),
        }
    }

    fn lookup(&mut self, header: &FrameHeader) -> Option<&mut Handler> {
        let channel = header.channel.clone()?;
        let exact = RouteKey {
            channel,
            kind: header.kind.clone(),
        };
        if self.handlers.contains_key(&exact) {
            return self.handlers.get_mut(&exact);
        }

        let wildcard = RouteKey {
            channel: exact.channel,
            kind: None,
        };
        self.handlers.get_mut(&wildcard)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
