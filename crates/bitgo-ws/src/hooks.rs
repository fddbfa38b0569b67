//! Session event listeners
//!
//! The session never prints. Everything a caller may want to observe about a
//! session (handshake, inbound traffic, faults, disconnection) is emitted as a
//! [`SessionEvent`] to the listeners registered on [`Hooks`].
//!
//! # Example
//!
//! ```
//! use bitgo_ws::hooks::{Hooks, SessionEvent};
//!
//! let hooks = Hooks::new()
//!     .on_connect(|info| println!("open: {} subscriptions", info.subscriptions))
//!     .on_error(|fault| eprintln!("fault: {}", fault))
//!     .on_event(|event| {
//!         if let SessionEvent::Disconnected(reason) = event {
//!             eprintln!("gone: {:?}", reason);
//!         }
//!     });
//!
//! assert_eq!(hooks.len(), 3);
//! ```

use std::fmt;
use std::sync::Arc;

/// Handshake result reported once the subscriptions are sent
#[derive(Debug, Clone)]
pub struct ConnectInfo {
    /// WebSocket URL
    pub endpoint: String,
    /// Number of subscribe requests replayed
    pub subscriptions: usize,
}

/// Why an open session stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectInfo {
    /// Server ended the connection
    ServerClosed,
    /// Transport failed; carries the transport error text
    NetworkError(String),
    /// Closed through [`close`](crate::SubscriptionSession::close) or a close handle
    Shutdown,
}

/// Non-fatal and fatal problems seen by a session
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionFault {
    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error("{0}")]
    Transport(String),

    /// Frame was not a JSON object with a channel
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// Frame did not match the registered handler's type
    #[error("undecodable frame: {0}")]
    UndecodableFrame(String),

    #[error("handler panicked: {0}")]
    HandlerPanicked(String),
}

impl SessionFault {
    /// Returns true if the session stopped because of this fault
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionFault::Handshake(_) | SessionFault::Transport(_))
    }
}

/// Something that happened on a session
#[derive(Debug, Clone, Copy)]
pub enum SessionEvent<'a> {
    /// Handshake done and subscriptions sent
    Connected(&'a ConnectInfo),
    /// Text frame received, before dispatch; carries its size in bytes
    FrameReceived(usize),
    /// A fault occurred
    Fault(&'a SessionFault),
    /// An open session stopped
    Disconnected(&'a DisconnectInfo),
}

type Listener = Arc<dyn Fn(&SessionEvent<'_>) + Send + Sync>;

/// Listeners attached to a session
///
/// Listeners run synchronously on the session loop in registration order.
/// A slow listener delays pong replies.
#[derive(Clone, Default)]
pub struct Hooks {
    listeners: Vec<Listener>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen to every event
    pub fn on_event<F>(mut self, f: F) -> Self
    where
        F: Fn(&SessionEvent<'_>) + Send + Sync + 'static,
    {
        self.listeners.push(Arc::new(f));
        self
    }

    /// Listen to successful connections
    pub fn on_connect<F>(self, f: F) -> Self
    where
        F: Fn(&ConnectInfo) + Send + Sync + 'static,
    {
        self.on_event(move |event| {
            if let SessionEvent::Connected(info) = event {
                f(*info);
            }
        })
    }

    /// Listen to inbound text frames by size
    pub fn on_message<F>(self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.on_event(move |event| {
            if let SessionEvent::FrameReceived(bytes) = event {
                f(*bytes);
            }
        })
    }

    /// Listen to faults
    ///
    /// Failed handshakes, transport failures, dropped frames and panicking
    /// handlers all end up here.
    pub fn on_error<F>(self, f: F) -> Self
    where
        F: Fn(&SessionFault) + Send + Sync + 'static,
    {
        self.on_event(move |event| {
            if let SessionEvent::Fault(fault) = event {
                f(*fault);
            }
        })
    }

    /// Listen to the end of an open session
    pub fn on_disconnect<F>(self, f: F) -> Self
    where
        F: Fn(&DisconnectInfo) + Send + Sync + 'static,
    {
        self.on_event(move |event| {
            if let SessionEvent::Disconnected(reason) = event {
                f(*reason);
            }
        })
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub(crate) fn emit(&self, event: SessionEvent<'_>) {
        for listener in &self.listeners {
            listener(&event);
        }
    }

    pub(crate) fn fault(&self, fault: SessionFault) {
        self.emit(SessionEvent::Fault(&fault));
    }

    pub(crate) fn disconnected(&self, reason: DisconnectInfo) {
        self.emit(SessionEvent::Disconnected(&reason));
    }
}
