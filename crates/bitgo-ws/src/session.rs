//! Subscription session over the trading WebSocket
//!
//! A session is declared first (subscriptions and handlers), then connected
//! once. Every declared subscription is sent right after the handshake, in
//! declaration order, and inbound frames are dispatched one at a time in
//! arrival order until the connection ends or the session is closed.

use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::error::{WsError, WsResult};
use crate::hooks::{ConnectInfo, DisconnectInfo, Hooks, SessionEvent, SessionFault};
use crate::subscription::{SubscriptionIntent, SubscriptionManager};
use crate::transport::{Transport, TransportError, TransportEvent, WsTransport, DEFAULT_CONNECT_TIMEOUT};

use bitgo_auth::AccessToken;
use bitgo_types::{Channel, Environment, Level2Error, Level2Snapshot, OrderUpdate};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, error, info, trace, warn};

const LEVEL2_SNAPSHOT: &str = "snapshot";
const LEVEL2_ERROR: &str = "error";

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting subscriptions, nothing sent yet
    Unconnected,
    /// Handshake in progress
    Connecting,
    /// Connected, subscriptions sent
    Open,
    /// Handshake failed
    Failed,
    /// Connection ended or session closed
    Closed,
}

impl SessionState {
    /// Returns true once no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Failed | SessionState::Closed)
    }
}

/// Configuration for a [`SubscriptionSession`]
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// WebSocket URL
    pub url: String,
    /// Handshake timeout
    pub connect_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Production)
    }
}

impl SessionConfig {
    /// Create a new config for production
    pub fn new() -> Self {
        Self::default()
    }

    /// Config pointing at the given environment
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            url: environment.ws_url().to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Override the WebSocket URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Cloneable handle that closes a session from another task
///
/// The request takes effect at the session loop's next iteration; a frame
/// that is being dispatched finishes first.
#[derive(Debug, Clone)]
pub struct CloseHandle {
    requested: Arc<AtomicBool>,
    notify: Arc<Notify>,
    state: Arc<RwLock<SessionState>>,
}

impl CloseHandle {
    fn new(state: Arc<RwLock<SessionState>>) -> Self {
        Self {
            requested: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
            state,
        }
    }

    /// Request the session to close
    pub fn close(&self) {
        if !self.requested.swap(true, Ordering::SeqCst) {
            debug!("Session close requested");
        }
        self.notify.notify_one();
    }

    /// Check if close was requested
    pub fn is_close_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Current state of the session
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }
}

/// Long-lived subscription session
///
/// # Example
///
/// ```no_run
/// use bitgo_auth::AccessToken;
/// use bitgo_ws::{SessionConfig, SubscriptionSession};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let token = AccessToken::from_env()?;
///     let mut session = SubscriptionSession::new(token, SessionConfig::default());
///
///     session.subscribe_order_book("acct1", "BTC-USD")?;
///     session.on_level2_snapshot(|book| {
///         println!("{} spread {:?}", book.product, book.spread());
///     });
///
///     let handle = session.close_handle();
///     tokio::spawn(async move {
///         tokio::time::sleep(std::time::Duration::from_secs(30)).await;
///         handle.close();
///     });
///
///     session.run().await?;
///     Ok(())
/// }
/// ```
pub struct SubscriptionSession<T = WsTransport> {
    transport: T,
    state: Arc<RwLock<SessionState>>,
    subscriptions: SubscriptionManager,
    dispatcher: Dispatcher,
    hooks: Hooks,
    close: CloseHandle,
}

impl SubscriptionSession<WsTransport> {
    /// Create a session authenticated with `token`
    pub fn new(token: AccessToken, config: SessionConfig) -> Self {
        let transport = WsTransport::new(config.url)
            .with_token(token)
            .with_timeout(config.connect_timeout);
        Self::with_transport(transport)
    }
}

impl<T: Transport> SubscriptionSession<T> {
    /// Create a session over a custom transport
    pub fn with_transport(transport: T) -> Self {
        let state = Arc::new(RwLock::new(SessionState::Unconnected));
        Self {
            transport,
            close: CloseHandle::new(state.clone()),
            state,
            subscriptions: SubscriptionManager::new(),
            dispatcher: Dispatcher::new(),
            hooks: Hooks::default(),
        }
    }

    /// Attach observability hooks
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Get the current session state
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    /// Handle for closing the session from another task
    pub fn close_handle(&self) -> CloseHandle {
        self.close.clone()
    }

    /// Declared subscriptions, in declaration order
    pub fn subscriptions(&self) -> &[SubscriptionIntent] {
        self.subscriptions.all()
    }

    /// WebSocket URL
    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Subscribe to level2 order book snapshots of a product
    pub fn subscribe_order_book(
        &mut self,
        account_id: impl Into<String>,
        product_id: impl Into<String>,
    ) -> WsResult<()> {
        self.subscribe(SubscriptionIntent::level2(account_id, product_id))
    }

    /// Subscribe to order lifecycle and fill updates of an account
    pub fn subscribe_orders(&mut self, account_id: impl Into<String>) -> WsResult<()> {
        self.subscribe(SubscriptionIntent::orders(account_id))
    }

    fn subscribe(&mut self, intent: SubscriptionIntent) -> WsResult<()> {
        self.expect_state("subscribe", SessionState::Unconnected)?;
        debug!(channel = %intent.channel, account_id = %intent.account_id, product_id = ?intent.product_id, "Subscription queued");
        self.subscriptions.add(intent);
        Ok(())
    }

    // ========================================================================
    // Handlers
    // ========================================================================

    /// Handle level2 snapshots
    pub fn on_level2_snapshot<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(Level2Snapshot) + Send + 'static,
    {
        self.dispatcher
            .register(Channel::Level2.as_str(), Some(LEVEL2_SNAPSHOT.to_string()), handler);
        self
    }

    /// Handle level2 channel errors, such as an unknown product
    pub fn on_level2_error<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(Level2Error) + Send + 'static,
    {
        self.dispatcher
            .register(Channel::Level2.as_str(), Some(LEVEL2_ERROR.to_string()), handler);
        self
    }

    /// Handle order updates
    ///
    /// Order frames carry the order type in `type`, so this handler covers
    /// every type on the orders channel.
    pub fn on_order<F>(&mut self, handler: F) -> &mut Self
    where
        F: FnMut(OrderUpdate) + Send + 'static,
    {
        self.dispatcher.register(Channel::Orders.as_str(), None, handler);
        self
    }

    /// Handle raw frames with the given channel and type
    pub fn on<F>(&mut self, channel: impl Into<String>, kind: impl Into<String>, handler: F) -> &mut Self
    where
        F: FnMut(&Value) + Send + 'static,
    {
        self.dispatcher.register_raw(channel, Some(kind.into()), handler);
        self
    }

    /// Handle raw frames of a channel that no typed or exact handler matches
    pub fn on_channel<F>(&mut self, channel: impl Into<String>, handler: F) -> &mut Self
    where
        F: FnMut(&Value) + Send + 'static,
    {
        self.dispatcher.register_raw(channel, None, handler);
        self
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Open the connection and send every declared subscription
    ///
    /// A handshake failure leaves the session [`SessionState::Failed`].
    pub async fn connect(&mut self) -> WsResult<()> {
        if self.close.is_close_requested() {
            self.set_state(SessionState::Closed);
        }
        self.expect_state("connect", SessionState::Unconnected)?;

        let frames = self
            .subscriptions
            .requests()
            .iter()
            .map(|request| request.to_json())
            .collect::<Result<Vec<_>, _>>()?;

        self.set_state(SessionState::Connecting);
        let url = self.transport.endpoint().to_string();
        info!(url = %url, subscriptions = frames.len(), "Connecting");

        if let Err(e) = self.transport.connect().await {
            let err = match e {
                TransportError::Timeout(timeout) => WsError::ConnectionTimeout { url, timeout },
                other => WsError::ConnectionFailed {
                    url,
                    reason: other.to_string(),
                },
            };
            error!(error = %err, "Handshake failed");
            self.set_state(SessionState::Failed);
            self.hooks.fault(SessionFault::Handshake(err.to_string()));
            return Err(err);
        }

        for frame in &frames {
            debug!("Sending subscription: {}", frame);
            if let Err(e) = self.transport.send(frame).await {
                return Err(self.abort(e).await);
            }
        }

        self.set_state(SessionState::Open);
        info!(url = %url, "Session open");
        self.hooks.emit(SessionEvent::Connected(&ConnectInfo {
            endpoint: url,
            subscriptions: frames.len(),
        }));
        Ok(())
    }

    /// Process inbound frames until the session is closed
    ///
    /// Connects first when still unconnected. Returns `Ok` when the server
    /// closed the connection or [`close`](Self::close) was requested, and
    /// the error when the transport failed. The session is
    /// [`SessionState::Closed`] afterwards; it never reconnects.
    pub async fn run(&mut self) -> WsResult<()> {
        if self.close.is_close_requested() {
            return self.shutdown().await;
        }

        match self.state() {
            SessionState::Unconnected => self.connect().await?,
            SessionState::Open => {}
            state => {
                return Err(WsError::InvalidState {
                    operation: "run",
                    state,
                })
            }
        }

        loop {
            if self.close.is_close_requested() {
                return self.shutdown().await;
            }

            let event = tokio::select! {
                biased;
                _ = self.close.notify.notified() => continue,
                event = self.transport.recv() => event,
            };

            match event {
                Ok(Some(TransportEvent::Ping(payload))) => {
                    trace!(len = payload.len(), "Answering ping");
                    if let Err(e) = self.transport.send_pong(payload).await {
                        return Err(self.abort(e).await);
                    }
                }
                Ok(Some(TransportEvent::Text(text))) => self.handle_frame(&text),
                Ok(None) => {
                    info!("Server closed connection");
                    self.set_state(SessionState::Closed);
                    self.hooks.disconnected(DisconnectInfo::ServerClosed);
                    return Ok(());
                }
                Err(e) => return Err(self.abort(e).await),
            }
        }
    }

    /// Close the session from any state
    pub async fn close(&mut self) -> WsResult<()> {
        self.close.close();
        self.shutdown().await
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn handle_frame(&mut self, text: &str) {
        self.hooks.emit(SessionEvent::FrameReceived(text.len()));

        match self.dispatcher.dispatch(text) {
            DispatchOutcome::Handled => {}
            DispatchOutcome::System => debug!("System frame acknowledged"),
            DispatchOutcome::Unrouted { channel, kind } => {
                debug!(?channel, ?kind, "No handler for frame, dropped");
            }
            DispatchOutcome::Malformed(reason) => {
                warn!("Malformed frame dropped: {} - {}", reason, text);
                self.hooks.fault(SessionFault::MalformedFrame(reason));
            }
            DispatchOutcome::DecodeFailed(reason) => {
                warn!("Failed to decode frame: {} - {}", reason, text);
                self.hooks.fault(SessionFault::UndecodableFrame(reason));
            }
            DispatchOutcome::HandlerPanicked(message) => {
                error!(panic = %message, "Frame handler panicked");
                self.hooks.fault(SessionFault::HandlerPanicked(message));
            }
        }
    }

    /// Tear down after a transport failure on an established connection
    async fn abort(&mut self, e: TransportError) -> WsError {
        error!(error = %e, "WebSocket error");
        if self.transport.is_connected() {
            let _ = self.transport.close().await;
        }
        self.set_state(SessionState::Closed);
        self.hooks.fault(SessionFault::Transport(e.to_string()));
        self.hooks.disconnected(DisconnectInfo::NetworkError(e.to_string()));
        WsError::Transport(e)
    }

    async fn shutdown(&mut self) -> WsResult<()> {
        let was_open = self.state() == SessionState::Open;
        if self.transport.is_connected() {
            if let Err(e) = self.transport.close().await {
                warn!(error = %e, "Error closing WebSocket");
            }
        }
        self.set_state(SessionState::Closed);
        if was_open {
            info!("Session closed");
            self.hooks.disconnected(DisconnectInfo::Shutdown);
        }
        Ok(())
    }

    fn expect_state(&self, operation: &'static str, expected: SessionState) -> WsResult<()> {
        let state = self.state();
        if state != expected {
            return Err(WsError::InvalidState { operation, state });
        }
        Ok(())
    }

    fn set_state(&self, state: SessionState) {
        let mut current = self.state.write();
        let previous = *current;
        if previous != state {
            trace!(from = ?previous, to = ?state, "Session state change");
            *current = state;
        }
    }
}

impl<T: Transport> std::fmt::Debug for SubscriptionSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionSession")
            .field("endpoint", &self.transport.endpoint())
            .field("state", &self.state())
            .field("subscriptions", &self.subscriptions)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
