//! WebSocket transport abstraction
//!
//! The session only talks to a [`Transport`], so its state machine can be
//! driven by a scripted transport in tests without network calls.
//!
//! # Example
//!
//! ```no_run
//! use bitgo_ws::transport::{Transport, TransportError, TransportEvent, WsTransport};
//!
//! async fn example() -> Result<(), TransportError> {
//!     let mut transport = WsTransport::new("wss://app.bitgo.com/api/prime/trading/v1/ws");
//!     transport.connect().await?;
//!     transport.send(r#"{"type":"subscribe","accountId":"acct1","channel":"orders"}"#).await?;
//!     while let Some(event) = transport.recv().await? {
//!         match event {
//!             TransportEvent::Text(text) => println!("Received: {}", text),
//!             TransportEvent::Ping(payload) => transport.send_pong(payload).await?,
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use bitgo_auth::AccessToken;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{header::AUTHORIZATION, HeaderValue};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, instrument, trace};

/// Default handshake timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure below the session: socket, TLS or WebSocket framing
#[derive(Error, Debug)]
pub enum TransportError {
    /// Handshake rejected or URL unusable
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Stream ended without a close frame
    #[error("connection closed")]
    ConnectionClosed,

    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// Handshake did not finish in time
    #[error("connection timeout after {0:?}")]
    Timeout(Duration),

    /// I/O attempted before `connect` or after `close`
    #[error("not connected")]
    NotConnected,

    /// Binary frame that is not UTF-8
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Inbound event delivered by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// UTF-8 text frame
    Text(String),
    /// Keep-alive probe that must be answered with a pong
    Ping(Vec<u8>),
}

/// Connection the session reads from and writes to
#[async_trait]
pub trait Transport: Send {
    /// Open the connection, performing the handshake
    async fn connect(&mut self) -> Result<(), TransportError>;

    /// Send a text frame
    async fn send(&mut self, message: &str) -> Result<(), TransportError>;

    /// Answer a ping probe
    async fn send_pong(&mut self, payload: Vec<u8>) -> Result<(), TransportError>;

    /// Receive the next inbound event
    ///
    /// Returns `None` if the remote side closed the connection.
    async fn recv(&mut self) -> Result<Option<TransportEvent>, TransportError>;

    /// Close the connection gracefully
    async fn close(&mut self) -> Result<(), TransportError>;

    /// Check if currently connected
    fn is_connected(&self) -> bool;

    /// WebSocket URL
    fn endpoint(&self) -> &str;
}

/// tokio-tungstenite connection to the trading WebSocket
///
/// The access token, when set, is sent as `Authorization: Bearer <token>` on
/// the handshake request.
pub struct WsTransport {
    url: String,
    token: Option<AccessToken>,
    stream: Option<WebSocketStream<MaybeTlsStream<TcpStream>>>,
    connect_timeout: Duration,
}

impl WsTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            stream: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Authenticate the handshake with an access token
    pub fn with_token(mut self, token: AccessToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Bound the handshake duration
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for WsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsTransport")
            .field("url", &self.url)
            .field("token", &self.token)
            .field("connected", &self.stream.is_some())
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

#[async_trait]
impl Transport for WsTransport {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn connect(&mut self) -> Result<(), TransportError> {
        debug!(authenticated = self.token.is_some(), "Opening WebSocket");

        let mut request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&token.bearer())
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        let (ws_stream, _response) = timeout(self.connect_timeout, connect_async(request))
            .await
            .map_err(|_| TransportError::Timeout(self.connect_timeout))?
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

        self.stream = Some(ws_stream);
        debug!("Handshake complete");
        Ok(())
    }

    #[instrument(skip(self, message), fields(len = message.len()))]
    async fn send(&mut self, message: &str) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;

        stream
            .send(Message::Text(message.to_string()))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn send_pong(&mut self, payload: Vec<u8>) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;

        // Replaces the pong tungstenite queued on reading the ping
        stream
            .send(Message::Pong(payload))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn recv(&mut self) -> Result<Option<TransportEvent>, TransportError> {
        loop {
            let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;

            match stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(TransportEvent::Text(text))),
                Some(Ok(Message::Binary(data))) => {
                    return String::from_utf8(data)
                        .map(|text| Some(TransportEvent::Text(text)))
                        .map_err(|e| TransportError::Protocol(e.to_string()));
                }
                Some(Ok(Message::Ping(payload))) => {
                    trace!(len = payload.len(), "Ping received");
                    return Ok(Some(TransportEvent::Ping(payload)));
                }
                Some(Ok(Message::Close(frame))) => {
                    debug!(?frame, "Close frame received");
                    // Send the close reply tungstenite queued before dropping the socket
                    if let Err(e) = stream.flush().await {
                        trace!(error = %e, "Close reply not flushed");
                    }
                    self.stream = None;
                    return Ok(None);
                }
                Some(Ok(Message::Pong(_))) | Some(Ok(Message::Frame(_))) => continue,
                Some(Err(e)) => return Err(TransportError::ReceiveFailed(e.to_string())),
                None => {
                    self.stream = None;
                    return Err(TransportError::ConnectionClosed);
                }
            }
        }
    }

    #[instrument(skip(self))]
    async fn close(&mut self) -> Result<(), TransportError> {
        if let Some(mut stream) = self.stream.take() {
            stream
                .close(None)
                .await
                .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}
