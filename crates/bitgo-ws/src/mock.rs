//! Scripted in-memory transport for session tests
//!
//! Inbound traffic is a script of [`Step`]s played back by `recv`. Outbound
//! traffic lands in a shared log that stays readable after the transport has
//! been moved into a session.

use crate::transport::{Transport, TransportError, TransportEvent, DEFAULT_CONNECT_TIMEOUT};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Outbound frame recorded by [`MockTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentFrame {
    /// Text frame passed to `send`
    Text(String),
    /// Pong passed to `send_pong`
    Pong(Vec<u8>),
}

/// One scripted inbound step
#[derive(Debug)]
pub enum Step {
    Deliver(TransportEvent),
    /// Server closes the connection
    RemoteClose,
    /// `recv` fails with this error
    Fail(TransportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handshake {
    Accept,
    Refuse,
    Stall,
}

/// Shared, ordered log of everything a [`MockTransport`] sent
pub type SentLog = Arc<Mutex<Vec<SentFrame>>>;

/// In-memory [`Transport`] driven by a script
///
/// When the script is exhausted, `recv` never resolves, like an idle
/// connection.
#[derive(Debug)]
pub struct MockTransport {
    url: String,
    open: bool,
    handshake: Handshake,
    reject_sends: bool,
    script: VecDeque<Step>,
    sent: SentLog,
}

impl MockTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            open: false,
            handshake: Handshake::Accept,
            reject_sends: false,
            script: VecDeque::new(),
            sent: SentLog::default(),
        }
    }

    /// Fail the handshake with a connection error
    pub fn refuse_handshake(&mut self) -> &mut Self {
        self.handshake = Handshake::Refuse;
        self
    }

    /// Fail the handshake with a timeout
    pub fn stall_handshake(&mut self) -> &mut Self {
        self.handshake = Handshake::Stall;
        self
    }

    /// Fail every `send` after the handshake
    pub fn reject_sends(&mut self) -> &mut Self {
        self.reject_sends = true;
        self
    }

    /// Append a step to the script
    pub fn push(&mut self, step: Step) -> &mut Self {
        self.script.push_back(step);
        self
    }

    pub fn push_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Step::Deliver(TransportEvent::Text(text.into())))
    }

    pub fn push_texts(&mut self, texts: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        for text in texts {
            self.push_text(text);
        }
        self
    }

    pub fn push_ping(&mut self, payload: impl Into<Vec<u8>>) -> &mut Self {
        self.push(Step::Deliver(TransportEvent::Ping(payload.into())))
    }

    pub fn push_close(&mut self) -> &mut Self {
        self.push(Step::RemoteClose)
    }

    pub fn push_error(&mut self, error: TransportError) -> &mut Self {
        self.push(Step::Fail(error))
    }

    /// Steps not played back yet
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Handle on the outbound log
    pub fn sent_log(&self) -> SentLog {
        self.sent.clone()
    }

    /// Text frames sent so far, pongs excluded
    pub fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter_map(|frame| match frame {
                SentFrame::Text(text) => Some(text.clone()),
                SentFrame::Pong(_) => None,
            })
            .collect()
    }

    fn ensure_open(&self) -> Result<(), TransportError> {
        if self.open {
            Ok(())
        } else {
            Err(TransportError::NotConnected)
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        match self.handshake {
            Handshake::Accept => {
                self.open = true;
                Ok(())
            }
            Handshake::Refuse => Err(TransportError::ConnectionFailed(
                "HTTP error: 401 Unauthorized".into(),
            )),
            Handshake::Stall => Err(TransportError::Timeout(DEFAULT_CONNECT_TIMEOUT)),
        }
    }

    async fn send(&mut self, message: &str) -> Result<(), TransportError> {
        self.ensure_open()?;
        if self.reject_sends {
            return Err(TransportError::SendFailed("broken pipe".into()));
        }
        self.sent.lock().push(SentFrame::Text(message.to_string()));
        Ok(())
    }

    async fn send_pong(&mut self, payload: Vec<u8>) -> Result<(), TransportError> {
        self.ensure_open()?;
        self.sent.lock().push(SentFrame::Pong(payload));
        Ok(())
    }

    async fn recv(&mut self) -> Result<Option<TransportEvent>, TransportError> {
        self.ensure_open()?;
        match self.script.pop_front() {
            Some(Step::Deliver(event)) => Ok(Some(event)),
            Some(Step::RemoteClose) => {
                self.open = false;
                Ok(None)
            }
            Some(Step::Fail(error)) => Err(error),
            None => std::future::pending().await,
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.open = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.open
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_plays_in_order() {
        let mut transport = MockTransport::new("wss://mock.test/ws");
        transport
            .push_text(r#"{"channel":"level2","type":"snapshot"}"#)
            .push_ping(b"hb".to_vec())
            .push_close();
        transport.connect().await.unwrap();

        assert!(matches!(
            transport.recv().await.unwrap(),
            Some(TransportEvent::Text(text)) if text.contains("snapshot")
        ));
        assert_eq!(
            transport.recv().await.unwrap(),
            Some(TransportEvent::Ping(b"hb".to_vec()))
        );
        assert_eq!(transport.recv().await.unwrap(), None);
        assert!(!transport.is_connected());
        assert_eq!(transport.remaining(), 0);
    }

    #[tokio::test]
    async fn test_log_keeps_texts_and_pongs_interleaved() {
        let mut transport = MockTransport::new("wss://mock.test/ws");
        let log = transport.sent_log();
        transport.connect().await.unwrap();

        transport.send("a").await.unwrap();
        transport.send_pong(b"p".to_vec()).await.unwrap();
        transport.send("b").await.unwrap();

        assert_eq!(
            *log.lock(),
            vec![
                SentFrame::Text("a".into()),
                SentFrame::Pong(b"p".to_vec()),
                SentFrame::Text("b".into()),
            ]
        );
        assert_eq!(transport.sent_texts(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_handshake_modes() {
        let mut refused = MockTransport::new("wss://mock.test/ws");
        refused.refuse_handshake();
        assert!(matches!(
            refused.connect().await,
            Err(TransportError::ConnectionFailed(_))
        ));
        assert!(!refused.is_connected());

        let mut stalled = MockTransport::new("wss://mock.test/ws");
        stalled.stall_handshake();
        assert!(matches!(stalled.connect().await, Err(TransportError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_io_before_connect_fails() {
        let mut transport = MockTransport::new("wss://mock.test/ws");
        assert!(matches!(
            transport.send("x").await,
            Err(TransportError::NotConnected)
        ));
        assert!(matches!(
            transport.recv().await,
            Err(TransportError::NotConnected)
        ));
    }
}
