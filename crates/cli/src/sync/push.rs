// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push channel transport.
//!
//! Provides a trait-based transport layer that enables:
//! - STOMP over WebSocket connections for production
//! - Mock transports for unit testing

use std::future::Future;
use std::pin::Pin;

use cs_core::protocol::{PushMessage, Topic};
use cs_core::stomp::{Command, Frame};
use tracing::debug;

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed unexpectedly.
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// The broker sent something other than what the protocol allows.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Boxed future returned by [`PushTransport`] methods.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// Persistent push connection carrying topic messages.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with mock implementations.
pub trait PushTransport: Send {
    /// Open the connection and complete the session handshake.
    fn connect(&mut self, url: &str) -> TransportFuture<'_, ()>;

    /// Subscribe to a topic.
    fn subscribe(&mut self, topic: Topic) -> TransportFuture<'_, ()>;

    /// Receive the next decoded message.
    ///
    /// Returns `None` if the connection is closed.
    fn recv(&mut self) -> TransportFuture<'_, Option<PushMessage>>;

    /// Close the connection. Closing a closed transport is a no-op.
    fn disconnect(&mut self) -> TransportFuture<'_, ()>;

    /// Check if connected.
    fn is_connected(&self) -> bool;
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// STOMP 1.2 over WebSocket, using tokio-tungstenite.
pub struct StompTransport {
    /// The WebSocket connection, if connected.
    ws: Option<StompConnection>,
    /// Counter for subscription ids.
    next_subscription: u32,
}

/// Internal WebSocket connection wrapper.
struct StompConnection {
    sink: futures_util::stream::SplitSink<WsStream, tokio_tungstenite::tungstenite::Message>,
    stream: futures_util::stream::SplitStream<WsStream>,
}

impl StompConnection {
    async fn send_frame(&mut self, frame: &Frame) -> TransportResult<()> {
        use futures_util::SinkExt;
        use tokio_tungstenite::tungstenite::Message;

        self.sink
            .send(Message::Text(frame.encode().into()))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        self.sink
            .flush()
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    /// Next non-heartbeat frame, or `None` at end of stream.
    async fn next_frame(&mut self) -> TransportResult<Option<Frame>> {
        use futures_util::StreamExt;
        use tokio_tungstenite::tungstenite::Message;

        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    match Frame::decode(text.as_str())
                        .map_err(|e| TransportError::Protocol(e.to_string()))?
                    {
                        Some(frame) => return Ok(Some(frame)),
                        // Heartbeat
                        None => continue,
                    }
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(TransportError::ReceiveFailed(e.to_string())),
            }
        }
    }
}

impl StompTransport {
    /// Create a new, disconnected transport.
    pub fn new() -> Self {
        StompTransport {
            ws: None,
            next_subscription: 0,
        }
    }
}

impl Default for StompTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Host name to announce in the CONNECT frame.
fn virtual_host(url: &str) -> String {
    url.parse::<tokio_tungstenite::tungstenite::http::Uri>()
        .ok()
        .and_then(|uri| uri.host().map(str::to_string))
        .unwrap_or_else(|| "localhost".to_string())
}

impl PushTransport for StompTransport {
    fn connect(&mut self, url: &str) -> TransportFuture<'_, ()> {
        let url = url.to_string();
        Box::pin(async move {
            use futures_util::StreamExt;

            let (ws_stream, _) = tokio_tungstenite::connect_async(&url)
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;

            let (sink, stream) = ws_stream.split();
            let mut conn = StompConnection { sink, stream };
            conn.send_frame(&Frame::connect(&virtual_host(&url))).await?;

            match conn.next_frame().await? {
                Some(frame) if frame.command == Command::Connected => {
                    debug!(url = %url, version = ?frame.get_header("version"), "push session open");
                }
                Some(frame) if frame.command == Command::Error => {
                    let message = frame.get_header("message").unwrap_or("").to_string();
                    return Err(TransportError::ConnectionFailed(message));
                }
                Some(frame) => {
                    return Err(TransportError::Protocol(format!(
                        "expected CONNECTED, got {}",
                        frame.command.as_str()
                    )));
                }
                None => return Err(TransportError::ConnectionClosed),
            }

            self.ws = Some(conn);
            self.next_subscription = 0;
            Ok(())
        })
    }

    fn subscribe(&mut self, topic: Topic) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            let id = format!("sub-{}", self.next_subscription);
            let ws = self.ws.as_mut().ok_or(TransportError::ConnectionClosed)?;
            if let Err(e) = ws.send_frame(&Frame::subscribe(&id, topic.destination())).await {
                // Connection is broken, clear it
                self.ws = None;
                return Err(e);
            }
            self.next_subscription += 1;
            Ok(())
        })
    }

    fn recv(&mut self) -> TransportFuture<'_, Option<PushMessage>> {
        Box::pin(async move {
            let ws = self.ws.as_mut().ok_or(TransportError::ConnectionClosed)?;

            loop {
                let frame = match ws.next_frame().await {
                    Ok(Some(frame)) => frame,
                    Ok(None) => {
                        self.ws = None;
                        return Ok(None);
                    }
                    Err(e) => {
                        self.ws = None;
                        return Err(e);
                    }
                };

                if let Err(e) = PushMessage::check_error(&frame) {
                    self.ws = None;
                    return Err(TransportError::Protocol(e.to_string()));
                }

                match PushMessage::from_frame(&frame) {
                    Ok(Some(msg)) => return Ok(Some(msg)),
                    // Receipts and unknown destinations
                    Ok(None) => continue,
                    Err(e) => {
                        debug!(error = %e, "dropping undecodable push message");
                        continue;
                    }
                }
            }
        })
    }

    fn disconnect(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            if let Some(mut ws) = self.ws.take() {
                use futures_util::SinkExt;
                let _ = ws.send_frame(&Frame::disconnect()).await;
                let _ = ws.sink.close().await;
            }
            Ok(())
        })
    }

    fn is_connected(&self) -> bool {
        self.ws.is_some()
    }
}
