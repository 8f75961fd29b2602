//! WebSocket channel to the chat backend.
//!
//! A [`Connection`] owns the write half; a reader task forwards everything
//! inbound, in arrival order, as [`ConnectionEvent`]s on a channel handed
//! back by [`Connection::open`]. Whoever drains that channel feeds the
//! events to a [`ConnectionHandler`].

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::error::ConnectionError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
    Faulted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Opened,
    /// One inbound text frame, verbatim.
    Frame(String),
    /// Transport failure; the connection is unusable.
    Fault(String),
    /// The peer closed the channel (or the stream ended).
    Closed,
}

/// Callbacks for the four connection events.
pub trait ConnectionHandler {
    fn on_open(&mut self);
    fn on_frame(&mut self, frame: &str);
    fn on_fault(&mut self, reason: &str);
    fn on_closed(&mut self);

    fn handle(&mut self, event: &ConnectionEvent) {
        match event {
            ConnectionEvent::Opened => self.on_open(),
            ConnectionEvent::Frame(frame) => self.on_frame(frame),
            ConnectionEvent::Fault(reason) => self.on_fault(reason),
            ConnectionEvent::Closed => self.on_closed(),
        }
    }
}

pub struct Connection {
    endpoint: String,
    state: ConnectionState,
    sink: Option<SplitSink<WsStream, Message>>,
    reader: Option<JoinHandle<()>>,
}

impl Connection {
    /// Connect to `endpoint`, once. The returned connection is either `Open`
    /// (first event `Opened`) or `Faulted` (first event `Fault`).
    pub async fn open(
        endpoint: &str,
        connect_timeout: Duration,
    ) -> (Self, mpsc::Receiver<ConnectionEvent>) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let mut connection = Self {
            endpoint: endpoint.to_string(),
            state: ConnectionState::Connecting,
            sink: None,
            reader: None,
        };

        match connect(endpoint, connect_timeout).await {
            Ok(ws_stream) => {
                info!(endpoint, "Connected to chatbot server");
                let (sink, stream) = ws_stream.split();
                connection.state = ConnectionState::Open;
                connection.sink = Some(sink);
                // Opened must precede any frame the reader forwards
                let _ = events_tx.send(ConnectionEvent::Opened).await;
                connection.reader = Some(tokio::spawn(forward_frames(stream, events_tx)));
            }
            Err(err) => {
                warn!(endpoint, error = %err, "WebSocket error");
                connection.state = ConnectionState::Faulted;
                let _ = events_tx.send(ConnectionEvent::Fault(err.to_string())).await;
            }
        }

        (connection, events_rx)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// Transmit `text` as exactly one frame. Blank text is skipped.
    pub async fn send(&mut self, text: &str) -> Result<(), ConnectionError> {
        if !self.is_open() {
            return Err(ConnectionError::NotOpen);
        }
        if text.trim().is_empty() {
            debug!("not sending blank message");
            return Ok(());
        }
        let Some(sink) = self.sink.as_mut() else {
            return Err(ConnectionError::NotOpen);
        };
        if let Err(err) = sink.send(Message::Text(text.to_owned().into())).await {
            self.state = ConnectionState::Faulted;
            return Err(ConnectionError::from_tungstenite(err));
        }
        Ok(())
    }

    /// Send the close handshake if open, then release the reader task.
    /// Safe to call more than once.
    pub async fn close(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            if self.is_open() {
                debug!(endpoint = %self.endpoint, "closing connection");
                if let Err(err) = sink.close().await {
                    debug!(error = %err, "close handshake failed");
                }
                self.state = ConnectionState::Closed;
            }
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }

    pub(crate) fn mark_faulted(&mut self) {
        self.state = ConnectionState::Faulted;
    }

    pub(crate) fn mark_closed(&mut self) {
        if self.state != ConnectionState::Faulted {
            self.state = ConnectionState::Closed;
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

async fn connect(endpoint: &str, timeout: Duration) -> Result<WsStream, ConnectionError> {
    let (ws_stream, _) = tokio::time::timeout(timeout, tokio_tungstenite::connect_async(endpoint))
        .await
        .map_err(|_| ConnectionError::Timeout(endpoint.to_string()))?
        .map_err(ConnectionError::from_tungstenite)?;
    Ok(ws_stream)
}

/// Forward inbound frames until the stream ends, closes or fails.
async fn forward_frames(
    mut stream: SplitStream<WsStream>,
    events: mpsc::Sender<ConnectionEvent>,
) {
    while let Some(msg) = stream.next().await {
        let event = match msg {
            Ok(Message::Text(text)) => ConnectionEvent::Frame(text.as_str().to_owned()),
            Ok(Message::Binary(_)) => {
                debug!("Binary frames not supported");
                continue;
            }
            Ok(Message::Close(frame)) => {
                debug!(?frame, "close frame received");
                ConnectionEvent::Closed
            }
            // ping/pong are answered by tungstenite
            Ok(_) => continue,
            Err(err) => ConnectionEvent::Fault(ConnectionError::from_tungstenite(err).to_string()),
        };

        let last = !matches!(event, ConnectionEvent::Frame(_));
        if events.send(event).await.is_err() || last {
            return;
        }
    }
    let _ = events.send(ConnectionEvent::Closed).await;
}
