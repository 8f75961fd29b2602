use token_stream::{FrameOutcome, ReplyAssembler, TurnRejected};
use tracing::{debug, info, warn};

use crate::connection::{Connection, ConnectionHandler, ConnectionState};
use crate::error::SubmitError;
use crate::view::ChatView;

/// Shown for any transport-level failure, whatever the underlying cause.
pub const CONNECTIVITY_ERROR: &str = "Connection error. Make sure the backend server is running.";

/// One connection plus the state of the exchange running over it.
pub struct ChatSession {
    connection: Connection,
    assembler: ReplyAssembler,
    connection_error: Option<String>,
}

impl ChatSession {
    pub fn new(connection: Connection) -> Self {
        Self {
            connection,
            assembler: ReplyAssembler::new(),
            connection_error: None,
        }
    }

    /// Start a turn for `text` and transmit it verbatim.
    ///
    /// Blank input, a dead connection and a reply still in flight are all
    /// refused without sending anything.
    pub async fn submit(&mut self, text: &str) -> Result<(), SubmitError> {
        if text.trim().is_empty() {
            return Err(TurnRejected::EmptyMessage.into());
        }
        if !self.connection.is_open() {
            return Err(SubmitError::NotConnected);
        }
        let turn = self.assembler.begin_turn(text)?;
        info!(turn = turn.sequence(), "sending message");
        self.connection_error = None;

        if let Err(err) = self.connection.send(text).await {
            self.on_fault(&err.to_string());
            return Err(err.into());
        }
        Ok(())
    }

    pub fn view(&self) -> ChatView<'_> {
        ChatView::new(
            &self.assembler,
            self.connection_error.as_deref(),
            self.connection.state(),
        )
    }

    pub fn is_awaiting(&self) -> bool {
        self.assembler.is_awaiting()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Release the connection. Call on every exit path.
    pub async fn close(&mut self) {
        self.connection.close().await;
    }
}

impl ConnectionHandler for ChatSession {
    fn on_open(&mut self) {
        debug!(endpoint = self.connection.endpoint(), "connection open");
        self.connection_error = None;
    }

    fn on_frame(&mut self, frame: &str) {
        match self.assembler.ingest(frame) {
            FrameOutcome::Appended => {}
            FrameOutcome::Completed => {
                let turn = self.assembler.turn();
                info!(turn = turn.sequence(), len = turn.reply().len(), "reply complete");
            }
            FrameOutcome::Errored => {
                warn!(
                    turn = self.assembler.turn().sequence(),
                    error = self.assembler.error_text(),
                    "server reported an error"
                );
            }
            FrameOutcome::Ignored => {}
        }
    }

    fn on_fault(&mut self, reason: &str) {
        warn!(reason, "WebSocket error");
        self.connection.mark_faulted();
        self.connection_error = Some(CONNECTIVITY_ERROR.to_string());
        if self.assembler.cancel(CONNECTIVITY_ERROR) {
            warn!(
                turn = self.assembler.turn().sequence(),
                "in-flight reply cancelled"
            );
        }
    }

    fn on_closed(&mut self) {
        info!("Disconnected from server");
        if self.assembler.is_awaiting() {
            // dropped mid-reply: no [END] is coming
            self.on_fault("connection closed while awaiting a reply");
        } else {
            self.connection.mark_closed();
        }
    }
}
