use token_stream::{ReplyAssembler, TurnStatus};

use crate::connection::ConnectionState;

/// Read-only snapshot of what the user should currently see.
#[derive(Debug, Clone, Copy)]
pub struct ChatView<'a> {
    assembler: &'a ReplyAssembler,
    connection_error: Option<&'a str>,
    connection_state: ConnectionState,
}

impl<'a> ChatView<'a> {
    pub(crate) fn new(
        assembler: &'a ReplyAssembler,
        connection_error: Option<&'a str>,
        connection_state: ConnectionState,
    ) -> Self {
        Self {
            assembler,
            connection_error,
            connection_state,
        }
    }

    pub fn reply_text(&self) -> &'a str {
        self.assembler.reply_text()
    }

    /// Connectivity problems take precedence over the turn's own error.
    pub fn error_text(&self) -> &'a str {
        match self.connection_error {
            Some(message) => message,
            None => self.assembler.error_text(),
        }
    }

    /// True while a reply is streaming; input is disabled meanwhile.
    pub fn is_awaiting(&self) -> bool {
        self.assembler.is_awaiting()
    }

    pub fn status(&self) -> TurnStatus {
        self.assembler.turn().status()
    }

    pub fn turn_sequence(&self) -> u64 {
        self.assembler.turn().sequence()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection_state
    }
}
