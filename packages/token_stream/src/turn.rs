/// Lifecycle of one request/response exchange.
///
/// `Idle -> Awaiting -> {Complete | Errored}`. There is no way back to
/// `Awaiting` except by starting a fresh turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnStatus {
    #[default]
    Idle,
    Awaiting,
    Complete,
    Errored,
}

impl TurnStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TurnStatus::Complete | TurnStatus::Errored)
    }
}

/// One submission and the reply streamed back for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Turn {
    sequence: u64,
    outgoing_text: String,
    reply: String,
    status: TurnStatus,
    error_message: Option<String>,
}

impl Turn {
    /// Start turn number `sequence` for `text`. `None` when `text` is blank.
    pub(crate) fn begin(sequence: u64, text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            sequence,
            outgoing_text: trimmed.to_string(),
            reply: String::new(),
            status: TurnStatus::Awaiting,
            error_message: None,
        })
    }

    /// 1-based position of this turn in the session; 0 before any submit.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn outgoing_text(&self) -> &str {
        &self.outgoing_text
    }

    /// Tokens received so far, joined by single spaces.
    pub fn reply(&self) -> &str {
        &self.reply
    }

    pub fn status(&self) -> TurnStatus {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_awaiting(&self) -> bool {
        self.status == TurnStatus::Awaiting
    }

    pub(crate) fn push_token(&mut self, token: &str) {
        debug_assert!(self.is_awaiting());
        if !self.reply.is_empty() {
            self.reply.push(' ');
        }
        self.reply.push_str(token);
    }

    pub(crate) fn complete(&mut self) {
        self.status = TurnStatus::Complete;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.status = TurnStatus::Errored;
        self.error_message = Some(message);
    }
}
