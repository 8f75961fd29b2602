use tracing::debug;

use crate::error::TurnRejected;
use crate::frame::Frame;
use crate::turn::{Turn, TurnStatus};

/// What a single frame did to the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Token appended; the turn is still awaiting.
    Appended,
    /// `[END]` received; the turn is complete.
    Completed,
    /// `[ERROR]` received; the turn is errored.
    Errored,
    /// No turn was awaiting, so the frame was dropped.
    Ignored,
}

/// Folds the frames of the current turn into reply text and status.
///
/// Holds at most one turn. Starting a new one replaces the previous turn
/// wholesale, which is the only way reply and error are cleared.
#[derive(Debug, Default)]
pub struct ReplyAssembler {
    turn: Turn,
}

impl ReplyAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a turn for `text`. Rejected when `text` is blank or a reply is
    /// still streaming; the current turn is left untouched in both cases.
    pub fn begin_turn(&mut self, text: &str) -> Result<&Turn, TurnRejected> {
        if self.turn.is_awaiting() {
            return Err(TurnRejected::TurnInFlight);
        }
        let next =
            Turn::begin(self.turn.sequence() + 1, text).ok_or(TurnRejected::EmptyMessage)?;
        debug!(turn = next.sequence(), "turn started");
        self.turn = next;
        Ok(&self.turn)
    }

    /// Classify and apply one raw frame.
    pub fn ingest(&mut self, raw: &str) -> FrameOutcome {
        self.apply(Frame::classify(raw))
    }

    pub fn apply(&mut self, frame: Frame) -> FrameOutcome {
        if !self.turn.is_awaiting() {
            debug!(
                turn = self.turn.sequence(),
                status = ?self.turn.status(),
                ?frame,
                "dropping frame outside an awaiting turn"
            );
            return FrameOutcome::Ignored;
        }

        match frame {
            Frame::End => {
                self.turn.complete();
                debug!(turn = self.turn.sequence(), "turn complete");
                FrameOutcome::Completed
            }
            Frame::Error(message) => {
                debug!(turn = self.turn.sequence(), %message, "turn errored by server");
                self.turn.fail(message);
                FrameOutcome::Errored
            }
            Frame::Token(token) => {
                self.turn.push_token(&token);
                FrameOutcome::Appended
            }
        }
    }

    /// Force an awaiting turn into `Errored` with `reason`. Returns false
    /// when nothing was in flight.
    pub fn cancel(&mut self, reason: impl Into<String>) -> bool {
        if !self.turn.is_awaiting() {
            return false;
        }
        self.turn.fail(reason.into());
        true
    }

    pub fn turn(&self) -> &Turn {
        &self.turn
    }

    pub fn is_awaiting(&self) -> bool {
        self.turn.is_awaiting()
    }

    /// Reply text for display. Empty once the turn has errored, since the
    /// error replaces whatever was streamed.
    pub fn reply_text(&self) -> &str {
        match self.turn.status() {
            TurnStatus::Errored => "",
            _ => self.turn.reply(),
        }
    }

    /// Error text for display, empty when there is none.
    pub fn error_text(&self) -> &str {
        self.turn.error_message().unwrap_or("")
    }
}
