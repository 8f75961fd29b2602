//! Wire vocabulary of the reply stream.
//!
//! Server frames are plain text. Two values are reserved:
//!
//! | frame              | meaning                                   |
//! |--------------------|-------------------------------------------|
//! | `[END]`            | the reply is complete (exact match only)  |
//! | `[ERROR] <reason>` | the reply failed; `<reason>` is displayed |
//!
//! Anything else is one token of the reply.

use std::fmt;

pub const END_SENTINEL: &str = "[END]";
pub const ERROR_PREFIX: &str = "[ERROR]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Normal completion of the current turn.
    End,
    /// Server-signalled failure, prefix stripped and message trimmed.
    Error(String),
    /// One word (or chunk) of the reply, verbatim.
    Token(String),
}

impl Frame {
    /// Classify a raw frame. `[END]` wins over `[ERROR]`, which wins over
    /// plain content. Never fails: empty or odd frames are tokens.
    pub fn classify(raw: &str) -> Self {
        if raw == END_SENTINEL {
            return Frame::End;
        }
        if let Some(rest) = raw.strip_prefix(ERROR_PREFIX) {
            return Frame::Error(rest.trim().to_string());
        }
        Frame::Token(raw.to_string())
    }

    /// Encoding a backend uses to emit this frame.
    pub fn to_wire(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::End => f.write_str(END_SENTINEL),
            Frame::Error(message) => write!(f, "{} {}", ERROR_PREFIX, message),
            Frame::Token(text) => f.write_str(text),
        }
    }
}
