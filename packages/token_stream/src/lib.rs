//! Token Stream - interpreter for the streamed chat reply protocol
//!
//! A chat backend answers each submitted message with a sequence of text
//! frames: one frame per word, then either `[END]` or an `[ERROR]`-prefixed
//! frame. This crate folds those frames into the reply shown to the user.
//! It has no transport dependencies; feed it frames from any socket.
//!
//! # Example
//!
//! ```
//! use token_stream::{FrameOutcome, ReplyAssembler, TurnStatus};
//!
//! let mut assembler = ReplyAssembler::new();
//! assembler.begin_turn("hi there").unwrap();
//!
//! assembler.ingest("Hello");
//! assembler.ingest("world");
//! assert_eq!(assembler.ingest("[END]"), FrameOutcome::Completed);
//!
//! assert_eq!(assembler.reply_text(), "Hello world");
//! assert_eq!(assembler.turn().status(), TurnStatus::Complete);
//! ```

mod assembler;
mod error;
pub mod frame;
mod turn;

pub use assembler::{FrameOutcome, ReplyAssembler};
pub use error::TurnRejected;
pub use frame::{END_SENTINEL, ERROR_PREFIX, Frame};
pub use turn::{Turn, TurnStatus};
