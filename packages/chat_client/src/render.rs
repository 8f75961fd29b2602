use std::io::{self, Write};

use crate::view::ChatView;

/// Streams a [`ChatView`] to a terminal.
///
/// Each call to [`render`](Self::render) writes only what changed since the
/// previous call: new reply text goes to `out` as it arrives, errors go to
/// `err` once.
pub struct TerminalRenderer<W: Write, E: Write> {
    out: W,
    err: E,
    turn: u64,
    printed: usize,
    settled: bool,
    shown_error: Option<String>,
}

impl<W: Write, E: Write> TerminalRenderer<W, E> {
    pub fn new(out: W, err: E) -> Self {
        Self {
            out,
            err,
            turn: 0,
            printed: 0,
            settled: false,
            shown_error: None,
        }
    }

    pub fn render(&mut self, view: &ChatView<'_>) -> io::Result<()> {
        if view.turn_sequence() != self.turn {
            self.turn = view.turn_sequence();
            self.printed = 0;
            self.settled = false;
            self.shown_error = None;
        }

        // reply only grows within a turn (or vanishes on error)
        let reply = view.reply_text();
        if reply.len() > self.printed {
            self.out.write_all(reply[self.printed..].as_bytes())?;
            self.printed = reply.len();
        }

        if view.status().is_terminal() && !self.settled {
            if self.printed > 0 {
                writeln!(self.out)?;
            }
            self.settled = true;
        }
        self.out.flush()?;

        let error = view.error_text();
        if !error.is_empty() && self.shown_error.as_deref() != Some(error) {
            writeln!(self.err, "error: {error}")?;
            self.shown_error = Some(error.to_string());
        }
        self.err.flush()
    }

    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.err, "{text}")?;
        self.err.flush()
    }

    pub fn prompt(&mut self, prompt: &str) -> io::Result<()> {
        write!(self.err, "{prompt}")?;
        self.err.flush()
    }

    #[cfg(test)]
    pub(crate) fn into_parts(self) -> (W, E) {
        (self.out, self.err)
    }
}
