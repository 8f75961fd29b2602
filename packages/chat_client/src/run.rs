//! The interactive / one-shot client loop.

use anyhow::{Context, Result};
use std::future::Future;
use std::io::{IsTerminal, Write};
use std::process::ExitCode;
use tokio::sync::mpsc;
use token_stream::{TurnRejected, TurnStatus};
use tracing::{debug, info};

use crate::config::ChatConfig;
use crate::connection::{Connection, ConnectionEvent, ConnectionHandler, ConnectionState};
use crate::error::SubmitError;
use crate::render::TerminalRenderer;
use crate::session::ChatSession;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Finished,
    /// The last turn ended with an `[ERROR]` frame.
    TurnErrored,
    /// The connection failed to open or dropped.
    ConnectionLost,
    /// Ctrl-C arrived before the reply settled.
    Interrupted,
}

impl RunOutcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            RunOutcome::Finished => ExitCode::SUCCESS,
            RunOutcome::TurnErrored | RunOutcome::ConnectionLost | RunOutcome::Interrupted => {
                ExitCode::FAILURE
            }
        }
    }
}

/// Where submissions come from.
struct Input {
    /// One-shot message, sent once the connection opens.
    pending: Option<String>,
    lines: mpsc::Receiver<std::io::Result<String>>,
    lines_open: bool,
    show_prompt: bool,
}

impl Input {
    fn one_shot(text: String) -> Self {
        Self {
            pending: Some(text),
            lines: mpsc::channel(1).1,
            lines_open: false,
            show_prompt: false,
        }
    }

    fn stdin() -> Self {
        Self::lines(spawn_stdin_reader(), std::io::stdin().is_terminal())
    }

    fn lines(lines: mpsc::Receiver<std::io::Result<String>>, show_prompt: bool) -> Self {
        Self {
            pending: None,
            lines,
            lines_open: true,
            show_prompt,
        }
    }
}

/// Connect, exchange messages, and close.
///
/// With `message`, sends it once and returns when the reply settles.
/// Otherwise every stdin line is a submission until EOF or Ctrl-C.
pub async fn run(config: &ChatConfig, message: Option<String>) -> Result<RunOutcome> {
    let (connection, mut events) = Connection::open(&config.endpoint, config.connect_timeout).await;
    let mut session = ChatSession::new(connection);
    let mut renderer = TerminalRenderer::new(std::io::stdout(), std::io::stderr());
    let input = match message {
        Some(text) => Input::one_shot(text),
        None => Input::stdin(),
    };

    let result = drive(
        &mut session,
        &mut events,
        &mut renderer,
        &config.prompt,
        input,
        tokio::signal::ctrl_c(),
    )
    .await;

    // released on every path, including errors out of drive
    session.close().await;
    result
}

async fn drive<W: Write, E: Write>(
    session: &mut ChatSession,
    events: &mut mpsc::Receiver<ConnectionEvent>,
    renderer: &mut TerminalRenderer<W, E>,
    prompt: &str,
    mut input: Input,
    interrupt: impl Future<Output = std::io::Result<()>>,
) -> Result<RunOutcome> {
    tokio::pin!(interrupt);
    let show_prompt = input.show_prompt;

    loop {
        tokio::select! {
            biased;

            event = events.recv() => {
                let Some(event) = event else {
                    debug!("event channel closed");
                    break;
                };
                let was_awaiting = session.is_awaiting();
                session.handle(&event);
                renderer.render(&session.view())?;

                if event == ConnectionEvent::Opened {
                    if let Some(text) = input.pending.take() {
                        submit_line(session, renderer, &text).await?;
                    } else if show_prompt {
                        renderer.prompt(prompt)?;
                    }
                } else if was_awaiting && !session.is_awaiting() && input.lines_open && show_prompt {
                    renderer.prompt(prompt)?;
                }
            }

            // lines typed while a reply streams stay queued until it settles
            line = input.lines.recv(), if input.lines_open && !session.is_awaiting() => {
                match line {
                    Some(text) => {
                        let text = text.context("Failed to read stdin")?;
                        submit_line(session, renderer, &text).await?;
                        if show_prompt && !session.is_awaiting() {
                            renderer.prompt(prompt)?;
                        }
                    }
                    None => {
                        debug!("stdin closed");
                        input.lines_open = false;
                    }
                }
            }

            _ = &mut interrupt => {
                info!("interrupted");
                break;
            }
        }

        // nothing left to send and nothing streaming
        if !input.lines_open && input.pending.is_none() && !session.is_awaiting() {
            break;
        }
        // no reconnection: a dead channel ends the run
        if matches!(
            session.connection_state(),
            ConnectionState::Faulted | ConnectionState::Closed
        ) {
            break;
        }
    }

    Ok(outcome(session, input.pending.is_some()))
}

async fn submit_line<W: Write, E: Write>(
    session: &mut ChatSession,
    renderer: &mut TerminalRenderer<W, E>,
    text: &str,
) -> Result<()> {
    match session.submit(text).await {
        Ok(()) | Err(SubmitError::Rejected(TurnRejected::EmptyMessage)) => {}
        Err(SubmitError::Rejected(TurnRejected::TurnInFlight)) => {
            renderer.notice("Waiting... the current reply is still streaming")?;
        }
        Err(SubmitError::NotConnected) => {
            renderer.notice("Not connected to the chat server")?;
        }
        // the session has already recorded the fault
        Err(SubmitError::Connection(err)) => debug!(error = %err, "send failed"),
    }
    renderer.render(&session.view())?;
    Ok(())
}

fn outcome(session: &ChatSession, unsent: bool) -> RunOutcome {
    if session.connection_state() == ConnectionState::Faulted {
        RunOutcome::ConnectionLost
    } else if unsent || session.is_awaiting() {
        RunOutcome::Interrupted
    } else if session.view().status() == TurnStatus::Errored {
        RunOutcome::TurnErrored
    } else {
        RunOutcome::Finished
    }
}

/// Read stdin on a plain thread so a pending read never holds up shutdown.
fn spawn_stdin_reader() -> mpsc::Receiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}
