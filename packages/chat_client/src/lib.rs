//! Chat Client - stream chatbot replies over a WebSocket
//!
//! Sends each user message as one text frame and renders the reply as the
//! backend streams it back word by word. Frame interpretation lives in the
//! [`token_stream`] crate; this crate supplies the transport, the session
//! state the UI observes, and a terminal front end.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use chat_client::{ChatSession, Connection, ConnectionHandler};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (connection, mut events) =
//!         Connection::open("ws://localhost:8000/ws", Duration::from_secs(10)).await;
//!     let mut session = ChatSession::new(connection);
//!
//!     session.submit("Tell me a joke").await.unwrap();
//!     while let Some(event) = events.recv().await {
//!         session.handle(&event);
//!         println!("{}", session.view().reply_text());
//!         if !session.is_awaiting() {
//!             break;
//!         }
//!     }
//!     session.close().await;
//! }
//! ```

pub mod config;
pub mod connection;
mod error;
pub mod render;
pub mod run;
pub mod session;
pub mod view;

pub use config::{ChatConfig, FileConfig};
pub use connection::{Connection, ConnectionEvent, ConnectionHandler, ConnectionState};
pub use error::{ConfigError, ConnectionError, SubmitError};
pub use render::TerminalRenderer;
pub use run::{RunOutcome, run};
pub use session::{CONNECTIVITY_ERROR, ChatSession};
pub use view::ChatView;
