//! In-process chat backend for integration tests.
//!
//! Answers every text frame by replaying a script, the same way the real
//! backend streams a reply one word per frame.

#![allow(dead_code)]

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub enum Reply {
    Frame(String),
    /// Sleep before the next reply.
    Pause(Duration),
    /// Drop the socket without a close handshake.
    Hangup,
}

pub fn frame(text: &str) -> Reply {
    Reply::Frame(text.to_string())
}

/// One frame per whitespace-separated word, then `[END]`.
pub fn echo_words(input: &str) -> Vec<Reply> {
    input
        .split_whitespace()
        .map(frame)
        .chain(std::iter::once(frame("[END]")))
        .collect()
}

type Script = Arc<dyn Fn(&str) -> Vec<Reply> + Send + Sync>;

#[derive(Clone)]
struct BackendState {
    script: Script,
    received: Arc<Mutex<Vec<String>>>,
}

pub struct MockBackend {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub async fn start(script: impl Fn(&str) -> Vec<Reply> + Send + Sync + 'static) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = BackendState {
            script: Arc::new(script),
            received: received.clone(),
        };
        let app = Router::new()
            .route("/ws", get(ws_upgrade))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock backend");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, received }
    }

    pub fn endpoint(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Every text frame the backend has received, in order.
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<BackendState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: BackendState) {
    let (mut sender, mut receiver) = socket.split();

    while let Some(Ok(msg)) = receiver.next().await {
        let text = match msg {
            Message::Text(text) => text.as_str().to_owned(),
            Message::Close(_) => break,
            _ => continue,
        };
        state.received.lock().unwrap().push(text.clone());

        for reply in (state.script)(&text) {
            match reply {
                Reply::Frame(frame) => {
                    if sender.send(Message::Text(frame.into())).await.is_err() {
                        return;
                    }
                }
                Reply::Pause(delay) => tokio::time::sleep(delay).await,
                Reply::Hangup => return,
            }
        }
    }
}
