use token_stream::TurnRejected;
use tokio_tungstenite::tungstenite;

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("chat server is unavailable")]
    Unavailable,

    #[error("timed out connecting to {0}")]
    Timeout(String),

    #[error("connection is not open")]
    NotOpen,

    #[error(transparent)]
    Transport(#[from] tungstenite::Error),
}

impl ConnectionError {
    pub fn from_tungstenite(err: tungstenite::Error) -> Self {
        let is_connect = match &err {
            tungstenite::Error::Io(io_err) => matches!(
                io_err.kind(),
                std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
            ),
            _ => false,
        };
        if is_connect {
            Self::Unavailable
        } else {
            Self::Transport(err)
        }
    }
}

/// Why a submission was not sent.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Rejected(#[from] TurnRejected),

    #[error("not connected to the chat server")]
    NotConnected,

    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("endpoint must be a ws:// URL, got {0:?}")]
    InvalidEndpoint(String),

    #[error("connect_timeout_secs must be at least 1")]
    ZeroConnectTimeout,

    #[error("could not determine the user config directory")]
    NoConfigDir,
}
