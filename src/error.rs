use std::io;

use thiserror::Error;

/// Failures of the line codec. Any of these ends the connection.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("malformed frame: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode packet: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("frame exceeds {limit} bytes")]
    TooLarge { limit: usize },
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("send failed: {0}")]
    Send(#[source] io::Error),
    #[error("connection closed")]
    Disconnected,
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
    #[error("server rejected request: {0}")]
    Rejected(String),
    #[error("unexpected reply `{0}` from server")]
    UnexpectedReply(String),
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),
    #[error("no conversation selected")]
    NoPeerSelected,
}

impl ChatError {
    /// Whether the caller must treat this error as a lost connection.
    pub fn is_disconnect(&self) -> bool {
        matches!(
            self,
            Self::Send(_) | Self::Disconnected | Self::Frame(_) | Self::Io(_)
        )
    }
}
