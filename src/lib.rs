//! Network core of a line-protocol chat client: one TCP connection,
//! newline-delimited JSON framing, and reconciliation of server events into
//! the locally held conversation state.

pub mod common;
pub mod config;
pub mod error;
pub mod network;
pub mod session;
pub mod ui;

pub use error::{ChatError, FrameError};
pub use network::ChatClient;
pub use session::{ChatState, ViewEvent};
