pub mod auth;
pub mod client;
pub mod codec;
pub mod dispatch;
pub mod transport;

pub use auth::{sign_in, sign_up};
pub use client::ChatClient;
pub use codec::{FrameDecoder, encode_packet};
pub use dispatch::dispatch;
pub use transport::{Connection, ConnectionHandle, Inbound};
