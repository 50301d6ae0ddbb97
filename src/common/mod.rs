pub mod commands;
pub mod events;
pub mod types;

pub use commands::OutboundRequest;
pub use events::{ChatEvent, DisconnectReason};
pub use types::{
    ChatMessage, ChatPreview, ChatSummary, MessageKey, Packet, UserSummary, is_group_peer,
};
