use super::types::{ChatMessage, ChatSummary, UserSummary};

/// Events produced by the network layer for the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Server-ordered replacement of the whole chat list.
    ChatListUpdated(Vec<ChatSummary>),
    MessageArrived(ChatMessage),
    UserSearchResult(Vec<UserSummary>),
    ChatCreated(ChatSummary),
    GroupCreated(ChatSummary),
    /// Non-fatal `error` reply from the server.
    ServerError(String),
    /// Terminal: the connection is gone, whichever side closed it.
    ConnectionLost,
}

/// Why a receive loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// Local `stop()`.
    Stopped,
    /// Zero-length read.
    PeerClosed,
    Transport(String),
    Framing(String),
}
