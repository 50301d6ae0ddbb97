use crate::common::{ChatSummary, UserSummary};

/// Notifications for the view layer, in the order they must be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// The chat list was replaced. `selected` is the conversation still
    /// current afterwards; `None` means show the placeholder.
    ChatListReplaced {
        chats: Vec<ChatSummary>,
        selected: Option<String>,
    },
    /// A conversation was selected; clear the message pane.
    ConversationOpened { peer: String },
    MessageDisplayed(DisplayedMessage),
    UserSearchResults(Vec<UserSummary>),
    ChatCreated(ChatSummary),
    GroupCreated(ChatSummary),
    ServerError(String),
    /// Emitted once; the session is over.
    Disconnected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedMessage {
    pub peer: String,
    pub from: String,
    pub content: String,
    pub timestamp: i64,
    pub outgoing: bool,
    /// Shown above incoming group messages.
    pub sender: Option<SenderHeader>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderHeader {
    pub display_name: String,
    pub username: String,
}
