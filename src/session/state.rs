use std::collections::{HashMap, HashSet};

use crate::common::{ChatEvent, ChatMessage, ChatSummary, MessageKey, is_group_peer};
use crate::error::ChatError;

use super::view::{DisplayedMessage, SenderHeader, ViewEvent};

/// Conversation state of one logged-in connection.
///
/// Every change goes through [`ChatState::apply`] or
/// [`ChatState::select_peer`]; callers hold a single lock around the whole
/// state so both read-then-write the current peer atomically.
#[derive(Debug)]
pub struct ChatState {
    username: String,
    seen: HashSet<MessageKey>,
    buffers: HashMap<String, Vec<ChatMessage>>,
    current_peer: Option<String>,
    chats: Vec<ChatSummary>,
    connected: bool,
}

impl ChatState {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            seen: HashSet::new(),
            buffers: HashMap::new(),
            current_peer: None,
            chats: Vec::new(),
            connected: true,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn current_peer(&self) -> Option<&str> {
        self.current_peer.as_deref()
    }

    pub fn chats(&self) -> &[ChatSummary] {
        &self.chats
    }

    pub fn messages(&self, peer: &str) -> &[ChatMessage] {
        self.buffers.get(peer).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn apply(&mut self, event: ChatEvent) -> Vec<ViewEvent> {
        if !self.connected {
            return Vec::new();
        }

        match event {
            ChatEvent::ChatListUpdated(chats) => self.replace_chats(chats),
            ChatEvent::MessageArrived(message) => self.receive_message(message),
            ChatEvent::UserSearchResult(mut users) => {
                users.retain(|user| user.username != self.username);
                vec![ViewEvent::UserSearchResults(users)]
            }
            ChatEvent::ChatCreated(chat) => vec![ViewEvent::ChatCreated(chat)],
            ChatEvent::GroupCreated(chat) => vec![ViewEvent::GroupCreated(chat)],
            ChatEvent::ServerError(content) => vec![ViewEvent::ServerError(content)],
            ChatEvent::ConnectionLost => {
                self.connected = false;
                self.current_peer = None;
                vec![ViewEvent::Disconnected]
            }
        }
    }

    /// Makes `peer` the displayed conversation.
    ///
    /// Local buffers of the old and new conversation are dropped together with
    /// their dedup keys; the caller must follow up with a history request,
    /// whose replies repopulate the view.
    pub fn select_peer(&mut self, peer: &str) -> Result<ViewEvent, ChatError> {
        if !self.connected {
            return Err(ChatError::Disconnected);
        }
        if peer.is_empty() {
            return Err(ChatError::InvalidRequest("peer is empty"));
        }

        if let Some(previous) = self.current_peer.take() {
            self.discard_buffer(&previous);
        }
        self.discard_buffer(peer);
        self.current_peer = Some(peer.to_string());

        Ok(ViewEvent::ConversationOpened {
            peer: peer.to_string(),
        })
    }

    fn discard_buffer(&mut self, peer: &str) {
        if let Some(buffer) = self.buffers.remove(peer) {
            for message in &buffer {
                self.seen.remove(&message.key());
            }
        }
    }

    fn replace_chats(&mut self, chats: Vec<ChatSummary>) -> Vec<ViewEvent> {
        let previous = self.current_peer.take();
        let kept = previous.filter(|peer| chats.iter().any(|chat| &chat.peer == peer));
        if kept.is_none() {
            log::debug!("Current conversation left the chat list; clearing selection");
        }

        self.chats = chats;
        self.current_peer = kept.clone();

        vec![ViewEvent::ChatListReplaced {
            chats: self.chats.clone(),
            selected: kept,
        }]
    }

    fn receive_message(&mut self, message: ChatMessage) -> Vec<ViewEvent> {
        if !self.seen.insert(message.key()) {
            log::debug!(
                "Dropping duplicate message {} -> {} at {}",
                message.from,
                message.to,
                message.timestamp
            );
            return Vec::new();
        }

        let peer = message.peer_for(&self.username).to_string();
        let displayed = self.current_peer.as_deref() == Some(peer.as_str());
        let outgoing = message.from == self.username;

        let event = displayed.then(|| {
            let sender = (is_group_peer(&peer) && !outgoing).then(|| SenderHeader {
                display_name: message
                    .display_name
                    .clone()
                    .unwrap_or_else(|| message.from.clone()),
                username: message.from.clone(),
            });
            ViewEvent::MessageDisplayed(DisplayedMessage {
                peer: peer.clone(),
                from: message.from.clone(),
                content: message.content.clone(),
                timestamp: message.timestamp,
                outgoing,
                sender,
            })
        });

        self.buffers.entry(peer).or_default().push(message);
        event.into_iter().collect()
    }
}
