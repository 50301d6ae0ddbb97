use crate::common::ChatSummary;
use crate::session::ViewEvent;

/// Trạng thái cục bộ của UI terminal.
#[derive(Debug, Default)]
pub struct AppState {
    pub chats: Vec<ChatSummary>,
    pub selected: Option<String>,
    pub disconnected: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, event: &ViewEvent) {
        match event {
            ViewEvent::ChatListReplaced { chats, selected } => {
                self.chats = chats.clone();
                self.selected = selected.clone();
            }
            ViewEvent::ConversationOpened { peer } => self.selected = Some(peer.clone()),
            ViewEvent::Disconnected => {
                self.disconnected = true;
                self.selected = None;
            }
            ViewEvent::MessageDisplayed(_)
            | ViewEvent::UserSearchResults(_)
            | ViewEvent::ChatCreated(_)
            | ViewEvent::GroupCreated(_)
            | ViewEvent::ServerError(_) => {}
        }
    }

    /// Tiêu đề của cuộc trò chuyện đang mở.
    pub fn header(&self) -> String {
        let Some(peer) = self.selected.as_deref() else {
            return "Select a chat".to_string();
        };
        self.chats
            .iter()
            .find(|chat| chat.peer == peer)
            .map(|chat| chat.display_name.clone())
            .unwrap_or_else(|| peer.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_follows_selection() {
        let mut state = AppState::new();
        assert_eq!(state.header(), "Select a chat");

        state.update(&ViewEvent::ChatListReplaced {
            chats: vec![ChatSummary {
                peer: "bob".into(),
                display_name: "Bob".into(),
                last_msg: String::new(),
                last_ts: 0,
            }],
            selected: None,
        });
        state.update(&ViewEvent::ConversationOpened { peer: "bob".into() });
        assert_eq!(state.header(), "Bob");

        state.update(&ViewEvent::ConversationOpened { peer: "7".into() });
        assert_eq!(state.header(), "7");

        state.update(&ViewEvent::Disconnected);
        assert!(state.disconnected);
        assert_eq!(state.header(), "Select a chat");
    }
}
