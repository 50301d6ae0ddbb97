use serde::{Deserialize, Serialize};

/// Độ dài tối đa (ký tự) của đoạn xem trước trong danh sách chat.
pub const PREVIEW_MAX_CHARS: usize = 100;

/// One record of the line protocol.
///
/// Every packet shares the same flat shape; which fields are populated depends
/// on `kind`. Unset fields are skipped on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chats: Option<Vec<ChatPreview>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<UserSummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<ChatPreview>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_msg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_ts: Option<i64>,
}

impl Packet {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }
}

/// Chat entry as the server sends it inside `chatlist`, `chat_created` and
/// `group_created`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatPreview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<i64>,
    #[serde(default)]
    pub peer: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub last_msg: String,
    #[serde(default)]
    pub last_ts: i64,
}

/// Kết quả tìm kiếm người dùng.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
    #[serde(default)]
    pub display_name: String,
}

/// Một dòng trong danh sách chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    pub peer: String,
    pub display_name: String,
    /// Last message, cut to [`PREVIEW_MAX_CHARS`].
    pub last_msg: String,
    pub last_ts: i64,
}

impl ChatSummary {
    /// Builds a summary from a wire preview. Returns `None` when the preview has
    /// no peer identifier to address the chat by.
    pub fn from_preview(preview: ChatPreview) -> Option<Self> {
        if preview.peer.is_empty() {
            return None;
        }
        let display_name = if preview.display_name.is_empty() {
            preview.peer.clone()
        } else {
            preview.display_name
        };
        Some(Self {
            peer: preview.peer,
            display_name,
            last_msg: truncate_preview(&preview.last_msg),
            last_ts: preview.last_ts,
        })
    }

    pub fn is_group(&self) -> bool {
        is_group_peer(&self.peer)
    }
}

/// Domain model đại diện một tin nhắn chat (giữa hai người hoặc gửi vào nhóm).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub from: String,
    pub to: String,
    pub content: String,
    pub timestamp: i64,
    /// Sender's display name, when the server supplied one.
    pub display_name: Option<String>,
}

impl ChatMessage {
    pub fn key(&self) -> MessageKey {
        MessageKey {
            from: self.from.clone(),
            to: self.to.clone(),
            timestamp: self.timestamp,
            content: self.content.clone(),
        }
    }

    /// The conversation this message belongs to, seen from `self_username`:
    /// always the other party, even for messages we sent.
    pub fn peer_for(&self, self_username: &str) -> &str {
        if self.to != self_username {
            &self.to
        } else {
            &self.from
        }
    }
}

/// Khóa nhận diện để bỏ qua tin nhắn trùng lặp.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageKey {
    pub from: String,
    pub to: String,
    pub timestamp: i64,
    pub content: String,
}

/// Định danh toàn chữ số là nhóm chat; còn lại là tên người dùng.
pub fn is_group_peer(peer: &str) -> bool {
    !peer.is_empty() && peer.chars().all(|c| c.is_ascii_digit())
}

pub fn truncate_preview(text: &str) -> String {
    text.chars().take(PREVIEW_MAX_CHARS).collect()
}
