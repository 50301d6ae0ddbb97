use crate::error::ChatError;

use super::types::Packet;

/// Requests the client sends to the server.
///
/// Each variant maps to exactly one packet; [`OutboundRequest::into_packet`]
/// validates the variant first so nothing malformed reaches the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundRequest {
    SignIn {
        username: String,
        password: String,
    },
    SignUp {
        username: String,
        password: String,
        first_name: String,
        last_name: String,
    },
    /// Ask the server to replay a conversation as `message` packets.
    History { from: String, to: String },
    Message {
        from: String,
        to: String,
        content: String,
        /// Wall-clock unix seconds supplied by the caller.
        timestamp: i64,
    },
    UserSearch { query: String },
    /// Create or look up a direct chat with `peer`.
    StartChat { peer: String },
    CreateGroup {
        name: String,
        participants: Vec<String>,
    },
}

impl OutboundRequest {
    pub fn history(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::History {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn message(
        from: impl Into<String>,
        to: impl Into<String>,
        content: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self::Message {
            from: from.into(),
            to: to.into(),
            content: content.into(),
            timestamp,
        }
    }

    pub fn user_search(query: impl Into<String>) -> Self {
        Self::UserSearch {
            query: query.into(),
        }
    }

    pub fn start_chat(peer: impl Into<String>) -> Self {
        Self::StartChat { peer: peer.into() }
    }

    pub fn create_group(name: impl Into<String>, participants: Vec<String>) -> Self {
        Self::CreateGroup {
            name: name.into(),
            participants,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::SignIn { .. } => "signin",
            Self::SignUp { .. } => "signup",
            Self::History { .. } => "history",
            Self::Message { .. } => "message",
            Self::UserSearch { .. } => "user_search",
            Self::StartChat { .. } => "start_chat",
            Self::CreateGroup { .. } => "create_group",
        }
    }

    pub fn validate(&self) -> Result<(), ChatError> {
        match self {
            Self::SignIn { username, password } | Self::SignUp { username, password, .. } => {
                if username.trim().is_empty() || password.is_empty() {
                    return Err(ChatError::InvalidRequest("username and password are required"));
                }
            }
            Self::History { to, .. } if to.is_empty() => {
                return Err(ChatError::InvalidRequest("history needs a target"));
            }
            Self::Message { to, content, .. } => {
                if content.is_empty() {
                    return Err(ChatError::InvalidRequest("message content is empty"));
                }
                if to.is_empty() {
                    return Err(ChatError::InvalidRequest("message has no recipient"));
                }
            }
            Self::UserSearch { query } if query.trim().is_empty() => {
                return Err(ChatError::InvalidRequest("search query is empty"));
            }
            Self::StartChat { peer } if peer.trim().is_empty() => {
                return Err(ChatError::InvalidRequest("start_chat needs a peer"));
            }
            Self::CreateGroup { name, participants } => {
                if name.trim().is_empty() {
                    return Err(ChatError::InvalidRequest("group name is empty"));
                }
                if participants.is_empty() {
                    return Err(ChatError::InvalidRequest("group needs at least one participant"));
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub fn into_packet(self) -> Result<Packet, ChatError> {
        self.validate()?;
        let mut packet = Packet::new(self.kind());
        match self {
            Self::SignIn { username, password } => {
                packet.from = Some(username);
                packet.password = Some(password);
            }
            Self::SignUp {
                username,
                password,
                first_name,
                last_name,
            } => {
                packet.from = Some(username);
                packet.password = Some(password);
                packet.first_name = Some(first_name);
                packet.last_name = Some(last_name);
            }
            Self::History { from, to } => {
                packet.from = Some(from);
                packet.to = Some(to);
            }
            Self::Message {
                from,
                to,
                content,
                timestamp,
            } => {
                packet.from = Some(from);
                packet.to = Some(to);
                packet.content = Some(content);
                packet.timestamp = Some(timestamp);
            }
            Self::UserSearch { query } => packet.query = Some(query),
            Self::StartChat { peer } => packet.to = Some(peer),
            Self::CreateGroup { name, participants } => {
                packet.name = Some(name);
                packet.participants = Some(participants);
            }
        }
        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_packet_carries_all_fields() {
        let packet = OutboundRequest::message("alice", "bob", "hi", 100)
            .into_packet()
            .unwrap();
        assert_eq!(packet.kind, "message");
        assert_eq!(packet.from.as_deref(), Some("alice"));
        assert_eq!(packet.to.as_deref(), Some("bob"));
        assert_eq!(packet.content.as_deref(), Some("hi"));
        assert_eq!(packet.timestamp, Some(100));
    }

    #[test]
    fn empty_message_is_never_built() {
        let err = OutboundRequest::message("alice", "bob", "", 100)
            .into_packet()
            .unwrap_err();
        assert!(matches!(err, ChatError::InvalidRequest(_)));
    }

    #[test]
    fn group_needs_name_and_participants() {
        assert!(
            OutboundRequest::create_group("", vec!["bob".into()])
                .into_packet()
                .is_err()
        );
        assert!(
            OutboundRequest::create_group("team", Vec::new())
                .into_packet()
                .is_err()
        );

        let packet = OutboundRequest::create_group("team", vec!["bob".into(), "carol".into()])
            .into_packet()
            .unwrap();
        let json = serde_json::to_string(&packet).unwrap();
        assert_eq!(
            json,
            r#"{"type":"create_group","name":"team","participants":["bob","carol"]}"#
        );
    }

    #[test]
    fn start_chat_targets_peer_in_to_field() {
        let packet = OutboundRequest::start_chat("bob").into_packet().unwrap();
        assert_eq!(packet.kind, "start_chat");
        assert_eq!(packet.to.as_deref(), Some("bob"));
    }

    #[test]
    fn sign_in_requires_credentials() {
        let request = OutboundRequest::SignIn {
            username: "alice".into(),
            password: String::new(),
        };
        assert!(request.into_packet().is_err());
    }
}
