use chrono::Utc;

use crate::common::{ChatEvent, ChatMessage, ChatPreview, ChatSummary, Packet};

/// Maps a decoded packet to the event it announces.
///
/// Unknown packet types and messages missing their addressing fields yield
/// `None`; neither is an error.
pub fn dispatch(packet: Packet) -> Option<ChatEvent> {
    let kind = packet.kind.clone();
    match kind.as_str() {
        "chatlist" => Some(ChatEvent::ChatListUpdated(
            packet
                .chats
                .unwrap_or_default()
                .into_iter()
                .filter_map(ChatSummary::from_preview)
                .collect(),
        )),
        "message" => message_from(packet).map(ChatEvent::MessageArrived),
        "user_search_result" => Some(ChatEvent::UserSearchResult(
            packet.users.unwrap_or_default(),
        )),
        "chat_created" => chat_descriptor(packet).map(ChatEvent::ChatCreated),
        "group_created" => chat_descriptor(packet).map(ChatEvent::GroupCreated),
        "error" => Some(ChatEvent::ServerError(
            packet.content.unwrap_or_else(|| "unknown error".to_string()),
        )),
        other => {
            log::debug!("Ignoring packet of unknown type `{other}`");
            None
        }
    }
}

fn message_from(packet: Packet) -> Option<ChatMessage> {
    let (Some(from), Some(to), Some(content)) = (packet.from, packet.to, packet.content) else {
        log::debug!("Dropping message packet without from/to/content");
        return None;
    };
    Some(ChatMessage {
        from,
        to,
        content,
        timestamp: packet.timestamp.unwrap_or_else(|| Utc::now().timestamp()),
        display_name: packet.display_name,
    })
}

/// The server nests the new chat under `chat`; flat fields are the fallback.
fn chat_descriptor(packet: Packet) -> Option<ChatSummary> {
    let preview = match packet.chat {
        Some(chat) => chat,
        None => ChatPreview {
            chat_id: packet.chat_id,
            peer: packet.peer.unwrap_or_default(),
            display_name: packet.display_name.unwrap_or_default(),
            last_msg: packet.last_msg.unwrap_or_default(),
            last_ts: packet.last_ts.unwrap_or_default(),
        },
    };
    let summary = ChatSummary::from_preview(preview);
    if summary.is_none() {
        log::debug!("Dropping `{}` packet without a peer", packet.kind);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Packet {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn chatlist_becomes_summaries() {
        let event = dispatch(parse(
            r#"{"type":"chatlist","chats":[
                {"peer":"bob","display_name":"Bob","last_msg":"hi","last_ts":100},
                {"peer":"","display_name":"ghost","last_msg":"","last_ts":0},
                {"chat_id":7,"peer":"7","display_name":"Team","last_msg":"yo","last_ts":90}
            ]}"#,
        ));
        let Some(ChatEvent::ChatListUpdated(chats)) = event else {
            panic!("expected chat list");
        };
        let peers: Vec<_> = chats.iter().map(|c| c.peer.as_str()).collect();
        assert_eq!(peers, ["bob", "7"]);
        assert_eq!(chats[0].display_name, "Bob");
    }

    #[test]
    fn chatlist_without_chats_is_empty_list() {
        assert_eq!(
            dispatch(parse(r#"{"type":"chatlist"}"#)),
            Some(ChatEvent::ChatListUpdated(Vec::new()))
        );
    }

    #[test]
    fn message_is_mapped() {
        let event = dispatch(parse(
            r#"{"type":"message","from":"bob","to":"alice","content":"hi","timestamp":100,"display_name":"Bob B"}"#,
        ));
        assert_eq!(
            event,
            Some(ChatEvent::MessageArrived(ChatMessage {
                from: "bob".into(),
                to: "alice".into(),
                content: "hi".into(),
                timestamp: 100,
                display_name: Some("Bob B".into()),
            }))
        );
    }

    #[test]
    fn message_missing_fields_is_dropped() {
        assert_eq!(
            dispatch(parse(r#"{"type":"message","from":"bob","content":"hi"}"#)),
            None
        );
    }

    #[test]
    fn message_without_timestamp_gets_current_time() {
        let before = Utc::now().timestamp();
        let Some(ChatEvent::MessageArrived(message)) = dispatch(parse(
            r#"{"type":"message","from":"bob","to":"alice","content":"hi"}"#,
        )) else {
            panic!("expected message");
        };
        assert!(message.timestamp >= before);
    }

    #[test]
    fn unknown_types_are_ignored() {
        assert_eq!(dispatch(parse(r#"{"type":"typing","from":"bob"}"#)), None);
        assert_eq!(dispatch(parse(r#"{"from":"bob"}"#)), None);
        assert_eq!(dispatch(parse(r#"{"type":"login_ok"}"#)), None);
    }

    #[test]
    fn search_results_are_forwarded() {
        let event = dispatch(parse(
            r#"{"type":"user_search_result","users":[{"username":"bob","display_name":"Bob B"}]}"#,
        ));
        let Some(ChatEvent::UserSearchResult(users)) = event else {
            panic!("expected search result");
        };
        assert_eq!(users[0].username, "bob");
    }

    #[test]
    fn created_chats_accept_nested_and_flat_descriptors() {
        let nested = dispatch(parse(
            r#"{"type":"chat_created","chat":{"chat_id":3,"peer":"bob","display_name":"Bob","last_msg":"","last_ts":0}}"#,
        ));
        assert!(matches!(nested, Some(ChatEvent::ChatCreated(ref c)) if c.peer == "bob"));

        let flat = dispatch(parse(
            r#"{"type":"group_created","chat_id":12,"peer":"12","display_name":"Team","last_msg":"","last_ts":5}"#,
        ));
        assert!(matches!(flat, Some(ChatEvent::GroupCreated(ref c)) if c.peer == "12" && c.last_ts == 5));
    }

    #[test]
    fn server_error_carries_content() {
        assert_eq!(
            dispatch(parse(r#"{"type":"error","content":"no such user"}"#)),
            Some(ChatEvent::ServerError("no such user".into()))
        );
    }
}
