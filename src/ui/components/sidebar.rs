use crate::common::ChatSummary;

use super::time_label;

pub fn render(chats: &[ChatSummary], selected: Option<&str>) -> Vec<String> {
    if chats.is_empty() {
        return vec!["(no chats yet)".to_string()];
    }

    chats
        .iter()
        .map(|chat| {
            let marker = if selected == Some(chat.peer.as_str()) { '*' } else { ' ' };
            let kind = if chat.is_group() { '#' } else { '@' };
            format!(
                "{marker} {kind}{} {} [{}] {}",
                chat.peer,
                chat.display_name,
                time_label(chat.last_ts),
                chat.last_msg
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(peer: &str, name: &str) -> ChatSummary {
        ChatSummary {
            peer: peer.into(),
            display_name: name.into(),
            last_msg: "hi".into(),
            last_ts: 100,
        }
    }

    #[test]
    fn marks_selection_and_groups() {
        let lines = render(&[chat("bob", "Bob"), chat("42", "Team")], Some("42"));
        assert!(lines[0].starts_with("  @bob Bob"));
        assert!(lines[1].starts_with("* #42 Team"));
        assert!(lines[1].ends_with("hi"));
    }

    #[test]
    fn empty_list_has_placeholder() {
        assert_eq!(render(&[], None), ["(no chats yet)"]);
    }
}
