use crate::session::DisplayedMessage;

use super::time_label;

pub fn render(message: &DisplayedMessage) -> Vec<String> {
    let mut lines = Vec::with_capacity(2);
    if let Some(sender) = &message.sender {
        lines.push(format!("    {} ({})", sender.display_name, sender.username));
    }
    let arrow = if message.outgoing { '>' } else { '<' };
    lines.push(format!(
        "[{}] {arrow} {}",
        time_label(message.timestamp),
        message.content
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SenderHeader;

    fn displayed(outgoing: bool, sender: Option<SenderHeader>) -> DisplayedMessage {
        DisplayedMessage {
            peer: "42".into(),
            from: "bob".into(),
            content: "hello".into(),
            timestamp: 0,
            outgoing,
            sender,
        }
    }

    #[test]
    fn incoming_group_message_has_header_line() {
        let lines = render(&displayed(
            false,
            Some(SenderHeader {
                display_name: "Bob B".into(),
                username: "bob".into(),
            }),
        ));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "    Bob B (bob)");
        assert!(lines[1].ends_with("< hello"));
    }

    #[test]
    fn outgoing_message_is_single_line() {
        let lines = render(&displayed(true, None));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("> hello"));
    }
}
