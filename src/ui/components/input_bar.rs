/// What a line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Open(String),
    Search(String),
    StartChat(String),
    CreateGroup {
        name: String,
        participants: Vec<String>,
    },
    ListChats,
    Quit,
    Send(String),
    Invalid(&'static str),
}

pub const HELP: &str =
    "/open <peer>  /search <query>  /chat <user>  /group <name> <user>...  /chats  /quit";

pub fn parse(line: &str) -> Option<UserAction> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Some(UserAction::Send(line.to_string()));
    };

    let mut words = command.split_whitespace();
    let action = match (words.next(), words.next()) {
        (Some("open"), Some(peer)) => UserAction::Open(peer.to_string()),
        (Some("search"), Some(first)) => {
            let rest: Vec<_> = std::iter::once(first).chain(words).collect();
            UserAction::Search(rest.join(" "))
        }
        (Some("chat"), Some(user)) => UserAction::StartChat(user.to_string()),
        (Some("group"), Some(name)) => {
            let participants: Vec<String> = words.map(str::to_string).collect();
            if participants.is_empty() {
                UserAction::Invalid("a group needs at least one participant")
            } else {
                UserAction::CreateGroup {
                    name: name.to_string(),
                    participants,
                }
            }
        }
        (Some("chats"), None) => UserAction::ListChats,
        (Some("quit"), None) => UserAction::Quit,
        _ => UserAction::Invalid(HELP),
    };
    Some(action)
}
