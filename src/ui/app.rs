use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::error::ChatError;
use crate::network::ChatClient;
use crate::session::ViewEvent;

use super::components::input_bar::{self, UserAction};
use super::components::{chat_area, sidebar};
use super::state::AppState;

/// Line-oriented front end: stdin in, rendered view events out.
pub struct TerminalApp {
    state: AppState,
    client: ChatClient,
    event_receiver: mpsc::UnboundedReceiver<ViewEvent>,
}

impl TerminalApp {
    pub fn new(client: ChatClient, event_receiver: mpsc::UnboundedReceiver<ViewEvent>) -> Self {
        Self {
            state: AppState::new(),
            client,
            event_receiver,
        }
    }

    pub async fn run(mut self) -> Result<(), ChatError> {
        println!("Signed in as {}. {}", self.client.username(), input_bar::HELP);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                event = self.event_receiver.recv() => {
                    let Some(event) = event else { break };
                    self.render(&event);
                    if self.state.disconnected {
                        break;
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if !self.handle_line(&line).await {
                        break;
                    }
                }
            }
        }

        self.client.stop();
        Ok(())
    }

    fn render(&mut self, event: &ViewEvent) {
        self.state.update(event);
        match event {
            ViewEvent::ChatListReplaced { .. } => {
                for line in sidebar::render(&self.state.chats, self.state.selected.as_deref()) {
                    println!("{line}");
                }
                if self.state.selected.is_none() {
                    println!("-- {} --", self.state.header());
                }
            }
            ViewEvent::ConversationOpened { .. } => println!("-- {} --", self.state.header()),
            ViewEvent::MessageDisplayed(message) => {
                for line in chat_area::render(message) {
                    println!("{line}");
                }
            }
            ViewEvent::UserSearchResults(users) => {
                for user in users {
                    println!("  {} ({})", user.display_name, user.username);
                }
            }
            ViewEvent::ChatCreated(chat) => println!("Chat with {} is ready", chat.display_name),
            ViewEvent::GroupCreated(chat) => println!("Group {} created", chat.display_name),
            ViewEvent::ServerError(content) => println!("! {content}"),
            ViewEvent::Disconnected => println!("Connection to server lost"),
        }
    }

    /// Returns `false` when the user asked to quit.
    async fn handle_line(&mut self, line: &str) -> bool {
        let Some(action) = input_bar::parse(line) else {
            return true;
        };

        let result = match action {
            UserAction::Open(peer) => self.client.select_peer(&peer).await,
            UserAction::Search(query) => self.client.search_users(&query).await,
            UserAction::StartChat(user) => self.client.start_chat(&user).await,
            UserAction::CreateGroup { name, participants } => {
                self.client.create_group(&name, participants).await
            }
            UserAction::Send(text) => self.client.send_message(&text).await,
            UserAction::ListChats => {
                let selected = self.client.current_peer();
                for line in sidebar::render(&self.state.chats, selected.as_deref()) {
                    println!("{line}");
                }
                Ok(())
            }
            UserAction::Quit => return false,
            UserAction::Invalid(hint) => {
                println!("{hint}");
                Ok(())
            }
        };

        // Disconnects arrive as a view event; only local problems are shown here.
        if let Err(err) = result {
            if !err.is_disconnect() {
                println!("! {err}");
            }
        }
        true
    }
}
