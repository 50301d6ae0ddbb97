use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::common::{ChatEvent, ChatSummary, OutboundRequest};
use crate::error::ChatError;
use crate::session::{ChatState, ViewEvent};

use super::auth::sign_in;
use super::dispatch::dispatch;
use super::transport::{Connection, ConnectionHandle, Inbound};

/// A logged-in chat session bound to one connection.
///
/// Inbound packets are applied to the [`ChatState`] on the receive task;
/// requests are sent from whichever task calls the methods below. View events
/// are published while the state lock is held, so their order on the channel
/// is the order in which the state changed.
pub struct ChatClient {
    handle: ConnectionHandle,
    state: Arc<Mutex<ChatState>>,
    view_tx: mpsc::UnboundedSender<ViewEvent>,
    receiver: Option<JoinHandle<()>>,
}

impl ChatClient {
    /// Signs in at `addr` and starts the session.
    pub async fn login(
        addr: &str,
        username: &str,
        password: &str,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ViewEvent>), ChatError> {
        let connection = sign_in(addr, username, password).await?;
        Ok(Self::start(connection, username))
    }

    /// Spawns the receive loop for an authenticated connection.
    pub fn start(
        connection: Connection,
        username: impl Into<String>,
    ) -> (Self, mpsc::UnboundedReceiver<ViewEvent>) {
        let (view_tx, view_rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(ChatState::new(username)));
        let handle = connection.handle();

        let receiver = connection.run({
            let state = Arc::clone(&state);
            let view_tx = view_tx.clone();
            move |inbound| {
                let event = match inbound {
                    Inbound::Packet(packet) => match dispatch(packet) {
                        Some(event) => event,
                        None => return,
                    },
                    Inbound::Lost(reason) => {
                        log::info!("Connection lost: {reason:?}");
                        ChatEvent::ConnectionLost
                    }
                };
                publish(&mut lock(&state), &view_tx, event);
            }
        });

        let client = Self {
            handle,
            state,
            view_tx,
            receiver: Some(receiver),
        };
        (client, view_rx)
    }

    pub fn username(&self) -> String {
        lock(&self.state).username().to_string()
    }

    pub fn current_peer(&self) -> Option<String> {
        lock(&self.state).current_peer().map(str::to_string)
    }

    pub fn chats(&self) -> Vec<ChatSummary> {
        lock(&self.state).chats().to_vec()
    }

    pub fn is_connected(&self) -> bool {
        lock(&self.state).is_connected()
    }

    /// Switches the displayed conversation and asks the server for its
    /// history. Nothing is displayed until the replay arrives.
    pub async fn select_peer(&self, peer: &str) -> Result<(), ChatError> {
        let username = {
            let mut state = lock(&self.state);
            let opened = state.select_peer(peer)?;
            emit(&self.view_tx, opened);
            state.username().to_string()
        };
        self.send(OutboundRequest::history(username, peer)).await
    }

    /// Sends `text` to the current conversation, stamped with the current
    /// unix time. The server's echo shows up as an outgoing message.
    pub async fn send_message(&self, text: &str) -> Result<(), ChatError> {
        let content = text.trim();
        if content.is_empty() {
            return Err(ChatError::InvalidRequest("message content is empty"));
        }

        let (from, to) = {
            let state = lock(&self.state);
            if !state.is_connected() {
                return Err(ChatError::Disconnected);
            }
            let Some(peer) = state.current_peer() else {
                return Err(ChatError::NoPeerSelected);
            };
            (state.username().to_string(), peer.to_string())
        };
        self.send(OutboundRequest::message(from, to, content, Utc::now().timestamp()))
            .await
    }

    pub async fn search_users(&self, query: &str) -> Result<(), ChatError> {
        self.send(OutboundRequest::user_search(query.trim())).await
    }

    pub async fn start_chat(&self, peer: &str) -> Result<(), ChatError> {
        self.send(OutboundRequest::start_chat(peer.trim())).await
    }

    pub async fn create_group(&self, name: &str, participants: Vec<String>) -> Result<(), ChatError> {
        self.send(OutboundRequest::create_group(name.trim(), participants))
            .await
    }

    /// Validates and transmits one request. A transport failure ends the
    /// session exactly as an unsolicited disconnect would; it is not retried.
    pub async fn send(&self, request: OutboundRequest) -> Result<(), ChatError> {
        let packet = request.into_packet()?;
        if !self.is_connected() {
            return Err(ChatError::Disconnected);
        }

        match self.handle.send(&packet).await {
            Ok(()) => Ok(()),
            Err(err) => {
                if err.is_disconnect() {
                    log::warn!("Sending `{}` failed: {err}", packet.kind);
                    self.connection_lost();
                }
                Err(err)
            }
        }
    }

    /// Closes the connection. Safe to call repeatedly.
    pub fn stop(&self) {
        self.handle.stop();
    }

    /// Waits for the receive loop to finish.
    pub async fn closed(mut self) {
        if let Some(receiver) = self.receiver.take() {
            if let Err(err) = receiver.await {
                log::error!("Receive loop panicked: {err}");
            }
        }
    }

    fn connection_lost(&self) {
        publish(&mut lock(&self.state), &self.view_tx, ChatEvent::ConnectionLost);
        self.handle.stop();
    }
}

impl Drop for ChatClient {
    fn drop(&mut self) {
        self.handle.stop();
    }
}

fn lock(state: &Mutex<ChatState>) -> MutexGuard<'_, ChatState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn publish(state: &mut ChatState, view_tx: &mpsc::UnboundedSender<ViewEvent>, event: ChatEvent) {
    for view_event in state.apply(event) {
        emit(view_tx, view_event);
    }
}

fn emit(view_tx: &mpsc::UnboundedSender<ViewEvent>, event: ViewEvent) {
    if view_tx.send(event).is_err() {
        log::debug!("View receiver dropped; discarding event");
    }
}
