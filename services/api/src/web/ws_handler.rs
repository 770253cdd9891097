//! services/api/src/web/ws_handler.rs
//!
//! The chat panel over a WebSocket connection. Each connection owns its own
//! transcript; the remote model only ever sees the latest prompt.

use crate::web::{
    protocol::{ClientMessage, ServerMessage},
    state::AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{Sink, SinkExt, StreamExt};
use notes_hub_core::{ChatGateway, ChatPanel, ChatPanelError};
use std::sync::Arc;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, error, info, warn};

/// The outgoing half of a chat panel, shared with the reply task.
type WsSender<S> = Arc<Mutex<S>>;

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn chat_ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    info!("Chat panel opened.");

    // The sender is shared with the reply task.
    let (sender, mut receiver) = socket.split();
    let ws_sender = Arc::new(Mutex::new(sender));
    let panel = Arc::new(Mutex::new(ChatPanel::new()));

    if !send_message(&ws_sender, &ServerMessage::PanelOpened).await {
        error!("Failed to send panel opened message.");
        return;
    }

    let mut reply_task: Option<JoinHandle<()>> = None;

    loop {
        match receiver.next().await {
            Some(Ok(Message::Text(text))) => {
                handle_text_message(
                    text.to_string(),
                    &app_state.chat,
                    &panel,
                    &ws_sender,
                    &mut reply_task,
                )
                .await;
            }
            Some(Ok(Message::Close(_))) => {
                info!("Client closed the chat panel.");
                break;
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                warn!("Chat socket error: {}", e);
                break;
            }
            None => {
                info!("Client disconnected.");
                break;
            }
        }
    }

    // --- Cleanup ---
    // A reply that arrives after the panel closed is dropped with its task.
    if let Some(handle) = reply_task {
        handle.abort();
    }
    info!("Chat panel closed.");
}

/// Helper function to handle the logic for different `ClientMessage` variants.
async fn handle_text_message<S>(
    text: String,
    chat: &ChatGateway,
    panel: &Arc<Mutex<ChatPanel>>,
    ws_sender: &WsSender<S>,
    reply_task: &mut Option<JoinHandle<()>>,
) where
    S: Sink<Message> + Unpin + Send + 'static,
{
    let client_msg = match serde_json::from_str::<ClientMessage>(&text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!("Failed to deserialize client message: {}", e);
            send_message(
                ws_sender,
                &ServerMessage::Error {
                    message: "Unrecognised message.".to_string(),
                },
            )
            .await;
            return;
        }
    };

    match client_msg {
        ClientMessage::Send { text } => {
            let outcome = panel.lock().await.begin_send(&text);
            let prompt = match outcome {
                Ok(prompt) => prompt,
                Err(ChatPanelError::Busy) => {
                    debug!("Send rejected while a reply is pending.");
                    send_message(ws_sender, &ServerMessage::Busy).await;
                    return;
                }
                Err(ChatPanelError::EmptyMessage) => {
                    debug!("Ignoring blank chat message.");
                    return;
                }
            };

            send_message(ws_sender, &ServerMessage::Typing).await;

            let task = {
                let chat = chat.clone();
                let panel = panel.clone();
                let ws_sender = ws_sender.clone();
                tokio::spawn(async move {
                    let reply = chat.send(&prompt).await;
                    panel.lock().await.receive_reply(reply.clone());
                    let msg = ServerMessage::Reply {
                        role: "model".to_string(),
                        text: reply,
                    };
                    if !send_message(&ws_sender, &msg).await {
                        warn!("Failed to deliver chat reply. Client may have disconnected.");
                    }
                })
            };
            *reply_task = Some(task);
        }
    }
}

/// Serializes and sends `msg`. Returns false if the client is gone.
async fn send_message<S>(ws_sender: &WsSender<S>, msg: &ServerMessage) -> bool
where
    S: Sink<Message> + Unpin,
{
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize server message: {}", e);
            return false;
        }
    };
    ws_sender
        .lock()
        .await
        .send(Message::Text(json.into()))
        .await
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::{
        channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender},
        FutureExt,
    };
    use notes_hub_core::{
        chat::MISSING_CREDENTIAL_MESSAGE, ChatRole, ChatService, PortError, PortResult,
    };
    use serde_json::Value;
    use tokio::sync::Notify;

    /// Replies with the prompt once released, or fails when told to.
    struct GatedService {
        release: Arc<Notify>,
        fail: bool,
    }

    #[async_trait]
    impl ChatService for GatedService {
        async fn generate_reply(
            &self,
            _system_instruction: &str,
            prompt: &str,
        ) -> PortResult<String> {
            self.release.notified().await;
            if self.fail {
                Err(PortError::Unexpected("quota exhausted".to_string()))
            } else {
                Ok(format!("echo: {}", prompt))
            }
        }
    }

    struct Harness {
        chat: ChatGateway,
        panel: Arc<Mutex<ChatPanel>>,
        sender: WsSender<UnboundedSender<Message>>,
        outgoing: UnboundedReceiver<Message>,
        reply_task: Option<JoinHandle<()>>,
    }

    impl Harness {
        fn new(chat: ChatGateway) -> Self {
            let (tx, rx) = unbounded();
            Self {
                chat,
                panel: Arc::new(Mutex::new(ChatPanel::new())),
                sender: Arc::new(Mutex::new(tx)),
                outgoing: rx,
                reply_task: None,
            }
        }

        fn gated(fail: bool) -> (Self, Arc<Notify>) {
            let release = Arc::new(Notify::new());
            let service: Arc<dyn ChatService> = Arc::new(GatedService {
                release: release.clone(),
                fail,
            });
            (Self::new(ChatGateway::new(Some(service))), release)
        }

        async fn receive_text(&mut self, text: &str) {
            handle_text_message(
                text.to_string(),
                &self.chat,
                &self.panel,
                &self.sender,
                &mut self.reply_task,
            )
            .await;
        }

        async fn send(&mut self, text: &str) {
            let frame = serde_json::json!({ "type": "send", "text": text }).to_string();
            self.receive_text(&frame).await;
        }

        async fn next_server_message(&mut self) -> Value {
            match self.outgoing.next().await {
                Some(Message::Text(text)) => serde_json::from_str(text.as_str()).unwrap(),
                other => panic!("unexpected frame: {:?}", other),
            }
        }

        fn nothing_sent(&mut self) -> bool {
            self.outgoing.next().now_or_never().is_none()
        }
    }

    #[tokio::test]
    async fn send_shows_typing_then_delivers_reply() {
        let (mut harness, release) = Harness::gated(false);

        harness.send("what is entropy?").await;
        assert_eq!(harness.next_server_message().await["type"], "typing");

        release.notify_one();
        let reply = harness.next_server_message().await;
        assert_eq!(reply["type"], "reply");
        assert_eq!(reply["role"], "model");
        assert_eq!(reply["text"], "echo: what is entropy?");

        let panel = harness.panel.lock().await;
        assert!(!panel.is_pending());
        let roles: Vec<ChatRole> = panel.transcript().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Model]);
    }

    #[tokio::test]
    async fn second_send_while_waiting_is_busy() {
        let (mut harness, release) = Harness::gated(false);

        harness.send("first").await;
        assert_eq!(harness.next_server_message().await["type"], "typing");

        harness.send("second").await;
        assert_eq!(harness.next_server_message().await["type"], "busy");

        release.notify_one();
        let reply = harness.next_server_message().await;
        assert_eq!(reply["text"], "echo: first");

        // The panel accepts a new message once the reply has landed.
        harness.send("third").await;
        assert_eq!(harness.next_server_message().await["type"], "typing");
        assert_eq!(harness.panel.lock().await.transcript().len(), 3);
    }

    #[tokio::test]
    async fn gateway_failure_arrives_as_reply_text() {
        let (mut harness, release) = Harness::gated(true);

        harness.send("hello").await;
        assert_eq!(harness.next_server_message().await["type"], "typing");
        release.notify_one();

        let reply = harness.next_server_message().await;
        assert_eq!(reply["type"], "reply");
        assert_eq!(
            reply["text"],
            "An error occurred while communicating with the Gemini API: quota exhausted"
        );
    }

    #[tokio::test]
    async fn missing_credential_is_explained_in_reply() {
        let mut harness = Harness::new(ChatGateway::unconfigured());

        harness.send("hello").await;
        assert_eq!(harness.next_server_message().await["type"], "typing");
        let reply = harness.next_server_message().await;
        assert_eq!(reply["text"], MISSING_CREDENTIAL_MESSAGE);
    }

    #[tokio::test]
    async fn blank_message_is_ignored() {
        let mut harness = Harness::new(ChatGateway::unconfigured());

        harness.send("   ").await;

        assert!(harness.nothing_sent());
        assert!(harness.reply_task.is_none());
        assert!(harness.panel.lock().await.transcript().is_empty());
    }

    #[tokio::test]
    async fn unrecognised_frame_gets_error() {
        let mut harness = Harness::new(ChatGateway::unconfigured());

        harness.receive_text(r#"{"type":"shout"}"#).await;

        let msg = harness.next_server_message().await;
        assert_eq!(msg["type"], "error");
        assert_eq!(msg["message"], "Unrecognised message.");
        assert!(harness.panel.lock().await.transcript().is_empty());
    }
}
