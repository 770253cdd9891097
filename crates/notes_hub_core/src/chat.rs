//! crates/notes_hub_core/src/chat.rs
//!
//! The chat gateway, which never fails from the caller's point of view, and
//! the per-panel transcript with its single-flight rule.

use crate::domain::ChatMessage;
use crate::ports::ChatService;
use std::sync::Arc;

/// The persona sent with every request.
pub const SYSTEM_INSTRUCTION: &str =
    "You are a helpful college assistant. Answer the user's questions clearly and concisely.";

/// Returned instead of calling out when no credential is configured.
pub const MISSING_CREDENTIAL_MESSAGE: &str =
    "Error: Gemini API key is not configured. Please set the API_KEY environment variable.";

/// A stateless bridge to the chat model. Failures come back as text so the
/// transcript can show them like any other model turn.
#[derive(Clone)]
pub struct ChatGateway {
    service: Option<Arc<dyn ChatService>>,
}

impl ChatGateway {
    /// `None` means no credential was configured.
    pub fn new(service: Option<Arc<dyn ChatService>>) -> Self {
        Self { service }
    }

    pub fn unconfigured() -> Self {
        Self { service: None }
    }

    pub fn is_configured(&self) -> bool {
        self.service.is_some()
    }

    pub async fn send(&self, prompt: &str) -> String {
        let Some(service) = &self.service else {
            return MISSING_CREDENTIAL_MESSAGE.to_string();
        };

        match service.generate_reply(SYSTEM_INSTRUCTION, prompt).await {
            Ok(text) => text,
            Err(e) => format!(
                "An error occurred while communicating with the Gemini API: {}",
                e
            ),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChatPanelError {
    #[error("Still waiting for the previous reply.")]
    Busy,
    #[error("Message is empty.")]
    EmptyMessage,
}

/// The transcript of one open chat panel.
#[derive(Debug, Clone, Default)]
pub struct ChatPanel {
    transcript: Vec<ChatMessage>,
    pending: bool,
}

impl ChatPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// True while a reply is outstanding; the UI shows a typing indicator.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Records the user's turn and returns the prompt to send.
    pub fn begin_send(&mut self, input: &str) -> Result<String, ChatPanelError> {
        if self.pending {
            return Err(ChatPanelError::Busy);
        }
        if input.trim().is_empty() {
            return Err(ChatPanelError::EmptyMessage);
        }
        self.transcript.push(ChatMessage::user(input));
        self.pending = true;
        Ok(input.to_string())
    }

    /// Records the model's turn and frees the panel for the next send.
    pub fn receive_reply(&mut self, text: impl Into<String>) {
        self.transcript.push(ChatMessage::model(text));
        self.pending = false;
    }
}
