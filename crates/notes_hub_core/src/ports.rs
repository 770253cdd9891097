//! crates/notes_hub_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! The chat model is the only external service; the core never talks to it
//! directly and stays independent of any particular API client.

use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, API).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("{0}")]
    Unexpected(String),
    #[error("The model returned an empty response.")]
    EmptyResponse,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Produces a single completion for `prompt` under the given persona.
    /// No previous turns are sent.
    async fn generate_reply(&self, system_instruction: &str, prompt: &str) -> PortResult<String>;
}
