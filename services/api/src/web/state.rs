//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use notes_hub_core::{ChatGateway, Workspace};
use std::sync::Arc;
use tokio::sync::Mutex;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// There is exactly one session workspace; every request sees the same notes.
#[derive(Clone)]
pub struct AppState {
    pub workspace: Arc<Mutex<Workspace>>,
    pub config: Arc<Config>,
    pub chat: ChatGateway,
}

impl AppState {
    pub fn new(workspace: Workspace, config: Arc<Config>, chat: ChatGateway) -> Self {
        Self {
            workspace: Arc::new(Mutex::new(workspace)),
            config,
            chat,
        }
    }
}
