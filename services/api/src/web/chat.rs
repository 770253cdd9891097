//! services/api/src/web/chat.rs
//!
//! The stateless one-shot chat endpoint. The WebSocket panel in
//! `ws_handler` adds a transcript and the single-flight rule on top.

use crate::web::state::AppState;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct ChatRequest {
    pub prompt: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ChatReplyResponse {
    /// Always `model`.
    pub role: String,
    pub text: String,
}

/// Sends one prompt to the assistant.
///
/// Always answers 200: a missing credential or a remote failure is reported
/// in `text`.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses((status = 200, description = "The model's reply", body = ChatReplyResponse))
)]
pub async fn chat_handler(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> Json<ChatReplyResponse> {
    info!("Chat prompt received ({} chars).", body.prompt.chars().count());
    let text = app_state.chat.send(&body.prompt).await;
    Json(ChatReplyResponse {
        role: "model".to_string(),
        text,
    })
}
