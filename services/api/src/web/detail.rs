//! services/api/src/web/detail.rs
//!
//! Handlers for the note detail view. The view is rendered from the store's
//! current record every time, never from a copy.

use crate::web::{rest::NoteResponse, save_task::save_indicator_process, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use notes_hub_core::Workspace;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailResponse {
    /// `None` while no note is open.
    pub note: Option<NoteResponse>,
    /// `idle`, `saving` or `saved`.
    pub save_status: String,
}

impl DetailResponse {
    fn render(workspace: &Workspace) -> Self {
        Self {
            note: workspace.open_note_view().map(NoteResponse::from),
            save_status: workspace.save_status().as_str().to_string(),
        }
    }
}

/// Returns the open note and the save indicator.
#[utoipa::path(
    get,
    path = "/detail",
    responses((status = 200, description = "Detail view", body = DetailResponse))
)]
pub async fn get_detail_handler(State(app_state): State<Arc<AppState>>) -> Json<DetailResponse> {
    let workspace = app_state.workspace.lock().await;
    Json(DetailResponse::render(&workspace))
}

/// Opens a note in the detail view.
#[utoipa::path(
    post,
    path = "/detail/{id}",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 200, description = "Note opened", body = DetailResponse),
        (status = 404, description = "No such note")
    )
)]
pub async fn open_detail_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DetailResponse>, (StatusCode, String)> {
    let mut workspace = app_state.workspace.lock().await;
    if !workspace.open_note(id) {
        return Err((StatusCode::NOT_FOUND, "Note not found".to_string()));
    }
    info!("Opened note {} in the detail view.", id);
    Ok(Json(DetailResponse::render(&workspace)))
}

/// Closes the detail view.
#[utoipa::path(
    delete,
    path = "/detail",
    responses((status = 204, description = "Detail view closed"))
)]
pub async fn close_detail_handler(State(app_state): State<Arc<AppState>>) -> StatusCode {
    app_state.workspace.lock().await.close_note();
    StatusCode::NO_CONTENT
}

/// Saves the personal annotation of the open note.
///
/// The annotation is written immediately; the returned indicator reads
/// `saving` and moves to `saved`, then `idle`, on fixed timers.
#[utoipa::path(
    put,
    path = "/student/detail/annotation",
    request_body = crate::web::rest::AnnotationRequest,
    responses(
        (status = 202, description = "Save started", body = DetailResponse),
        (status = 403, description = "Not in the student view"),
        (status = 409, description = "No note is open, or a save is still in progress")
    )
)]
pub async fn save_detail_annotation_handler(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<crate::web::rest::AnnotationRequest>,
) -> Result<(StatusCode, Json<DetailResponse>), (StatusCode, String)> {
    let mut workspace = app_state.workspace.lock().await;
    let ticket = workspace.begin_annotation_save(body.text).map_err(|e| {
        warn!("Annotation save rejected: {}", e);
        (StatusCode::CONFLICT, e.to_string())
    })?;

    tokio::spawn(save_indicator_process(app_state.workspace.clone(), ticket));

    Ok((StatusCode::ACCEPTED, Json(DetailResponse::render(&workspace))))
}
