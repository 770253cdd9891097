//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the role selector and the note views, the
//! payload structs they exchange, and the master definition for the OpenAPI
//! specification.

use crate::web::{chat, detail, state::AppState, UPLOAD_BODY_LIMIT};
use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use notes_hub_core::{
    student_view, teacher_view, AuthoringForm, BrowseView, IngestError, Note, NoteFilter,
    SelectedFile, UserRole,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        get_role_handler,
        set_role_handler,
        student_notes_handler,
        teacher_notes_handler,
        upload_note_handler,
        delete_note_handler,
        toggle_bookmark_handler,
        set_annotation_handler,
        get_note_handler,
        detail::get_detail_handler,
        detail::open_detail_handler,
        detail::close_detail_handler,
        detail::save_detail_annotation_handler,
        chat::chat_handler,
    ),
    components(
        schemas(
            RoleDto, RoleBody, FilterParam, NoteSummary, NoteResponse, SubjectGroupResponse,
            EmptyStateResponse, BrowseResponse, AnnotationRequest, BookmarkResponse,
            detail::DetailResponse, chat::ChatRequest, chat::ChatReplyResponse
        )
    ),
    tags(
        (name = "College Notes Hub API", description = "Note sharing between teachers and students, plus a chat assistant.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleDto {
    Teacher,
    Student,
}

impl From<UserRole> for RoleDto {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Teacher => RoleDto::Teacher,
            UserRole::Student => RoleDto::Student,
        }
    }
}

impl From<RoleDto> for UserRole {
    fn from(role: RoleDto) -> Self {
        match role {
            RoleDto::Teacher => UserRole::Teacher,
            RoleDto::Student => UserRole::Student,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct RoleBody {
    pub role: RoleDto,
}

#[derive(Deserialize, ToSchema, Debug, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterParam {
    #[default]
    All,
    Bookmarked,
}

impl From<FilterParam> for NoteFilter {
    fn from(filter: FilterParam) -> Self {
        match filter {
            FilterParam::All => NoteFilter::All,
            FilterParam::Bookmarked => NoteFilter::Bookmarked,
        }
    }
}

/// Query parameters of the student's browse view.
#[derive(Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct BrowseQuery {
    /// `all` (default) or `bookmarked`.
    pub filter: Option<FilterParam>,
    /// Case-insensitive substring matched against title and subject.
    pub q: Option<String>,
}

/// A note card: everything except the content and the annotation text.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteSummary {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub file_type: String,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    /// e.g. "October 26, 2023".
    pub uploaded_on: String,
    pub is_bookmarked: bool,
    pub has_annotation: bool,
}

impl From<&Note> for NoteSummary {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            subject: note.subject.clone(),
            file_type: note.file_type.as_str().to_string(),
            file_name: note.file_name.clone(),
            uploaded_at: note.uploaded_at,
            uploaded_on: note.display_date(),
            is_bookmarked: note.is_bookmarked,
            has_annotation: note.has_annotation(),
        }
    }
}

/// The full note, as shown in the detail view.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    /// Text body, or a `data:application/pdf;base64,...` URL for PDFs.
    pub content: String,
    pub file_type: String,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_on: String,
    pub is_bookmarked: bool,
    pub student_note: String,
}

impl From<&Note> for NoteResponse {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            subject: note.subject.clone(),
            content: note.content.clone(),
            file_type: note.file_type.as_str().to_string(),
            file_name: note.file_name.clone(),
            uploaded_at: note.uploaded_at,
            uploaded_on: note.display_date(),
            is_bookmarked: note.is_bookmarked,
            student_note: note.student_note.clone(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SubjectGroupResponse {
    pub subject: String,
    pub notes: Vec<NoteSummary>,
}

#[derive(Serialize, ToSchema)]
pub struct EmptyStateResponse {
    pub headline: String,
    pub hint: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct BrowseResponse {
    pub total: usize,
    pub groups: Vec<SubjectGroupResponse>,
    /// Present only when nothing is listed.
    pub empty: Option<EmptyStateResponse>,
}

impl From<BrowseView<'_>> for BrowseResponse {
    fn from(view: BrowseView<'_>) -> Self {
        Self {
            total: view.total,
            groups: view
                .groups
                .into_iter()
                .map(|group| SubjectGroupResponse {
                    subject: group.subject.to_string(),
                    notes: group.notes.into_iter().map(NoteSummary::from).collect(),
                })
                .collect(),
            empty: view.empty.map(|empty| EmptyStateResponse {
                headline: empty.headline.to_string(),
                hint: empty.hint.map(str::to_string),
            }),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct AnnotationRequest {
    pub text: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkResponse {
    pub id: Uuid,
    pub is_bookmarked: bool,
}

//=========================================================================================
// Role Selector
//=========================================================================================

/// Returns the role the session currently acts as.
#[utoipa::path(
    get,
    path = "/role",
    responses((status = 200, description = "Current role", body = RoleBody))
)]
pub async fn get_role_handler(State(app_state): State<Arc<AppState>>) -> Json<RoleBody> {
    let role = app_state.workspace.lock().await.role();
    Json(RoleBody { role: role.into() })
}

/// Switches between the teacher and student views. Notes are kept.
#[utoipa::path(
    put,
    path = "/role",
    request_body = RoleBody,
    responses((status = 200, description = "Role switched", body = RoleBody))
)]
pub async fn set_role_handler(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<RoleBody>,
) -> Json<RoleBody> {
    let role = UserRole::from(body.role);
    app_state.workspace.lock().await.switch_role(role);
    info!("Switched to the {} view.", role.as_str());
    Json(RoleBody { role: role.into() })
}

//=========================================================================================
// Student Handlers
//=========================================================================================

/// Lists notes for the student, filtered, searched and grouped by subject.
#[utoipa::path(
    get,
    path = "/student/notes",
    params(BrowseQuery),
    responses(
        (status = 200, description = "Grouped notes", body = BrowseResponse),
        (status = 403, description = "Not in the student view")
    )
)]
pub async fn student_notes_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<BrowseQuery>,
) -> Json<BrowseResponse> {
    let filter = NoteFilter::from(query.filter.unwrap_or_default());
    let search = query.q.unwrap_or_default();
    let workspace = app_state.workspace.lock().await;
    Json(student_view(workspace.store(), filter, &search).into())
}

/// Flips the bookmark of a note. Unknown ids are ignored.
#[utoipa::path(
    post,
    path = "/student/notes/{id}/bookmark",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 200, description = "Bookmark toggled", body = BookmarkResponse),
        (status = 204, description = "No such note; nothing changed"),
        (status = 403, description = "Not in the student view")
    )
)]
pub async fn toggle_bookmark_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Response {
    let toggled = app_state.workspace.lock().await.store_mut().toggle_bookmark(id);
    match toggled {
        Some(is_bookmarked) => {
            info!("Note {} bookmarked: {}", id, is_bookmarked);
            Json(BookmarkResponse { id, is_bookmarked }).into_response()
        }
        None => {
            info!("Bookmark toggle for unknown note {} ignored.", id);
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

/// Overwrites the personal annotation of a note. Unknown ids are ignored.
#[utoipa::path(
    put,
    path = "/student/notes/{id}/annotation",
    params(("id" = Uuid, Path, description = "Note id")),
    request_body = AnnotationRequest,
    responses(
        (status = 204, description = "Annotation stored (or note absent)"),
        (status = 403, description = "Not in the student view")
    )
)]
pub async fn set_annotation_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<AnnotationRequest>,
) -> StatusCode {
    if !app_state
        .workspace
        .lock()
        .await
        .store_mut()
        .set_annotation(id, body.text)
    {
        info!("Annotation for unknown note {} ignored.", id);
    }
    StatusCode::NO_CONTENT
}

//=========================================================================================
// Teacher Handlers
//=========================================================================================

/// Lists every note, grouped by subject.
#[utoipa::path(
    get,
    path = "/teacher/notes",
    responses(
        (status = 200, description = "Grouped notes", body = BrowseResponse),
        (status = 403, description = "Not in the teacher view")
    )
)]
pub async fn teacher_notes_handler(State(app_state): State<Arc<AppState>>) -> Json<BrowseResponse> {
    let workspace = app_state.workspace.lock().await;
    Json(teacher_view(workspace.store()).into())
}

/// Uploads a new note.
///
/// Accepts a multipart/form-data request with the text fields `title`,
/// `subject`, `content` and an optional `file` part (.txt or .pdf, at most
/// 5 MiB). An attached file replaces typed content and prefills the title,
/// which an explicit `title` field overrides.
#[utoipa::path(
    post,
    path = "/teacher/notes",
    request_body(content_type = "multipart/form-data", description = "The note to upload."),
    responses(
        (status = 201, description = "Note created", body = NoteResponse),
        (status = 400, description = "Missing title, subject or content"),
        (status = 403, description = "Not in the teacher view"),
        (status = 413, description = "File larger than 5 MiB"),
        (status = 415, description = "File is neither plain text nor PDF")
    )
)]
pub async fn upload_note_handler(
    State(app_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let mut title = None;
    let mut subject = None;
    let mut content = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_rejection(e, "multipart data"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime_type = field.content_type().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_rejection(e, "file bytes"))?;
                // Browsers send an empty part when no file was picked.
                if !(file_name.is_empty() && data.is_empty()) {
                    file = Some(SelectedFile {
                        name: file_name,
                        mime_type,
                        bytes: data.to_vec(),
                    });
                }
            }
            "title" | "subject" | "content" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_rejection(e, &format!("field '{}'", name)))?;
                match name.as_str() {
                    "title" => title = Some(value),
                    "subject" => subject = Some(value),
                    _ => content = Some(value),
                }
            }
            other => warn!("Ignoring unknown form field '{}'.", other),
        }
    }

    let mut form = AuthoringForm::new();
    if let Some(content) = content {
        form.type_content(content);
    }
    if let Some(file) = &file {
        form.attach_file(file).map_err(|e| {
            warn!("Rejected file '{}': {}", file.name, e);
            ingest_rejection(e)
        })?;
    }
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        form.set_title(title);
    }
    if let Some(subject) = subject {
        form.set_subject(subject);
    }

    let mut workspace = app_state.workspace.lock().await;
    let id = form
        .submit(workspace.store_mut())
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let note = workspace.store().get(id).map(NoteResponse::from).ok_or_else(|| {
        error!("Note {} vanished right after it was added.", id);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create note".to_string(),
        )
    })?;

    info!("Uploaded note {} ('{}' in {}).", note.id, note.title, note.subject);
    Ok((StatusCode::CREATED, Json(note)))
}

/// Deletes a note. Unknown ids are ignored.
#[utoipa::path(
    delete,
    path = "/teacher/notes/{id}",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 204, description = "Note deleted (or already absent)"),
        (status = 403, description = "Not in the teacher view")
    )
)]
pub async fn delete_note_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> StatusCode {
    if app_state.workspace.lock().await.delete_note(id) {
        info!("Deleted note {}.", id);
    } else {
        info!("Delete for unknown note {} ignored.", id);
    }
    StatusCode::NO_CONTENT
}

//=========================================================================================
// Shared Handlers
//=========================================================================================

/// Returns a single note.
#[utoipa::path(
    get,
    path = "/notes/{id}",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 200, description = "The note", body = NoteResponse),
        (status = 404, description = "No such note")
    )
)]
pub async fn get_note_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<NoteResponse>, (StatusCode, String)> {
    let workspace = app_state.workspace.lock().await;
    workspace
        .store()
        .get(id)
        .map(|note| Json(NoteResponse::from(note)))
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Note not found".to_string()))
}

/// A body cut off at the upload limit is an oversized file.
fn multipart_rejection(err: MultipartError, what: &str) -> (StatusCode, String) {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Upload exceeded the {} byte body limit.", UPLOAD_BODY_LIMIT);
        return ingest_rejection(IngestError::TooLarge {
            size: UPLOAD_BODY_LIMIT,
        });
    }
    (err.status(), format!("Failed to read {}: {}", what, err))
}

fn ingest_rejection(err: IngestError) -> (StatusCode, String) {
    let status = match err {
        IngestError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        IngestError::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
    };
    (status, err.to_string())
}
