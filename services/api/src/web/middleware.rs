//! services/api/src/web/middleware.rs
//!
//! Role gating for the teacher-only and student-only routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use notes_hub_core::UserRole;
use std::sync::Arc;
use tracing::warn;

use crate::web::state::AppState;

/// Lets the request through only while the session acts as a teacher.
pub async fn require_teacher(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    ensure_role(&state, UserRole::Teacher).await?;
    Ok(next.run(req).await)
}

/// Lets the request through only while the session acts as a student.
pub async fn require_student(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    ensure_role(&state, UserRole::Student).await?;
    Ok(next.run(req).await)
}

async fn ensure_role(state: &AppState, required: UserRole) -> Result<(), (StatusCode, String)> {
    let current = state.workspace.lock().await.role();
    if current == required {
        return Ok(());
    }
    warn!(
        "Rejected {} action while acting as {}",
        required.as_str(),
        current.as_str()
    );
    Err((
        StatusCode::FORBIDDEN,
        format!(
            "This action is only available in the {} view.",
            required.as_str()
        ),
    ))
}
