//! services/api/src/web/save_task.rs
//!
//! The background timer that walks the detail view's save indicator from
//! `saving` to `saved` and back to `idle`.

use notes_hub_core::{
    detail::{SAVED_DURATION, SAVING_DURATION},
    SaveTicket, Workspace,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Advances the indicator for `ticket`. A newer save, or closing the note,
/// invalidates the ticket and ends the task early.
pub async fn save_indicator_process(workspace: Arc<Mutex<Workspace>>, ticket: SaveTicket) {
    tokio::time::sleep(SAVING_DURATION).await;
    if !workspace.lock().await.finish_annotation_save(ticket) {
        debug!("Save indicator superseded before it reached 'saved'.");
        return;
    }
    info!("Annotation saved.");

    tokio::time::sleep(SAVED_DURATION).await;
    if !workspace.lock().await.clear_save_status(ticket) {
        debug!("Save indicator superseded before it returned to 'idle'.");
    }
}
