//! crates/notes_hub_core/src/detail.rs
//!
//! The note detail view and its annotation save indicator.

use crate::domain::Note;
use crate::store::NoteStore;
use std::time::Duration;
use uuid::Uuid;

/// How long the indicator shows `Saving` before switching to `Saved`.
pub const SAVING_DURATION: Duration = Duration::from_millis(500);
/// How long `Saved` stays up before going back to `Idle`.
pub const SAVED_DURATION: Duration = Duration::from_millis(2000);

/// The open note, held by id only. Rendering always borrows the store's
/// current record, so a saved annotation is visible immediately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetailView {
    open: Option<Uuid>,
}

impl DetailView {
    pub fn open(&mut self, id: Uuid) {
        self.open = Some(id);
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn open_id(&self) -> Option<Uuid> {
        self.open
    }

    pub fn is_open(&self, id: Uuid) -> bool {
        self.open == Some(id)
    }

    pub fn note<'a>(&self, store: &'a NoteStore) -> Option<&'a Note> {
        self.open.and_then(|id| store.get(id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
}

impl SaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveStatus::Idle => "idle",
            SaveStatus::Saving => "saving",
            SaveStatus::Saved => "saved",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SaveError {
    #[error("A save is already in progress.")]
    InProgress,
}

/// Identifies one save so that a late timer from an earlier save cannot
/// move the indicator of a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTicket(u64);

/// `Idle -> Saving -> Saved -> Idle`, advanced by the caller's timers.
#[derive(Debug, Clone, Default)]
pub struct SaveIndicator {
    status: SaveStatus,
    generation: u64,
}

impl SaveIndicator {
    pub fn status(&self) -> SaveStatus {
        self.status
    }

    /// Starts a save. Rejected while another save is still `Saving`.
    pub fn begin(&mut self) -> Result<SaveTicket, SaveError> {
        if self.status == SaveStatus::Saving {
            return Err(SaveError::InProgress);
        }
        self.generation += 1;
        self.status = SaveStatus::Saving;
        Ok(SaveTicket(self.generation))
    }

    /// `Saving -> Saved` for the current save. Returns whether it applied.
    pub fn mark_saved(&mut self, ticket: SaveTicket) -> bool {
        if ticket.0 == self.generation && self.status == SaveStatus::Saving {
            self.status = SaveStatus::Saved;
            true
        } else {
            false
        }
    }

    /// `Saved -> Idle` for the current save. Returns whether it applied.
    pub fn settle(&mut self, ticket: SaveTicket) -> bool {
        if ticket.0 == self.generation && self.status == SaveStatus::Saved {
            self.status = SaveStatus::Idle;
            true
        } else {
            false
        }
    }

    /// Drops any save in flight; its ticket no longer applies.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.status = SaveStatus::Idle;
    }
}
