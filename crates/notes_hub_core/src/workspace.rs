//! crates/notes_hub_core/src/workspace.rs
//!
//! The single session: owns the note store, the selected role, the open
//! detail view and its save indicator.

use crate::detail::{DetailView, SaveError, SaveIndicator, SaveStatus, SaveTicket};
use crate::domain::{Note, UserRole};
use crate::seed::sample_notes;
use crate::store::NoteStore;
use uuid::Uuid;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorkspaceError {
    #[error("No note is open.")]
    NoOpenNote,
    #[error(transparent)]
    Save(#[from] SaveError),
}

#[derive(Debug, Clone, Default)]
pub struct Workspace {
    store: NoteStore,
    role: UserRole,
    detail: DetailView,
    save: SaveIndicator,
}

impl Workspace {
    pub fn new(store: NoteStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    /// A workspace preloaded with the sample course notes.
    pub fn seeded() -> Self {
        Self::new(NoteStore::with_notes(sample_notes()))
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut NoteStore {
        &mut self.store
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn switch_role(&mut self, role: UserRole) {
        self.role = role;
    }

    /// Deletes a note; closes the detail view when it showed that note.
    pub fn delete_note(&mut self, id: Uuid) -> bool {
        if self.detail.is_open(id) {
            self.close_note();
        }
        self.store.delete(id)
    }

    /// Opens `id` in the detail view. Returns false if no such note exists.
    pub fn open_note(&mut self, id: Uuid) -> bool {
        if self.store.get(id).is_none() {
            return false;
        }
        if !self.detail.is_open(id) {
            self.save.reset();
        }
        self.detail.open(id);
        true
    }

    pub fn close_note(&mut self) {
        self.detail.close();
        self.save.reset();
    }

    /// The open note as currently stored.
    pub fn open_note_view(&self) -> Option<&Note> {
        self.detail.note(&self.store)
    }

    pub fn save_status(&self) -> SaveStatus {
        self.save.status()
    }

    /// Writes the annotation of the open note and starts the indicator.
    pub fn begin_annotation_save(
        &mut self,
        text: impl Into<String>,
    ) -> Result<SaveTicket, WorkspaceError> {
        let id = self
            .open_note_view()
            .map(|note| note.id)
            .ok_or(WorkspaceError::NoOpenNote)?;
        let ticket = self.save.begin()?;
        self.store.set_annotation(id, text);
        Ok(ticket)
    }

    pub fn finish_annotation_save(&mut self, ticket: SaveTicket) -> bool {
        self.save.mark_saved(ticket)
    }

    pub fn clear_save_status(&mut self, ticket: SaveTicket) -> bool {
        self.save.settle(ticket)
    }
}
