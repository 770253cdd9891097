//! crates/notes_hub_core/src/store.rs
//!
//! The in-memory note collection. All mutation goes through the methods
//! below; operations on an id that is no longer present are no-ops.

use crate::domain::{Note, NoteDraft};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Notes ordered newest first.
#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    notes: Vec<Note>,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from notes that already carry their identity, keeping
    /// the given order.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == id)
    }

    /// Stores `draft` as a new note stamped with the current time.
    pub fn add(&mut self, draft: NoteDraft) -> &Note {
        self.add_at(draft, Utc::now())
    }

    /// Stores `draft` as a new note uploaded at `uploaded_at` and places it
    /// first. The caller is trusted to have validated the draft.
    pub fn add_at(&mut self, draft: NoteDraft, uploaded_at: DateTime<Utc>) -> &Note {
        let id = self.fresh_id();
        let note = Note {
            id,
            title: draft.title,
            subject: draft.subject,
            content: draft.content,
            file_type: draft.file_type,
            file_name: draft.file_name,
            uploaded_at,
            is_bookmarked: false,
            student_note: String::new(),
        };
        self.notes.insert(0, note);
        &self.notes[0]
    }

    /// Removes the note with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        self.notes.len() != before
    }

    /// Flips the bookmark flag and returns its new value.
    pub fn toggle_bookmark(&mut self, id: Uuid) -> Option<bool> {
        let note = self.get_mut(id)?;
        note.is_bookmarked = !note.is_bookmarked;
        Some(note.is_bookmarked)
    }

    /// Overwrites the personal annotation. Returns whether the note exists.
    pub fn set_annotation(&mut self, id: Uuid, text: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(note) => {
                note.student_note = text.into();
                true
            }
            None => false,
        }
    }

    fn fresh_id(&self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if self.get(id).is_none() {
                return id;
            }
        }
    }
}
