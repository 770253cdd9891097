//! crates/notes_hub_core/src/authoring.rs
//!
//! The teacher's upload form: collects title, subject and content, either
//! typed or ingested from a file, and submits a draft to the store.

use crate::domain::{FileType, NoteDraft};
use crate::ingestion::{ingest, IngestError, SelectedFile};
use crate::store::NoteStore;
use uuid::Uuid;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all fields.")]
    MissingFields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthoringForm {
    pub title: String,
    pub subject: String,
    pub content: String,
    pub file_type: FileType,
    /// Empty until a file is attached.
    pub file_name: String,
}

impl AuthoringForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    /// Typed content always makes the note a text note and drops any
    /// attached file name.
    pub fn type_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.file_type = FileType::Text;
        self.file_name.clear();
    }

    /// Ingests `file` into the form. On rejection the form is left exactly
    /// as it was.
    pub fn attach_file(&mut self, file: &SelectedFile) -> Result<(), IngestError> {
        let ingested = ingest(file)?;
        self.title = ingested.suggested_title;
        self.content = ingested.content;
        self.file_type = ingested.file_type;
        self.file_name = ingested.file_name;
        Ok(())
    }

    /// Validates the form and, when complete, adds the note to `store` and
    /// resets the form. An invalid form leaves both untouched.
    pub fn submit(&mut self, store: &mut NoteStore) -> Result<Uuid, FormError> {
        let draft = self.to_draft()?;
        let id = store.add(draft).id;
        *self = Self::default();
        Ok(id)
    }

    fn to_draft(&self) -> Result<NoteDraft, FormError> {
        if [&self.title, &self.subject, &self.content]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(FormError::MissingFields);
        }

        let file_name = if self.file_name.is_empty() {
            fallback_file_name(&self.title)
        } else {
            self.file_name.clone()
        };

        Ok(NoteDraft {
            title: self.title.clone(),
            subject: self.subject.clone(),
            content: self.content.clone(),
            file_type: self.file_type,
            file_name,
        })
    }
}

/// `Intro to Limits` becomes `intro_to_limits.txt`.
fn fallback_file_name(title: &str) -> String {
    let joined = title.split_whitespace().collect::<Vec<_>>().join("_");
    format!("{}.txt", joined.to_lowercase())
}
