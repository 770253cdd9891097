//! crates/notes_hub_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any transport or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The two roles a session can act as. Switching never touches the notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserRole {
    Teacher,
    #[default]
    Student,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Teacher => "Teacher",
            UserRole::Student => "Student",
        }
    }
}

/// How a note's `content` has to be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileType {
    /// `content` is the literal text body.
    #[default]
    Text,
    /// `content` is a `data:application/pdf;base64,...` URL.
    Pdf,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Text => "text",
            FileType::Pdf => "pdf",
        }
    }
}

/// A piece of shared course material.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub content: String,
    pub file_type: FileType,
    /// Display only.
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub is_bookmarked: bool,
    /// The personal annotation, empty when none was written.
    pub student_note: String,
}

impl Note {
    pub fn has_annotation(&self) -> bool {
        !self.student_note.is_empty()
    }

    /// The upload date as shown on note cards, e.g. "October 26, 2023".
    pub fn display_date(&self) -> String {
        self.uploaded_at.format("%B %-d, %Y").to_string()
    }
}

/// A note as produced by the authoring flow, before the store assigns
/// identity, timestamp and the student-owned fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub subject: String,
    pub content: String,
    pub file_type: FileType,
    pub file_name: String,
}

/// Who wrote a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// One turn of a transient chat transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}
