//! crates/notes_hub_core/src/ingestion.rs
//!
//! Turns a selected file into the `content`/`file_type` pair of a new note.

use crate::domain::FileType;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Files above this many bytes are rejected.
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

pub const TEXT_MIME: &str = "text/plain";
pub const PDF_MIME: &str = "application/pdf";

/// A file as handed over by the upload form.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    /// The declared MIME type; parameters such as `charset` are allowed.
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// The result of a successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedFile {
    pub file_name: String,
    /// The file name without its last extension, used to prefill the title.
    pub suggested_title: String,
    pub content: String,
    pub file_type: FileType,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("File size exceeds 5MB limit.")]
    TooLarge { size: usize },
    #[error("Unsupported file type. Please upload a .txt or .pdf file.")]
    UnsupportedType(String),
}

/// Validates and decodes `file`.
///
/// Plain text is decoded as UTF-8, replacing invalid sequences. PDFs are
/// embedded as a base64 data URL so they can be displayed without a file
/// store.
pub fn ingest(file: &SelectedFile) -> Result<IngestedFile, IngestError> {
    if file.bytes.len() > MAX_FILE_SIZE {
        return Err(IngestError::TooLarge {
            size: file.bytes.len(),
        });
    }

    let (file_type, content) = match resolve_file_type(&file.mime_type, &file.name) {
        Some(FileType::Text) => (
            FileType::Text,
            String::from_utf8_lossy(&file.bytes).into_owned(),
        ),
        Some(FileType::Pdf) => (
            FileType::Pdf,
            format!("data:{};base64,{}", PDF_MIME, STANDARD.encode(&file.bytes)),
        ),
        None => return Err(IngestError::UnsupportedType(file.mime_type.clone())),
    };

    Ok(IngestedFile {
        file_name: file.name.clone(),
        suggested_title: title_from_file_name(&file.name),
        content,
        file_type,
    })
}

/// Strips the last extension: `notes.v2.txt` becomes `notes.v2`.
pub fn title_from_file_name(name: &str) -> String {
    if let Some(pos) = name.rfind('.') {
        let extension = &name[pos + 1..];
        if !extension.is_empty() && !extension.contains('/') {
            return name[..pos].to_string();
        }
    }
    name.to_string()
}

fn resolve_file_type(mime_type: &str, name: &str) -> Option<FileType> {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        TEXT_MIME => Some(FileType::Text),
        PDF_MIME => Some(FileType::Pdf),
        // Some clients send no usable type; fall back to the extension.
        "" | "application/octet-stream" => {
            let lower = name.to_ascii_lowercase();
            if lower.ends_with(".txt") {
                Some(FileType::Text)
            } else if lower.ends_with(".pdf") {
                Some(FileType::Pdf)
            } else {
                None
            }
        }
        _ => None,
    }
}
