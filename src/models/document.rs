use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::DocumentType;

/// Metadata for an uploaded file held in the Blob Store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub resident_id: Uuid,
    pub name: String,
    pub doc_type: DocumentType,
    /// Blob Store URL.
    pub file_path: String,
    pub mime_type: Option<String>,
    pub size: Option<u64>,
    pub uploaded_at: DateTime<Utc>,
}

/// How a document can be presented inside a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Image,
    Pdf,
    Other,
}

impl Document {
    /// Declared MIME type, or one guessed from the file extension.
    pub fn effective_mime(&self) -> String {
        match self.mime_type.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_ascii_lowercase(),
            _ => {
                // Strip query strings from signed URLs before guessing
                let path = self.file_path.split(['?', '#']).next().unwrap_or_default();
                mime_guess::from_path(path)
                    .first_raw()
                    .unwrap_or("application/octet-stream")
                    .to_string()
            }
        }
    }

    pub fn kind(&self) -> DocumentKind {
        let mime = self.effective_mime();
        if mime.starts_with("image/") {
            DocumentKind::Image
        } else if mime == "application/pdf" {
            DocumentKind::Pdf
        } else {
            DocumentKind::Other
        }
    }

    /// Size formatted for display, e.g. "1.5 MB".
    pub fn display_size(&self) -> Option<String> {
        self.size.map(format_bytes)
    }
}

fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

/// Request body for registering document metadata against a resident.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
    pub name: String,
    pub doc_type: DocumentType,
    pub file_path: String,
    pub mime_type: Option<String>,
    pub size: Option<u64>,
}
