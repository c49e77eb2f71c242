use thiserror::Error;

use crate::db::DatabaseError;
use crate::models::enums::{valid_values, ReportFormat, ReportTemplate};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Invalid resident identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Resident not found: {0}")]
    ResidentNotFound(String),

    #[error("Unsupported format '{0}'. Valid formats: {valid}", valid = valid_values(ReportFormat::ALL, ReportFormat::as_str))]
    UnsupportedFormat(String),

    #[error("Unsupported template '{0}'. Valid templates: {valid}", valid = valid_values(ReportTemplate::ALL, ReportTemplate::as_str))]
    UnsupportedTemplate(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("Spreadsheet generation failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_format_lists_valid_values() {
        let msg = ReportError::UnsupportedFormat("docx".into()).to_string();
        assert!(msg.contains("'docx'"));
        assert!(msg.contains("pdf, excel"));
    }

    #[test]
    fn unsupported_template_lists_valid_values() {
        let msg = ReportError::UnsupportedTemplate("fancy".into()).to_string();
        assert!(msg.contains("detailed, summary, medical, print"));
    }
}
