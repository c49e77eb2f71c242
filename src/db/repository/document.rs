use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::DocumentType;
use crate::models::Document;

const DOCUMENT_COLUMNS: &str =
    "id, resident_id, name, type, file_path, mime_type, size, uploaded_at";

pub fn insert_document(conn: &Connection, doc: &Document) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO documents (id, resident_id, name, type, file_path, mime_type, size, uploaded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            doc.id.to_string(),
            doc.resident_id.to_string(),
            doc.name,
            doc.doc_type.as_str(),
            doc.file_path,
            doc.mime_type,
            doc.size.map(|s| s as i64),
            doc.uploaded_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_document(conn: &Connection, id: &Uuid) -> Result<Option<Document>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"),
            params![id.to_string()],
            DocumentRow::from_row,
        )
        .optional()?;

    row.map(document_from_row).transpose()
}

pub fn get_documents_for_resident(
    conn: &Connection,
    resident_id: &Uuid,
) -> Result<Vec<Document>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE resident_id = ?1 ORDER BY uploaded_at"
    ))?;
    let rows = stmt.query_map(params![resident_id.to_string()], DocumentRow::from_row)?;

    let mut docs = Vec::new();
    for row in rows {
        docs.push(document_from_row(row?)?);
    }
    Ok(docs)
}

/// Remove every document registered against a resident. Returns the count.
pub fn delete_documents_for_resident(
    conn: &Connection,
    resident_id: &Uuid,
) -> Result<usize, DatabaseError> {
    let removed = conn.execute(
        "DELETE FROM documents WHERE resident_id = ?1",
        params![resident_id.to_string()],
    )?;
    Ok(removed)
}

struct DocumentRow {
    id: String,
    resident_id: String,
    name: String,
    doc_type: String,
    file_path: String,
    mime_type: Option<String>,
    size: Option<i64>,
    uploaded_at: String,
}

impl DocumentRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            resident_id: row.get(1)?,
            name: row.get(2)?,
            doc_type: row.get(3)?,
            file_path: row.get(4)?,
            mime_type: row.get(5)?,
            size: row.get(6)?,
            uploaded_at: row.get(7)?,
        })
    }
}

fn document_from_row(row: DocumentRow) -> Result<Document, DatabaseError> {
    Ok(Document {
        id: parse_uuid(&row.id)?,
        resident_id: parse_uuid(&row.resident_id)?,
        name: row.name,
        doc_type: DocumentType::from_str(&row.doc_type)?,
        file_path: row.file_path,
        mime_type: row.mime_type,
        size: row.size.and_then(|s| u64::try_from(s).ok()),
        uploaded_at: DateTime::parse_from_rfc3339(&row.uploaded_at)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| DatabaseError::CorruptRecord(format!("uploaded_at: {e}")))?,
    })
}

fn parse_uuid(raw: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(raw).map_err(|e| DatabaseError::CorruptRecord(format!("id {raw}: {e}")))
}
