use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::*;

use super::document::{delete_documents_for_resident, get_document, insert_document};

pub fn insert_resident(conn: &Connection, resident: &Resident) -> Result<(), DatabaseError> {
    let body = serde_json::to_string(resident)?;
    let created_at = resident.created_at.unwrap_or_else(Utc::now);
    let updated_at = resident.updated_at.unwrap_or(created_at);
    conn.execute(
        "INSERT INTO residents (id, name, registration_no, body, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            resident.id.to_string(),
            resident.name,
            resident.registration_no,
            body,
            created_at.to_rfc3339(),
            updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Overwrite the stored body of an existing resident.
pub fn update_resident(conn: &Connection, resident: &Resident) -> Result<(), DatabaseError> {
    let body = serde_json::to_string(resident)?;
    let updated_at = resident.updated_at.unwrap_or_else(Utc::now);
    let changed = conn.execute(
        "UPDATE residents SET name = ?2, registration_no = ?3, body = ?4, updated_at = ?5
         WHERE id = ?1",
        params![
            resident.id.to_string(),
            resident.name,
            resident.registration_no,
            body,
            updated_at.to_rfc3339(),
        ],
    )?;
    if changed == 0 {
        return Err(not_found(&resident.id));
    }
    Ok(())
}

pub fn get_resident(conn: &Connection, id: &Uuid) -> Result<Option<Resident>, DatabaseError> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM residents WHERE id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )
        .optional()?;

    body.map(|b| serde_json::from_str::<Resident>(&b).map_err(DatabaseError::from))
        .transpose()
}

/// Resident with `document_ids` resolved, in reference order.
///
/// References that no longer resolve are skipped.
pub fn get_resident_snapshot(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<ResidentSnapshot>, DatabaseError> {
    let Some(resident) = get_resident(conn, id)? else {
        return Ok(None);
    };

    let mut documents = Vec::with_capacity(resident.document_ids.len());
    for doc_id in &resident.document_ids {
        match get_document(conn, doc_id)? {
            Some(doc) => documents.push(doc),
            None => tracing::warn!(
                resident_id = %id,
                document_id = %doc_id,
                "Dangling document reference skipped"
            ),
        }
    }

    Ok(Some(ResidentSnapshot { resident, documents }))
}

pub fn list_residents(
    conn: &Connection,
    filter: &ResidentFilter,
) -> Result<Vec<Resident>, DatabaseError> {
    let pattern = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s.to_lowercase()));

    let mut stmt = conn.prepare(
        "SELECT body FROM residents
         WHERE ?1 IS NULL
            OR LOWER(COALESCE(name, '')) LIKE ?1
            OR LOWER(COALESCE(registration_no, '')) LIKE ?1
         ORDER BY created_at DESC, id
         LIMIT ?2 OFFSET ?3",
    )?;

    let rows = stmt.query_map(
        params![
            pattern,
            filter.effective_limit(),
            filter.offset.unwrap_or(0)
        ],
        |row| row.get::<_, String>(0),
    )?;

    let mut residents = Vec::new();
    for body in rows {
        residents.push(serde_json::from_str::<Resident>(&body?)?);
    }
    Ok(residents)
}

pub fn count_residents(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM residents", [], |row| row.get(0))?;
    Ok(count)
}

/// Delete a resident and every document registered against it.
///
/// Returns the number of documents removed.
pub fn delete_resident(conn: &Connection, id: &Uuid) -> Result<usize, DatabaseError> {
    let tx = conn.unchecked_transaction()?;

    let removed_docs = delete_documents_for_resident(&tx, id)?;
    let removed = tx.execute("DELETE FROM residents WHERE id = ?1", params![id.to_string()])?;
    if removed == 0 {
        // Dropping `tx` rolls back the document deletion
        return Err(not_found(id));
    }

    tx.commit()?;
    Ok(removed_docs)
}

/// Append a care event to the resident's embedded history.
pub fn append_care_event(
    conn: &Connection,
    resident_id: &Uuid,
    event: CareEvent,
) -> Result<CareEvent, DatabaseError> {
    let tx = conn.unchecked_transaction()?;

    let mut resident = get_resident(&tx, resident_id)?.ok_or_else(|| not_found(resident_id))?;
    resident.care_events.push(event.clone());
    resident.updated_at = Some(Utc::now());
    update_resident(&tx, &resident)?;

    tx.commit()?;
    Ok(event)
}

/// Store document metadata and append its id to the resident's references.
pub fn attach_document(conn: &Connection, document: &Document) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;

    let mut resident =
        get_resident(&tx, &document.resident_id)?.ok_or_else(|| not_found(&document.resident_id))?;
    insert_document(&tx, document)?;
    resident.document_ids.push(document.id);
    resident.updated_at = Some(Utc::now());
    update_resident(&tx, &resident)?;

    tx.commit()?;
    Ok(())
}

fn not_found(id: &Uuid) -> DatabaseError {
    DatabaseError::NotFound {
        entity_type: "Resident".into(),
        id: id.to_string(),
    }
}
