//! Record Store seam used by the report service.
//!
//! The renderer only needs key lookups and a bulk scan; `SqliteRecordStore`
//! serves both from one shared connection and also exposes it for the CRUD
//! handlers.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use uuid::Uuid;

use super::repository;
use super::sqlite::{open_database, open_memory_database};
use super::DatabaseError;
use crate::models::{ResidentFilter, ResidentSnapshot, MAX_LIST_LIMIT};

/// Read access to residents for report generation.
pub trait RecordStore: Send + Sync {
    /// Look up one resident. With `populate_documents`, document references
    /// are resolved to full records; otherwise `documents` is empty.
    fn find_resident(
        &self,
        id: &Uuid,
        populate_documents: bool,
    ) -> Result<Option<ResidentSnapshot>, DatabaseError>;

    /// Every resident, populated, newest first.
    fn all_residents(&self) -> Result<Vec<ResidentSnapshot>, DatabaseError>;
}

/// SQLite-backed record store. Writes are serialized by the connection mutex.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(open_database(path)?))
    }

    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::from_connection(open_memory_database()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Lock the shared connection for direct repository calls.
    pub fn conn(&self) -> Result<MutexGuard<'_, Connection>, DatabaseError> {
        self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)
    }
}

impl RecordStore for SqliteRecordStore {
    fn find_resident(
        &self,
        id: &Uuid,
        populate_documents: bool,
    ) -> Result<Option<ResidentSnapshot>, DatabaseError> {
        let conn = self.conn()?;
        if populate_documents {
            repository::get_resident_snapshot(&conn, id)
        } else {
            Ok(repository::get_resident(&conn, id)?.map(|resident| ResidentSnapshot {
                resident,
                documents: Vec::new(),
            }))
        }
    }

    fn all_residents(&self) -> Result<Vec<ResidentSnapshot>, DatabaseError> {
        let conn = self.conn()?;
        let mut snapshots = Vec::new();
        let mut offset = 0;
        loop {
            let filter = ResidentFilter {
                search: None,
                limit: Some(MAX_LIST_LIMIT),
                offset: Some(offset),
            };
            let page = repository::list_residents(&conn, &filter)?;
            let fetched = page.len() as u32;
            for resident in page {
                if let Some(snapshot) = repository::get_resident_snapshot(&conn, &resident.id)? {
                    snapshots.push(snapshot);
                }
            }
            if fetched < MAX_LIST_LIMIT {
                break;
            }
            offset += MAX_LIST_LIMIT;
        }
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Resident;

    #[test]
    fn find_resident_without_population_has_no_documents() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        let resident = Resident {
            id: Uuid::new_v4(),
            name: Some("Asha".into()),
            ..Default::default()
        };
        repository::insert_resident(&store.conn().unwrap(), &resident).unwrap();

        let snapshot = store.find_resident(&resident.id, false).unwrap().unwrap();
        assert_eq!(snapshot.resident.name.as_deref(), Some("Asha"));
        assert!(snapshot.documents.is_empty());
        assert!(store.find_resident(&Uuid::new_v4(), true).unwrap().is_none());
    }

    #[test]
    fn all_residents_returns_every_record() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        for i in 0..3 {
            let resident = Resident {
                id: Uuid::new_v4(),
                name: Some(format!("Resident {i}")),
                ..Default::default()
            };
            repository::insert_resident(&store.conn().unwrap(), &resident).unwrap();
        }
        assert_eq!(store.all_residents().unwrap().len(), 3);
    }
}
