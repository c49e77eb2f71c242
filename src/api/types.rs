//! Shared types for the API layer.

use std::sync::Arc;

use uuid::Uuid;

use crate::api::error::ApiError;
use crate::db::SqliteRecordStore;
use crate::report::ReportService;

/// Shared context for all API routes.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<SqliteRecordStore>,
    pub reports: Arc<ReportService>,
}

impl ApiContext {
    pub fn new(store: Arc<SqliteRecordStore>, reports: Arc<ReportService>) -> Self {
        Self { store, reports }
    }
}

/// Parse a path identifier; malformed ids are a 400, not a 404.
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::InvalidId(raw.to_string()))
}
