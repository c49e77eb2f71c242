//! Resident CRUD endpoints.
//!
//! - `GET /api/residents`: list with search and paging
//! - `POST /api/residents`: create
//! - `GET /api/residents/:id`: populated snapshot
//! - `PUT /api/residents/:id`: replace scalar fields
//! - `DELETE /api/residents/:id`: delete with document cascade

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::db::repository;
use crate::models::{Resident, ResidentFilter, ResidentSnapshot};

#[derive(Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Serialize)]
pub struct ListResponse {
    pub residents: Vec<Resident>,
    pub total: i64,
    pub limit: u32,
    pub offset: u32,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub documents_removed: usize,
}

/// `GET /api/residents`: newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListResponse>, ApiError> {
    let Query(query) = query?;
    let filter = ResidentFilter {
        search: query.search,
        limit: query.limit,
        offset: query.offset,
    };
    let conn = ctx.store.conn()?;
    let residents = repository::list_residents(&conn, &filter)?;
    let total = repository::count_residents(&conn)?;

    Ok(Json(ListResponse {
        residents,
        total,
        limit: filter.effective_limit(),
        offset: filter.offset.unwrap_or(0),
    }))
}

/// `POST /api/residents`: any `id`, documents or care events in the body are ignored.
pub async fn create(
    State(ctx): State<ApiContext>,
    body: Result<Json<Resident>, JsonRejection>,
) -> Result<(StatusCode, Json<Resident>), ApiError> {
    let Json(body) = body?;
    let now = Utc::now();
    let resident = Resident {
        id: Uuid::new_v4(),
        document_ids: Vec::new(),
        care_events: Vec::new(),
        created_at: Some(now),
        updated_at: Some(now),
        ..body
    };
    repository::insert_resident(&*ctx.store.conn()?, &resident)?;
    tracing::info!(resident_id = %resident.id, "Resident created");

    Ok((StatusCode::CREATED, Json(resident)))
}

/// `GET /api/residents/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<ResidentSnapshot>, ApiError> {
    let id = parse_id(&id)?;
    let snapshot = repository::get_resident_snapshot(&*ctx.store.conn()?, &id)?
        .ok_or_else(|| ApiError::NotFound(format!("Resident not found: {id}")))?;
    Ok(Json(snapshot))
}

/// `PUT /api/residents/:id`: documents, care events and creation
/// metadata are kept from the stored record.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    body: Result<Json<Resident>, JsonRejection>,
) -> Result<Json<Resident>, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = body?;
    let conn = ctx.store.conn()?;
    let existing = repository::get_resident(&conn, &id)?
        .ok_or_else(|| ApiError::NotFound(format!("Resident not found: {id}")))?;

    let resident = Resident {
        id,
        document_ids: existing.document_ids,
        care_events: existing.care_events,
        created_at: existing.created_at,
        created_by: existing.created_by,
        updated_at: Some(Utc::now()),
        ..body
    };
    repository::update_resident(&conn, &resident)?;
    tracing::info!(resident_id = %id, "Resident updated");

    Ok(Json(resident))
}

/// `DELETE /api/residents/:id`
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_id(&id)?;
    let documents_removed = repository::delete_resident(&*ctx.store.conn()?, &id)?;
    tracing::info!(resident_id = %id, documents_removed, "Resident deleted");

    Ok(Json(DeleteResponse {
        deleted: true,
        documents_removed,
    }))
}
