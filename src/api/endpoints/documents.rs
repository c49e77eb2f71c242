//! Document metadata registration.
//!
//! Bytes live in the Blob Store; this endpoint only records where they are.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::db::repository;
use crate::models::{Document, NewDocument};

/// `POST /api/residents/:id/documents`
pub async fn register(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    body: Result<Json<NewDocument>, JsonRejection>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let resident_id = parse_id(&id)?;
    let Json(body) = body?;

    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Document name is required".into()));
    }
    let file_path = body.file_path.trim();
    if file_path.is_empty() {
        return Err(ApiError::BadRequest("Document file_path is required".into()));
    }

    let document = Document {
        id: Uuid::new_v4(),
        resident_id,
        name: name.to_string(),
        doc_type: body.doc_type,
        file_path: file_path.to_string(),
        mime_type: body.mime_type.filter(|m| !m.trim().is_empty()),
        size: body.size,
        uploaded_at: Utc::now(),
    };
    repository::attach_document(&*ctx.store.conn()?, &document)?;
    tracing::info!(
        resident_id = %resident_id,
        document_id = %document.id,
        doc_type = document.doc_type.as_str(),
        "Document registered"
    );

    Ok((StatusCode::CREATED, Json(document)))
}
