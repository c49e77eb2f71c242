//! Care event endpoints.
//!
//! - `GET /api/residents/:id/care-events`: timeline, most recent first
//! - `POST /api/residents/:id/care-events`: append

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use crate::api::error::ApiError;
use crate::api::types::{parse_id, ApiContext};
use crate::db::repository;
use crate::models::{timeline_order, CareEvent, NewCareEvent};

pub async fn timeline(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CareEvent>>, ApiError> {
    let id = parse_id(&id)?;
    let resident = repository::get_resident(&*ctx.store.conn()?, &id)?
        .ok_or_else(|| ApiError::NotFound(format!("Resident not found: {id}")))?;
    Ok(Json(timeline_order(&resident.care_events)))
}

pub async fn append(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    body: Result<Json<NewCareEvent>, JsonRejection>,
) -> Result<(StatusCode, Json<CareEvent>), ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = body?;
    body.validate().map_err(ApiError::BadRequest)?;

    let event = repository::append_care_event(&*ctx.store.conn()?, &id, body.into_event(Utc::now()))?;
    tracing::info!(
        resident_id = %id,
        event_type = event.event_type.as_str(),
        "Care event recorded"
    );

    Ok((StatusCode::CREATED, Json(event)))
}
