//! Report endpoints.
//!
//! - `GET /api/residents/:id/report/preview`: inline
//! - `GET /api/residents/:id/report/download`: attachment
//! - `GET /api/reports/residents`: every resident as one workbook

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::report::{Disposition, ReportOutput};

#[derive(Deserialize)]
pub struct ReportQuery {
    pub format: Option<String>,
    pub template: Option<String>,
}

pub async fn preview(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    generate(ctx, id, query, Disposition::Inline).await
}

pub async fn download(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    generate(ctx, id, query, Disposition::Attachment).await
}

pub async fn export_all(State(ctx): State<ApiContext>) -> Result<Response, ApiError> {
    let output = ctx.reports.export_all().await?;
    Ok(file_response(output))
}

async fn generate(
    ctx: ApiContext,
    id: String,
    query: ReportQuery,
    disposition: Disposition,
) -> Result<Response, ApiError> {
    let output = ctx
        .reports
        .generate_report(
            &id,
            query.format.as_deref(),
            query.template.as_deref(),
            disposition,
        )
        .await?;
    Ok(file_response(output))
}

fn file_response(output: ReportOutput) -> Response {
    let disposition = output.content_disposition();
    (
        [
            (header::CONTENT_TYPE, output.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        output.bytes,
    )
        .into_response()
}
