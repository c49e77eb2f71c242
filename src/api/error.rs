//! API error types with structured JSON responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::DatabaseError;
use crate::report::ReportError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid identifier: {0}")]
    InvalidId(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail),
            ApiError::InvalidId(raw) => (
                StatusCode::BAD_REQUEST,
                "INVALID_ID",
                format!("Invalid identifier: {raw}"),
            ),
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, id } => {
                ApiError::NotFound(format!("{entity_type} not found: {id}"))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidIdentifier(raw) => ApiError::InvalidId(raw),
            ReportError::ResidentNotFound(id) => {
                ApiError::NotFound(format!("Resident not found: {id}"))
            }
            e @ (ReportError::UnsupportedFormat(_) | ReportError::UnsupportedTemplate(_)) => {
                ApiError::BadRequest(e.to_string())
            }
            ReportError::Database(e) => e.into(),
            e @ (ReportError::Pdf(_) | ReportError::Spreadsheet(_)) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

/// Unparseable JSON bodies (bad syntax, wrong content type, unknown enum
/// values) are caller errors.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let response = ApiError::NotFound("Resident not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn invalid_id_returns_400() {
        let response = ApiError::InvalidId("abc".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_ID");
        assert_eq!(json["error"]["message"], "Invalid identifier: abc");
    }

    #[tokio::test]
    async fn internal_returns_500() {
        let response = ApiError::Internal("something broke".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Internal errors hide details from client
        assert_eq!(
            body_json(response).await["error"]["message"],
            "An internal error occurred"
        );
    }

    #[tokio::test]
    async fn unsupported_format_maps_to_bad_request() {
        let api_err: ApiError = ReportError::UnsupportedFormat("docx".into()).into();
        let response = api_err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("pdf, excel"));
    }

    #[test]
    fn database_not_found_maps_to_not_found() {
        let api_err: ApiError = DatabaseError::NotFound {
            entity_type: "Resident".into(),
            id: "42".into(),
        }
        .into();
        assert!(matches!(api_err, ApiError::NotFound(_)));
    }

    #[test]
    fn database_failure_maps_to_internal() {
        let api_err: ApiError = ReportError::Database(DatabaseError::LockPoisoned).into();
        assert!(matches!(api_err, ApiError::Internal(_)));
    }
}
