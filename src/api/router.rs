//! API router.
//!
//! All routes are nested under `/api/`. Layers (outermost first):
//! CORS → access log → `Cache-Control: no-store` → handler.
//!
//! NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints::{care_events, documents, health, reports, residents};
use crate::api::middleware;
use crate::api::types::ApiContext;

pub fn api_router(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route("/health", get(health::check))
        .route("/residents", get(residents::list).post(residents::create))
        .route(
            "/residents/:id",
            get(residents::detail)
                .put(residents::update)
                .delete(residents::remove),
        )
        .route("/residents/:id/documents", post(documents::register))
        .route(
            "/residents/:id/care-events",
            get(care_events::timeline).post(care_events::append),
        )
        .route("/residents/:id/report/preview", get(reports::preview))
        .route("/residents/:id/report/download", get(reports::download))
        .route("/reports/residents", get(reports::export_all))
        .with_state(ctx);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::CONTENT_DISPOSITION]);

    Router::new()
        .nest("/api", routes)
        // Resident data must not be cached by intermediaries
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(axum::middleware::from_fn(middleware::access_log::log_access))
        .layer(cors)
}
