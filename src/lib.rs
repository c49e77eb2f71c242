pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod report;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::ApiContext;
use crate::config::ServerConfig;
use crate::db::SqliteRecordStore;
use crate::report::{FetchPolicy, FsLogoResolver, HttpBlobFetcher, ReportRenderer, ReportService};

pub fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = ServerConfig::from_env();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(serve(config)) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

/// Open the store, wire the report service and serve until Ctrl-C.
async fn serve(config: ServerConfig) -> Result<(), String> {
    let store = SqliteRecordStore::open(&config.database_path).map_err(|e| {
        format!(
            "Cannot open record store at {}: {e}",
            config.database_path.display()
        )
    })?;
    let store = Arc::new(store);
    tracing::info!(path = %config.database_path.display(), "Record store opened");

    let policy = FetchPolicy {
        timeout: config.fetch_timeout,
        max_attempts: config.fetch_attempts,
        ..FetchPolicy::default()
    };
    let renderer = ReportRenderer::new(
        config.org_name.clone(),
        Arc::new(FsLogoResolver::new(config.logo_paths.clone())),
        Arc::new(HttpBlobFetcher::new()),
        policy,
    );
    let reports = Arc::new(ReportService::new(store.clone(), renderer));

    let mut server = api::start_api_server(ApiContext::new(store, reports), config.bind_addr).await?;
    tracing::info!(addr = %server.addr, org = %config.org_name, "Serving resident reports");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C, shutting down: {e}");
    }

    server.shutdown();
    server.wait().await;
    Ok(())
}
