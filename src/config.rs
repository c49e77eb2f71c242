use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Resident Reports";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Organization name printed in report headers when none is configured.
pub const DEFAULT_ORG_NAME: &str = "Residential Care Home";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FETCH_ATTEMPTS: u32 = 2;

/// Default `tracing` filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,resident_reports=debug"
}

/// Get the application data directory
/// ~/ResidentReports/ on all platforms, falling back to the working directory.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ResidentReports")
}

/// Default record store location.
pub fn default_database_path() -> PathBuf {
    app_data_dir().join("database").join("residents.db")
}

/// Candidate logo locations, probed in order by the filesystem resolver.
pub fn default_logo_paths() -> Vec<PathBuf> {
    let data = app_data_dir();
    vec![
        data.join("assets").join("logo.png"),
        data.join("assets").join("logo.jpg"),
        PathBuf::from("assets").join("logo.png"),
        PathBuf::from("public").join("logo.png"),
    ]
}

/// Runtime configuration for the HTTP server and report renderer.
///
/// Every value has a default; environment variables override:
/// - `RESIDENT_REPORTS_BIND`: listen address
/// - `RESIDENT_REPORTS_DB`: SQLite database path
/// - `RESIDENT_REPORTS_ORG_NAME`: organization name in report headers
/// - `RESIDENT_REPORTS_LOGO_PATHS`: logo candidates (OS path-list separator)
/// - `RESIDENT_REPORTS_FETCH_TIMEOUT_SECS`: per-attempt blob fetch deadline
/// - `RESIDENT_REPORTS_FETCH_ATTEMPTS`: blob fetch attempts (min 1)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub org_name: String,
    pub logo_paths: Vec<PathBuf>,
    pub fetch_timeout: Duration,
    pub fetch_attempts: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            database_path: default_database_path(),
            org_name: DEFAULT_ORG_NAME.to_string(),
            logo_paths: default_logo_paths(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            fetch_attempts: DEFAULT_FETCH_ATTEMPTS,
        }
    }
}

impl ServerConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unparseable values are logged and replaced by their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("RESIDENT_REPORTS_BIND") {
            match raw.parse::<SocketAddr>() {
                Ok(addr) => config.bind_addr = addr,
                Err(e) => tracing::warn!(
                    value = %raw,
                    error = %e,
                    "Invalid bind address, using {DEFAULT_BIND_ADDR}"
                ),
            }
        }
        if let Some(path) = lookup("RESIDENT_REPORTS_DB").filter(|p| !p.trim().is_empty()) {
            config.database_path = PathBuf::from(path);
        }
        if let Some(name) = lookup("RESIDENT_REPORTS_ORG_NAME") {
            let name = name.trim();
            if !name.is_empty() {
                config.org_name = name.to_string();
            }
        }
        if let Some(raw) = lookup("RESIDENT_REPORTS_LOGO_PATHS") {
            config.logo_paths = std::env::split_paths(&raw)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
        }
        if let Some(raw) = lookup("RESIDENT_REPORTS_FETCH_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => config.fetch_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %raw, "Invalid fetch timeout, using default"),
            }
        }
        if let Some(raw) = lookup("RESIDENT_REPORTS_FETCH_ATTEMPTS") {
            match raw.parse::<u32>() {
                Ok(n) => config.fetch_attempts = n.max(1),
                Err(_) => tracing::warn!(value = %raw, "Invalid fetch attempts, using default"),
            }
        }

        config
    }
}
