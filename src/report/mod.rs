//! Report generation.
//!
//! Resident snapshot → paginated PDF in one of four templates, or a flat
//! spreadsheet row. Remote photos and documents are fetched through an
//! injected `BlobFetcher` under a `FetchPolicy`; any fetch problem degrades
//! to a placeholder instead of failing the report.

pub mod assets;
pub mod error;
pub mod layout;
pub mod pdf;
pub mod renderer;
pub mod sections;
pub mod service;
pub mod spreadsheet;
pub mod templates;

pub use assets::{AssetResolver, BlobFetcher, FetchError, FetchPolicy, FsLogoResolver, HttpBlobFetcher};
pub use error::ReportError;
pub use renderer::ReportRenderer;
pub use service::{Disposition, ReportOutput, ReportService};
