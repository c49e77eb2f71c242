//! Report invocation: validate the request, load the snapshot, dispatch to
//! the PDF renderer or the row projector.

use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::renderer::ReportRenderer;
use super::spreadsheet::write_workbook;
use super::ReportError;
use crate::db::RecordStore;
use crate::models::enums::{ReportFormat, ReportTemplate};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Preview in the browser.
    Inline,
    /// Download as a file.
    Attachment,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::Inline => "inline",
            Disposition::Attachment => "attachment",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
    pub disposition: Disposition,
}

impl ReportOutput {
    /// `Content-Disposition` header value.
    pub fn content_disposition(&self) -> String {
        format!("{}; filename=\"{}\"", self.disposition.as_str(), self.filename)
    }
}

pub fn parse_resident_id(raw: &str) -> Result<Uuid, ReportError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ReportError::InvalidIdentifier(raw.to_string()))
}

/// Absent or blank means `pdf`.
pub fn parse_format(raw: Option<&str>) -> Result<ReportFormat, ReportError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(ReportFormat::Pdf),
        Some(s) => ReportFormat::from_str(&s.to_ascii_lowercase())
            .map_err(|_| ReportError::UnsupportedFormat(s.to_string())),
    }
}

/// Absent or blank means `detailed`.
pub fn parse_template(raw: Option<&str>) -> Result<ReportTemplate, ReportError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(ReportTemplate::Detailed),
        Some(s) => ReportTemplate::from_str(&s.to_ascii_lowercase())
            .map_err(|_| ReportError::UnsupportedTemplate(s.to_string())),
    }
}

pub struct ReportService {
    store: Arc<dyn RecordStore>,
    renderer: ReportRenderer,
}

impl ReportService {
    pub fn new(store: Arc<dyn RecordStore>, renderer: ReportRenderer) -> Self {
        Self { store, renderer }
    }

    pub fn renderer(&self) -> &ReportRenderer {
        &self.renderer
    }

    /// Produce one resident's report.
    ///
    /// Only an unparseable request or an unknown resident fails; remote
    /// content problems degrade inside the renderer.
    pub async fn generate_report(
        &self,
        resident_id: &str,
        format: Option<&str>,
        template: Option<&str>,
        disposition: Disposition,
    ) -> Result<ReportOutput, ReportError> {
        let id = parse_resident_id(resident_id)?;
        let format = parse_format(format)?;
        let template = parse_template(template)?;

        let snapshot = self
            .store
            .find_resident(&id, true)?
            .ok_or_else(|| ReportError::ResidentNotFound(id.to_string()))?;

        let stem = snapshot.resident.file_stem();
        let (bytes, content_type, extension) = match format {
            ReportFormat::Pdf => (
                self.renderer.render_pdf(&snapshot, template).await?,
                PDF_CONTENT_TYPE,
                "pdf",
            ),
            ReportFormat::Excel => (
                write_workbook(std::slice::from_ref(&snapshot))?,
                XLSX_CONTENT_TYPE,
                "xlsx",
            ),
        };

        tracing::info!(
            resident_id = %id,
            format = format.as_str(),
            template = template.as_str(),
            bytes = bytes.len(),
            "Report generated"
        );

        Ok(ReportOutput {
            bytes,
            content_type,
            filename: format!("{stem}_{}.{extension}", template.as_str()),
            disposition,
        })
    }

    /// Every resident as one worksheet.
    pub async fn export_all(&self) -> Result<ReportOutput, ReportError> {
        let snapshots = self.store.all_residents()?;
        let bytes = write_workbook(&snapshots)?;
        tracing::info!(residents = snapshots.len(), "Bulk export generated");
        Ok(ReportOutput {
            bytes,
            content_type: XLSX_CONTENT_TYPE,
            filename: format!("residents_{}.xlsx", Utc::now().format("%Y%m%d")),
            disposition: Disposition::Attachment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{repository, SqliteRecordStore};
    use crate::models::Resident;
    use crate::report::assets::{AssetResolver, FetchPolicy, HttpBlobFetcher};

    struct NoLogo;

    impl AssetResolver for NoLogo {
        fn resolve_logo(&self) -> Option<Vec<u8>> {
            None
        }
    }

    fn service_with(residents: &[Resident]) -> ReportService {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        for resident in residents {
            repository::insert_resident(&store.conn().unwrap(), resident).unwrap();
        }
        let renderer = ReportRenderer::new(
            "Sunrise",
            Arc::new(NoLogo),
            Arc::new(HttpBlobFetcher::new()),
            FetchPolicy::default(),
        );
        ReportService::new(Arc::new(store), renderer)
    }

    fn asha() -> Resident {
        Resident {
            id: Uuid::new_v4(),
            name: Some("Asha".into()),
            registration_no: Some("REG-2024-0007".into()),
            ..Default::default()
        }
    }

    #[test]
    fn parse_defaults() {
        assert_eq!(parse_format(None).unwrap(), ReportFormat::Pdf);
        assert_eq!(parse_format(Some("  ")).unwrap(), ReportFormat::Pdf);
        assert_eq!(parse_template(None).unwrap(), ReportTemplate::Detailed);
        assert_eq!(parse_format(Some("EXCEL")).unwrap(), ReportFormat::Excel);
        assert_eq!(parse_template(Some("Print")).unwrap(), ReportTemplate::Print);
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert!(matches!(
            parse_format(Some("docx")),
            Err(ReportError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            parse_template(Some("fancy")),
            Err(ReportError::UnsupportedTemplate(_))
        ));
        assert!(matches!(
            parse_resident_id("not-a-uuid"),
            Err(ReportError::InvalidIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn pdf_download_uses_registration_no() {
        let resident = asha();
        let service = service_with(&[resident.clone()]);
        let output = service
            .generate_report(
                &resident.id.to_string(),
                None,
                Some("summary"),
                Disposition::Attachment,
            )
            .await
            .unwrap();

        assert_eq!(output.content_type, PDF_CONTENT_TYPE);
        assert_eq!(output.filename, "REG-2024-0007_summary.pdf");
        assert_eq!(
            output.content_disposition(),
            "attachment; filename=\"REG-2024-0007_summary.pdf\""
        );
        assert!(output.bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn excel_preview_falls_back_to_raw_id() {
        let resident = Resident {
            id: Uuid::new_v4(),
            ..Default::default()
        };
        let service = service_with(&[resident.clone()]);
        let output = service
            .generate_report(&resident.id.to_string(), Some("excel"), None, Disposition::Inline)
            .await
            .unwrap();

        assert_eq!(output.content_type, XLSX_CONTENT_TYPE);
        assert_eq!(output.filename, format!("{}_detailed.xlsx", resident.id));
        assert!(output.content_disposition().starts_with("inline;"));
    }

    #[tokio::test]
    async fn unknown_resident_is_not_found() {
        let service = service_with(&[]);
        let err = service
            .generate_report(&Uuid::new_v4().to_string(), None, None, Disposition::Inline)
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::ResidentNotFound(_)));
    }

    #[tokio::test]
    async fn bad_format_rejected_before_lookup() {
        let service = service_with(&[]);
        let err = service
            .generate_report(&Uuid::new_v4().to_string(), Some("docx"), None, Disposition::Inline)
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn export_all_writes_every_resident() {
        let service = service_with(&[asha(), asha()]);
        let output = service.export_all().await.unwrap();
        assert_eq!(output.content_type, XLSX_CONTENT_TYPE);
        assert_eq!(output.disposition, Disposition::Attachment);
        assert!(output.filename.starts_with("residents_"));
        assert!(output.bytes.starts_with(b"PK"));
    }
}
