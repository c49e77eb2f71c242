//! Template assembler: interprets a `TemplateSpec` against one resident
//! snapshot and produces finished pages.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use printpdf::image_crate::{self, DynamicImage};
use tracing::{debug, info, warn};

use super::assets::{AssetResolver, BlobFetcher, FetchPolicy};
use super::layout::*;
use super::pdf;
use super::sections::FieldWidth;
use super::templates::{template_spec, SectionContent, SectionPlan, TemplateSpec};
use super::ReportError;
use crate::models::enums::ReportTemplate;
use crate::models::{CareEvent, Document, DocumentKind, Resident, ResidentSnapshot};

const HEADER_HEIGHT: f32 = 80.0;
const LOGO_SIZE: f32 = 50.0;
const BANNER_HEIGHT: f32 = 62.0;
const PHOTO_WIDTH: f32 = 180.0;
const PHOTO_HEIGHT: f32 = 200.0;
const DOC_IMAGE_WIDTH: f32 = 260.0;
const DOC_IMAGE_HEIGHT: f32 = 180.0;

pub const NO_PHOTO: &str = "No photo";
pub const PHOTO_UNAVAILABLE: &str = "Photo unavailable";

/// Produces PDF reports for resident snapshots.
pub struct ReportRenderer {
    org_name: String,
    assets: Arc<dyn AssetResolver>,
    fetcher: Arc<dyn BlobFetcher>,
    policy: FetchPolicy,
}

impl ReportRenderer {
    pub fn new(
        org_name: impl Into<String>,
        assets: Arc<dyn AssetResolver>,
        fetcher: Arc<dyn BlobFetcher>,
        policy: FetchPolicy,
    ) -> Self {
        Self {
            org_name: org_name.into(),
            assets,
            fetcher,
            policy,
        }
    }

    pub fn org_name(&self) -> &str {
        &self.org_name
    }

    /// Assemble and footer-stamp every page of `template` for `snapshot`.
    pub async fn layout(&self, snapshot: &ResidentSnapshot, template: ReportTemplate) -> Vec<Page> {
        self.layout_at(snapshot, template, Utc::now()).await
    }

    pub async fn layout_at(
        &self,
        snapshot: &ResidentSnapshot,
        template: ReportTemplate,
        generated_at: DateTime<Utc>,
    ) -> Vec<Page> {
        let spec = template_spec(template);
        let generated = generated_at.format("%d %b %Y %H:%M UTC").to_string();

        let mut assembly = Assembly {
            renderer: self,
            spec,
            canvas: Canvas::new(spec.spacing),
        };
        let mut y = assembly.header_band(&generated);
        y = assembly.identity_banner(&snapshot.resident, y);
        for plan in spec.sections {
            y = assembly.section(plan, snapshot, y).await;
        }

        let mut pages = assembly.canvas.finish();
        stamp_footers(
            &mut pages,
            &FooterText {
                org_name: self.org_name.clone(),
                generated_at: generated,
            },
        );

        info!(
            resident_id = %snapshot.resident.id,
            template = template.as_str(),
            pages = pages.len(),
            "Report laid out"
        );
        pages
    }

    pub async fn render_pdf(
        &self,
        snapshot: &ResidentSnapshot,
        template: ReportTemplate,
    ) -> Result<Vec<u8>, ReportError> {
        let pages = self.layout(snapshot, template).await;
        let title = format!(
            "{} - {}",
            template_spec(template).title,
            display_value(snapshot.resident.name.as_deref())
        );
        pdf::write_pdf(&title, &pages)
    }
}

/// Phase 1 state for one render.
struct Assembly<'a> {
    renderer: &'a ReportRenderer,
    spec: &'static TemplateSpec,
    canvas: Canvas,
}

impl Assembly<'_> {
    fn header_band(&mut self, generated: &str) -> f32 {
        self.canvas
            .rect(0.0, 0.0, PAGE_WIDTH, HEADER_HEIGHT, Some(BRAND), None);

        let logo = self.renderer.assets.resolve_logo().and_then(|bytes| {
            let decoded = decode_image(&bytes);
            if decoded.is_none() {
                warn!("Logo could not be decoded, using wordmark");
            }
            decoded
        });
        let top = (HEADER_HEIGHT - LOGO_SIZE) / 2.0;
        match logo {
            Some(image) => self.place_image(image, MARGIN, top, LOGO_SIZE, LOGO_SIZE),
            None => {
                self.canvas
                    .rect(MARGIN, top, LOGO_SIZE, LOGO_SIZE, Some(WHITE), None);
                self.canvas.text(
                    MARGIN + 9.0,
                    top + 31.0,
                    wordmark(&self.renderer.org_name),
                    TextStyle::Title,
                    BRAND,
                );
            }
        }

        let x = MARGIN + LOGO_SIZE + 12.0;
        self.canvas
            .text(x, 32.0, self.renderer.org_name.clone(), TextStyle::Title, WHITE);
        self.canvas.text(x, 50.0, self.spec.title, TextStyle::Body, WHITE);
        self.canvas
            .text(x, 64.0, format!("Generated: {generated}"), TextStyle::Caption, WHITE);

        HEADER_HEIGHT + 16.0
    }

    fn identity_banner(&mut self, resident: &Resident, y: f32) -> f32 {
        self.canvas.rect(
            MARGIN,
            y,
            CONTENT_WIDTH,
            BANNER_HEIGHT,
            Some(BRAND_LIGHT),
            Some(BORDER),
        );
        self.canvas.text(
            MARGIN + 10.0,
            y + 22.0,
            display_value(resident.name.as_deref()),
            TextStyle::Title,
            INK,
        );
        self.canvas.text(
            MARGIN + 10.0,
            y + 38.0,
            format!(
                "Registration No: {}    Admission Date: {}",
                display_value(resident.registration_no.as_deref()),
                display_value(super::sections::date(&resident.admission_date).as_deref()),
            ),
            TextStyle::Body,
            INK,
        );
        self.canvas.text(
            MARGIN + 10.0,
            y + 52.0,
            format!(
                "Age: {} | Gender: {} | Category: {}",
                display_value(resident.age.map(|a| a.to_string()).as_deref()),
                display_value(resident.gender.as_deref()),
                display_value(resident.category.as_deref()),
            ),
            TextStyle::Body,
            INK,
        );
        y + BANNER_HEIGHT + 12.0
    }

    async fn section(&mut self, plan: &SectionPlan, snapshot: &ResidentSnapshot, y: f32) -> f32 {
        let spacing = self.canvas.spacing();
        // Keep the header together with at least one line of content
        let y = self.canvas.check_page_break(
            y,
            SECTION_HEADER_HEIGHT + spacing.field_height + spacing.field_gap,
        );
        let y = self.canvas.render_section_header(plan.title, y);
        debug!(section = plan.title, "Rendering section");

        match plan.content {
            SectionContent::Fields(fields) => self.fields(fields, &snapshot.resident, y),
            SectionContent::Photos => self.photos(&snapshot.resident, y).await,
            SectionContent::DocumentDetails => self.document_details(&snapshot.documents, y).await,
            SectionContent::DocumentList => self.document_list(&snapshot.documents, y),
            SectionContent::CareEvents => self.care_events(&snapshot.resident.care_events, y),
        }
    }

    fn fields(&mut self, fields: &[super::sections::FieldSpec], resident: &Resident, y: f32) -> f32 {
        let spacing = self.canvas.spacing();
        let line = spacing.field_height + spacing.field_gap;
        let single = self.options(false);
        let multi = self.options(true);

        let mut y = y;
        let mut i = 0;
        while i < fields.len() {
            let field = &fields[i];
            let value = field.read(resident);
            y = self.canvas.check_page_break(y, line);
            match field.width {
                FieldWidth::Half => {
                    if let Some(next) = fields.get(i + 1).filter(|f| f.width == FieldWidth::Half) {
                        let other = next.read(resident);
                        y = self.canvas.render_field_pair(
                            field.label,
                            value.as_deref(),
                            next.label,
                            other.as_deref(),
                            y,
                        );
                        i += 2;
                        continue;
                    }
                    y = self.canvas.render_field(field.label, value.as_deref(), y, &single);
                }
                FieldWidth::Full => {
                    y = self.canvas.render_field(field.label, value.as_deref(), y, &single);
                }
                FieldWidth::Multiline => {
                    y = self.canvas.render_field(field.label, value.as_deref(), y, &multi);
                }
            }
            i += 1;
        }
        y
    }

    async fn photos(&mut self, resident: &Resident, y: f32) -> f32 {
        let y = self.canvas.check_page_break(y, PHOTO_HEIGHT + 30.0);
        let before = resident
            .photo_before_admission
            .as_deref()
            .filter(|u| !u.trim().is_empty());
        let slots = [
            ("Before Admission", before),
            ("After Admission", resident.current_photo()),
        ];

        for (index, (caption, url)) in slots.into_iter().enumerate() {
            let x = MARGIN + index as f32 * (PHOTO_WIDTH + 40.0);
            let frame_top = y + 16.0;
            self.canvas
                .text(x, y + 10.0, caption, TextStyle::Caption, MUTED);
            self.canvas
                .rect(x, frame_top, PHOTO_WIDTH, PHOTO_HEIGHT, None, Some(BORDER));

            let placeholder = match url {
                None => Some(NO_PHOTO),
                Some(url) => match self.fetch_image(url).await {
                    Some(image) => {
                        self.place_image(image, x, frame_top, PHOTO_WIDTH, PHOTO_HEIGHT);
                        None
                    }
                    None => Some(PHOTO_UNAVAILABLE),
                },
            };
            if let Some(text) = placeholder {
                self.canvas.text(
                    x + 10.0,
                    frame_top + PHOTO_HEIGHT / 2.0,
                    text,
                    TextStyle::Body,
                    MUTED,
                );
            }
        }

        y + 16.0 + PHOTO_HEIGHT + 14.0
    }

    async fn document_details(&mut self, documents: &[Document], y: f32) -> f32 {
        if documents.is_empty() {
            return self
                .canvas
                .render_paragraph("No documents attached.", y, TextStyle::Body);
        }

        let mut y = y;
        for (index, doc) in documents.iter().enumerate() {
            y = self.canvas.check_page_break(y, 44.0);
            let mime = doc.effective_mime();
            self.canvas.text(
                MARGIN,
                y + 12.0,
                clip_to_width(
                    &format!("{}. {}", index + 1, doc.name),
                    CONTENT_WIDTH,
                    TextStyle::Heading,
                ),
                TextStyle::Heading,
                INK,
            );
            self.canvas.text(
                MARGIN,
                y + 26.0,
                format!(
                    "Type: {} | Format: {} | Size: {}",
                    doc.doc_type.label(),
                    mime,
                    display_value(doc.display_size().as_deref()),
                ),
                TextStyle::Caption,
                MUTED,
            );
            y += 34.0;

            y = match doc.kind() {
                DocumentKind::Image => {
                    match self.renderer.policy.fetch(self.renderer.fetcher.as_ref(), &doc.file_path).await {
                        Ok(bytes) => match decode_image(&bytes) {
                            Some(image) => {
                                y = self.canvas.check_page_break(y, DOC_IMAGE_HEIGHT + 10.0);
                                self.place_image(image, MARGIN, y, DOC_IMAGE_WIDTH, DOC_IMAGE_HEIGHT);
                                y + DOC_IMAGE_HEIGHT + 10.0
                            }
                            None => {
                                warn!(document_id = %doc.id, "Document image could not be decoded");
                                self.canvas.render_paragraph(
                                    &format!("Image could not be rendered: {}", doc.name),
                                    y,
                                    TextStyle::Body,
                                )
                            }
                        },
                        Err(e) => self.canvas.render_paragraph(
                            &format!("Document unavailable: {} could not be retrieved ({e})", doc.name),
                            y,
                            TextStyle::Body,
                        ),
                    }
                }
                DocumentKind::Pdf => self.canvas.render_paragraph(
                    "PDF document available but not displayed inline.",
                    y,
                    TextStyle::Body,
                ),
                DocumentKind::Other => self.canvas.render_paragraph(
                    &format!("This document type ({mime}) cannot be displayed inline."),
                    y,
                    TextStyle::Body,
                ),
            };
            y += 6.0;
        }
        y
    }

    fn document_list(&mut self, documents: &[Document], y: f32) -> f32 {
        let names = if documents.is_empty() {
            "None".to_string()
        } else {
            documents
                .iter()
                .map(|d| d.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let options = self.options(true);
        let y = self.canvas.check_page_break(y, self.canvas.spacing().field_height);
        self.canvas.render_field("Documents", Some(&names), y, &options)
    }

    fn care_events(&mut self, events: &[CareEvent], y: f32) -> f32 {
        if events.is_empty() {
            return self
                .canvas
                .render_paragraph("No care events recorded.", y, TextStyle::Body);
        }

        let spacing = self.canvas.spacing();
        let multi = self.options(true);
        let mut y = y;
        for event in events {
            y = self
                .canvas
                .check_page_break(y, 18.0 + 3.0 * (spacing.field_height + spacing.field_gap));
            let mut heading = format!(
                "{} - {}",
                event.date.format("%d %b %Y"),
                event.event_type.label()
            );
            if let Some(status) = event.status {
                heading.push_str(&format!(" ({})", status.label()));
            }
            self.canvas
                .text(MARGIN, y + 12.0, heading, TextStyle::Heading, INK);
            y += 18.0;

            y = self
                .canvas
                .render_field("Description", Some(&event.description), y, &multi);
            y = self
                .canvas
                .check_page_break(y, spacing.field_height + spacing.field_gap);
            y = self.canvas.render_field_pair(
                "Doctor",
                event.doctor.as_deref(),
                "Medications",
                event.medications.as_deref(),
                y,
            );
            let next_visit = super::sections::date(&event.next_visit);
            y = self
                .canvas
                .check_page_break(y, spacing.field_height + spacing.field_gap);
            y = self.canvas.render_field_pair(
                "Next Visit",
                next_visit.as_deref(),
                "Remarks",
                event.remarks.as_deref(),
                y,
            );
            y += 6.0;
        }
        y
    }

    fn options(&self, multiline: bool) -> FieldOptions {
        FieldOptions {
            multiline,
            chars_per_line: self.spec.chars_per_line,
        }
    }

    async fn fetch_image(&self, url: &str) -> Option<DynamicImage> {
        let bytes = self
            .renderer
            .policy
            .fetch(self.renderer.fetcher.as_ref(), url)
            .await
            .ok()?;
        let image = decode_image(&bytes);
        if image.is_none() {
            warn!(url, "Fetched photo could not be decoded");
        }
        image
    }

    /// Scale `image` into the box, preserving aspect ratio, centred.
    fn place_image(&mut self, image: DynamicImage, x: f32, y: f32, box_width: f32, box_height: f32) {
        let (px_w, px_h) = (image.width().max(1) as f32, image.height().max(1) as f32);
        let scale = (box_width / px_w).min(box_height / px_h);
        let (width, height) = (px_w * scale, px_h * scale);
        self.canvas.push(Block::Image {
            x: x + (box_width - width) / 2.0,
            y: y + (box_height - height) / 2.0,
            width,
            height,
            image: Arc::new(image),
        });
    }
}

/// Decode and flatten to RGB; alpha channels are not carried into the PDF.
fn decode_image(bytes: &[u8]) -> Option<DynamicImage> {
    image_crate::load_from_memory(bytes)
        .ok()
        .map(|image| DynamicImage::ImageRgb8(image.to_rgb8()))
}

/// Up to two initials from the organization name.
fn wordmark(org_name: &str) -> String {
    let initials: String = org_name
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .filter(|c| c.is_alphanumeric())
        .take(2)
        .collect::<String>()
        .to_uppercase();
    if initials.is_empty() {
        "R".to_string()
    } else {
        initials
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::{CareEventType, DocumentType};
    use crate::models::Address;
    use crate::report::assets::FetchError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Mutex;
    use std::time::Duration;
    use uuid::Uuid;

    struct NoLogo;

    impl AssetResolver for NoLogo {
        fn resolve_logo(&self) -> Option<Vec<u8>> {
            None
        }
    }

    struct FixedLogo(Vec<u8>);

    impl AssetResolver for FixedLogo {
        fn resolve_logo(&self) -> Option<Vec<u8>> {
            Some(self.0.clone())
        }
    }

    /// Serves canned bytes per URL and records every request.
    #[derive(Default)]
    struct StubFetcher {
        blobs: HashMap<String, Vec<u8>>,
        slow: Vec<String>,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl BlobFetcher for StubFetcher {
        async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            if self.slow.iter().any(|u| u == url) {
                tokio::time::sleep(Duration::from_secs(30)).await;
            }
            self.blobs
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Transport("connection refused".into()))
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(8, 6, image::Rgb([120u8, 80, 40]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageOutputFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn renderer_with(fetcher: Arc<StubFetcher>) -> ReportRenderer {
        ReportRenderer::new(
            "Sunrise Care Home",
            Arc::new(NoLogo),
            fetcher,
            FetchPolicy {
                timeout: Duration::from_millis(100),
                max_attempts: 1,
                backoff: Duration::from_millis(1),
            },
        )
    }

    fn renderer() -> ReportRenderer {
        renderer_with(Arc::new(StubFetcher::default()))
    }

    fn empty_snapshot() -> ResidentSnapshot {
        ResidentSnapshot {
            resident: Resident {
                id: Uuid::new_v4(),
                ..Default::default()
            },
            documents: Vec::new(),
        }
    }

    fn document(name: &str, url: &str, mime: Option<&str>) -> Document {
        Document {
            id: Uuid::new_v4(),
            resident_id: Uuid::new_v4(),
            name: name.into(),
            doc_type: DocumentType::Other,
            file_path: url.into(),
            mime_type: mime.map(Into::into),
            size: Some(4096),
            uploaded_at: Utc::now(),
        }
    }

    /// (label, value) for every labelled field box, in order.
    fn field_values(pages: &[Page]) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for page in pages {
            let texts: Vec<_> = page.texts().collect();
            for (i, (text, style)) in texts.iter().enumerate() {
                if *style != TextStyle::Label {
                    continue;
                }
                if let Some((value, _)) = texts[i + 1..]
                    .iter()
                    .find(|(_, s)| *s == TextStyle::Value)
                {
                    out.push((text.to_string(), value.to_string()));
                }
            }
        }
        out
    }

    fn all_text(pages: &[Page]) -> Vec<String> {
        pages
            .iter()
            .flat_map(|p| p.texts().map(|(t, _)| t.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn zero_field_resident_renders_placeholders_in_every_template() {
        let snapshot = empty_snapshot();
        for template in ReportTemplate::ALL {
            let pages = renderer().layout(&snapshot, *template).await;
            assert!(!pages.is_empty());

            let values = field_values(&pages);
            let expected = template_spec(*template).fields().count();
            let field_slots: Vec<_> = values
                .iter()
                .filter(|(label, _)| label != "Documents" && label != "Description")
                .collect();
            assert_eq!(field_slots.len(), expected, "{template:?}");
            for (label, value) in field_slots {
                assert_eq!(value, "N/A", "{template:?} {label}");
            }
        }
    }

    #[tokio::test]
    async fn detailed_zero_field_shows_missing_photos() {
        let pages = renderer()
            .layout(&empty_snapshot(), ReportTemplate::Detailed)
            .await;
        let texts = all_text(&pages);
        assert_eq!(texts.iter().filter(|t| *t == NO_PHOTO).count(), 2);
        assert!(texts.iter().any(|t| t == "No documents attached."));
        assert!(texts.iter().any(|t| t == "No care events recorded."));
    }

    #[tokio::test]
    async fn non_image_document_is_described_not_fetched() {
        let fetcher = Arc::new(StubFetcher::default());
        let mut snapshot = empty_snapshot();
        snapshot.documents = vec![document(
            "Consent letter",
            "https://blobs.example/consent.docx",
            Some("application/msword"),
        )];

        let pages = renderer_with(fetcher.clone())
            .layout(&snapshot, ReportTemplate::Detailed)
            .await;

        let texts = all_text(&pages);
        assert!(texts
            .iter()
            .any(|t| t.contains("application/msword") && t.contains("cannot be displayed inline")));
        assert!(fetcher.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn pdf_document_is_noted_not_fetched() {
        let fetcher = Arc::new(StubFetcher::default());
        let mut snapshot = empty_snapshot();
        snapshot.documents = vec![document("Discharge", "https://blobs.example/d.pdf", None)];

        let pages = renderer_with(fetcher.clone())
            .layout(&snapshot, ReportTemplate::Detailed)
            .await;
        assert!(all_text(&pages)
            .iter()
            .any(|t| t == "PDF document available but not displayed inline."));
        assert!(fetcher.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn long_document_name_is_clipped_to_page_width() {
        let fetcher = Arc::new(StubFetcher::default());
        let mut snapshot = empty_snapshot();
        let name = "Annual medical review ".repeat(10);
        snapshot.documents = vec![document(&name, "https://blobs.example/r.pdf", None)];

        let pages = renderer_with(fetcher)
            .layout(&snapshot, ReportTemplate::Detailed)
            .await;
        let heading = all_text(&pages)
            .into_iter()
            .find(|t| t.starts_with("1. Annual medical review"))
            .unwrap();
        assert!(heading.ends_with("..."));
        assert!(heading.chars().count() <= chars_for_width(CONTENT_WIDTH, TextStyle::Heading));
    }

    #[tokio::test]
    async fn image_document_is_embedded() {
        let url = "https://blobs.example/xray.png";
        let fetcher = Arc::new(StubFetcher {
            blobs: HashMap::from([(url.to_string(), png_bytes())]),
            ..Default::default()
        });
        let mut snapshot = empty_snapshot();
        snapshot.documents = vec![document("X-ray", url, None)];

        let pages = renderer_with(fetcher.clone())
            .layout(&snapshot, ReportTemplate::Detailed)
            .await;
        let images: usize = pages.iter().map(Page::image_count).sum();
        assert_eq!(images, 1);
        assert_eq!(fetcher.requested.lock().unwrap().as_slice(), [url]);
    }

    #[tokio::test]
    async fn failed_document_fetch_records_synopsis() {
        let mut snapshot = empty_snapshot();
        snapshot.documents = vec![document("Scan", "https://blobs.example/missing.jpg", None)];

        let pages = renderer().layout(&snapshot, ReportTemplate::Detailed).await;
        assert!(all_text(&pages)
            .iter()
            .any(|t| t.starts_with("Document unavailable: Scan")));
    }

    #[tokio::test]
    async fn unreachable_photo_degrades_and_later_sections_render() {
        let after = "https://blobs.example/after.png";
        let fetcher = Arc::new(StubFetcher {
            blobs: HashMap::from([(after.to_string(), png_bytes())]),
            ..Default::default()
        });
        let mut snapshot = empty_snapshot();
        snapshot.resident.photo_before_admission = Some("https://unreachable.example/b.jpg".into());
        snapshot.resident.photo_after_admission = Some(after.into());

        let pages = renderer_with(fetcher)
            .layout(&snapshot, ReportTemplate::Detailed)
            .await;
        let texts = all_text(&pages);
        assert!(texts.iter().any(|t| t == PHOTO_UNAVAILABLE));
        assert!(texts.iter().any(|t| t == "Care Events"));
        assert_eq!(pages.iter().map(Page::image_count).sum::<usize>(), 1);
    }

    #[tokio::test]
    async fn fetch_deadline_degrades_to_placeholder() {
        let slow = "https://blobs.example/slow.jpg";
        let fetcher = Arc::new(StubFetcher {
            slow: vec![slow.to_string()],
            ..Default::default()
        });
        let mut snapshot = empty_snapshot();
        snapshot.resident.photo_before_admission = Some(slow.into());

        let pages = renderer_with(fetcher)
            .layout(&snapshot, ReportTemplate::Detailed)
            .await;
        let texts = all_text(&pages);
        assert!(texts.iter().any(|t| t == PHOTO_UNAVAILABLE));
        assert!(texts.iter().any(|t| t == NO_PHOTO));
    }

    #[tokio::test]
    async fn legacy_photo_fills_after_admission_slot() {
        let legacy = "https://blobs.example/legacy.png";
        let fetcher = Arc::new(StubFetcher {
            blobs: HashMap::from([(legacy.to_string(), png_bytes())]),
            ..Default::default()
        });
        let mut snapshot = empty_snapshot();
        snapshot.resident.photo_url = Some(legacy.into());

        let pages = renderer_with(fetcher.clone())
            .layout(&snapshot, ReportTemplate::Detailed)
            .await;
        assert_eq!(pages.iter().map(Page::image_count).sum::<usize>(), 1);
        assert_eq!(fetcher.requested.lock().unwrap().as_slice(), [legacy]);
    }

    #[tokio::test]
    async fn summary_never_fetches() {
        let fetcher = Arc::new(StubFetcher::default());
        let mut snapshot = empty_snapshot();
        snapshot.resident.photo_before_admission = Some("https://blobs.example/b.png".into());
        snapshot.documents = vec![document("X-ray", "https://blobs.example/x.png", None)];

        renderer_with(fetcher.clone())
            .layout(&snapshot, ReportTemplate::Summary)
            .await;
        assert!(fetcher.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn long_text_paginates_and_footers_match_total() {
        let long = "Resident was admitted after a prolonged period without shelter. ".repeat(60);
        let mut snapshot = empty_snapshot();
        snapshot.resident.medical_history = Some(long.clone());
        snapshot.resident.medical_notes = Some(long.clone());
        snapshot.resident.remarks = Some(long);

        let pages = renderer().layout(&snapshot, ReportTemplate::Detailed).await;
        let total = pages.len();
        assert!(total > 2);
        for (i, page) in pages.iter().enumerate() {
            let footer = format!("Page {} of {}", i + 1, total);
            assert!(page.contains_text(&footer), "missing '{footer}'");
        }
    }

    #[tokio::test]
    async fn care_events_listed_in_stored_order() {
        let mut snapshot = empty_snapshot();
        for (day, description) in [(1, "Older entry first"), (20, "Newer entry second")] {
            snapshot.resident.care_events.push(CareEvent {
                id: Uuid::new_v4(),
                event_type: CareEventType::Checkup,
                description: description.into(),
                date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
                doctor: Some("Dr. Kulkarni".into()),
                medications: None,
                next_visit: None,
                status: None,
                remarks: None,
                created_at: Utc::now(),
                created_by: None,
            });
        }

        let pages = renderer().layout(&snapshot, ReportTemplate::Medical).await;
        let texts = all_text(&pages);
        let first = texts.iter().position(|t| t == "Older entry first").unwrap();
        let second = texts.iter().position(|t| t == "Newer entry second").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn asha_summary_report() {
        let snapshot = ResidentSnapshot {
            resident: Resident {
                id: Uuid::new_v4(),
                name: Some("Asha".into()),
                registration_no: Some("REG-2024-0007".into()),
                age: Some(34),
                gender: Some("Female".into()),
                health_status: Some("Stable".into()),
                address: Address {
                    district: Some("Pune".into()),
                    state: Some("Maharashtra".into()),
                    ..Default::default()
                },
                ..Default::default()
            },
            documents: Vec::new(),
        };

        let renderer = renderer();
        let pages = renderer.layout(&snapshot, ReportTemplate::Summary).await;
        assert!((1..=2).contains(&pages.len()));

        let texts = all_text(&pages);
        assert!(texts.iter().any(|t| t == "Asha"));
        assert!(texts.iter().any(|t| t.contains("REG-2024-0007")));
        assert!(texts.iter().any(|t| t == "Essential Information"));

        let values: HashMap<_, _> = field_values(&pages).into_iter().collect();
        assert_eq!(values["Gender"], "Female");
        assert_eq!(values["Age"], "34");
        assert_eq!(values["Health Status"], "Stable");
        assert_eq!(values["Address"], "Pune, Maharashtra");
        assert_eq!(values["Documents"], "None");

        let pdf = renderer
            .render_pdf(&snapshot, ReportTemplate::Summary)
            .await
            .unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn logo_is_embedded_when_decodable() {
        let renderer = ReportRenderer::new(
            "Sunrise",
            Arc::new(FixedLogo(png_bytes())),
            Arc::new(StubFetcher::default()),
            FetchPolicy::default(),
        );
        let pages = renderer.layout(&empty_snapshot(), ReportTemplate::Print).await;
        assert_eq!(pages[0].image_count(), 1);
    }

    #[tokio::test]
    async fn undecodable_logo_falls_back_to_wordmark() {
        let renderer = ReportRenderer::new(
            "Sunrise Care Home",
            Arc::new(FixedLogo(b"not an image".to_vec())),
            Arc::new(StubFetcher::default()),
            FetchPolicy::default(),
        );
        let pages = renderer.layout(&empty_snapshot(), ReportTemplate::Print).await;
        assert_eq!(pages[0].image_count(), 0);
        assert!(pages[0].texts().any(|(t, _)| t == "SC"));
    }

    #[test]
    fn wordmark_initials() {
        assert_eq!(wordmark("sunrise care home"), "SC");
        assert_eq!(wordmark(""), "R");
    }
}
