//! Page model and layout primitives.
//!
//! Rendering is two-phase. Phase 1 (`Canvas`) places styled blocks on a
//! buffered list of pages with a top-down cursor measured in points.
//! Phase 2 (`stamp_footers`) runs once the page list is final and writes
//! `Page i of N` onto every page. The PDF backend only ever sees finished
//! pages.
//!
//! Text height is estimated from character counts, not font metrics.

use std::sync::Arc;

use printpdf::image_crate::DynamicImage;

/// A4 portrait, in points.
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const MARGIN: f32 = 50.0;
/// Bottom edge of the printable area is `PAGE_HEIGHT - BOTTOM_MARGIN`;
/// the footer lives below it.
pub const BOTTOM_MARGIN: f32 = 70.0;
/// A cursor at or above this offset is still in the page's opening region
/// and never triggers a page break.
pub const OPENING_REGION: f32 = 100.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
pub const LINE_HEIGHT: f32 = 12.0;
pub const SECTION_HEADER_HEIGHT: f32 = 30.0;

const PAIR_GAP: f32 = 10.0;
const LABEL_BAND: f32 = 13.0;
const BOX_PADDING: f32 = 6.0;
/// Average glyph width as a fraction of font size (Helvetica).
const AVG_GLYPH_WIDTH: f32 = 0.5;
const PARAGRAPH_INDENT: f32 = 4.0;
const PARAGRAPH_WIDTH: f32 = CONTENT_WIDTH - PARAGRAPH_INDENT;

pub const PLACEHOLDER: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BRAND: Rgb = Rgb(0x1F, 0x4E, 0x79);
pub const BRAND_LIGHT: Rgb = Rgb(0xE8, 0xEF, 0xF7);
pub const INK: Rgb = Rgb(0x22, 0x22, 0x22);
pub const MUTED: Rgb = Rgb(0x6B, 0x72, 0x80);
pub const BORDER: Rgb = Rgb(0xC8, 0xCE, 0xD6);
pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Heading,
    Label,
    Value,
    Body,
    Caption,
    Footer,
}

impl TextStyle {
    pub fn size(&self) -> f32 {
        match self {
            TextStyle::Title => 16.0,
            TextStyle::Heading => 11.0,
            TextStyle::Label => 7.5,
            TextStyle::Value => 9.5,
            TextStyle::Body => 9.0,
            TextStyle::Caption => 8.0,
            TextStyle::Footer => 7.5,
        }
    }

    pub fn bold(&self) -> bool {
        matches!(self, TextStyle::Title | TextStyle::Heading | TextStyle::Label)
    }
}

/// A positioned drawing instruction. `y` is measured from the top of the page;
/// for text it is the baseline, for boxes and images the top edge.
#[derive(Debug, Clone)]
pub enum Block {
    Text {
        x: f32,
        y: f32,
        text: String,
        style: TextStyle,
        color: Rgb,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    },
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        image: Arc<DynamicImage>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub blocks: Vec<Block>,
}

impl Page {
    /// Text blocks in emission order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, TextStyle)> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Text { text, style, .. } => Some((text.as_str(), *style)),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|(t, _)| t.contains(needle))
    }

    pub fn image_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, Block::Image { .. }))
            .count()
    }
}

/// Vertical rhythm of a template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    /// Height of a one-line field box.
    pub field_height: f32,
    /// Gap below each field (or field pair).
    pub field_gap: f32,
}

impl Spacing {
    pub const REGULAR: Spacing = Spacing {
        field_height: 30.0,
        field_gap: 6.0,
    };
    pub const COMPACT: Spacing = Spacing {
        field_height: 24.0,
        field_gap: 3.0,
    };
}

#[derive(Debug, Clone, Copy)]
pub struct FieldOptions {
    pub multiline: bool,
    /// Characters assumed to fit on one wrapped line.
    pub chars_per_line: usize,
}

/// Phase 1 output buffer: pages plus the drawing primitives.
pub struct Canvas {
    pages: Vec<Page>,
    spacing: Spacing,
}

impl Canvas {
    pub fn new(spacing: Spacing) -> Self {
        Self {
            pages: vec![Page::default()],
            spacing,
        }
    }

    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Start a new page and return the cursor at its top margin.
    pub fn new_page(&mut self) -> f32 {
        self.pages.push(Page::default());
        MARGIN
    }

    pub fn push(&mut self, block: Block) {
        if let Some(page) = self.pages.last_mut() {
            page.blocks.push(block);
        }
    }

    pub fn text(&mut self, x: f32, y: f32, text: impl Into<String>, style: TextStyle, color: Rgb) {
        self.push(Block::Text {
            x,
            y,
            text: text.into(),
            style,
            color,
        });
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: Option<Rgb>, stroke: Option<Rgb>) {
        self.push(Block::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        });
    }

    /// Break to a new page when `required` points do not fit below `y`,
    /// unless the cursor is still in the page's opening region.
    pub fn check_page_break(&mut self, y: f32, required: f32) -> f32 {
        if y + required > printable_bottom() && y > OPENING_REGION {
            self.new_page()
        } else {
            y
        }
    }

    pub fn render_section_header(&mut self, title: &str, y: f32) -> f32 {
        self.rect(MARGIN, y, CONTENT_WIDTH, 20.0, Some(BRAND), None);
        self.text(MARGIN + 8.0, y + 14.0, title, TextStyle::Heading, WHITE);
        y + SECTION_HEADER_HEIGHT
    }

    /// Labelled value box across the full content width.
    ///
    /// Absent or blank values print as `N/A`. Multiline values longer than
    /// one line grow the box by the estimated wrapped line count and continue
    /// on following pages when the box does not fit.
    pub fn render_field(&mut self, label: &str, value: Option<&str>, y: f32, options: &FieldOptions) -> f32 {
        let value = display_value(value);
        let char_count = value.chars().count();

        if !options.multiline || char_count <= options.chars_per_line {
            let clipped = clip_to_width(&value, CONTENT_WIDTH - 2.0 * BOX_PADDING, TextStyle::Value);
            self.field_box(MARGIN, y, CONTENT_WIDTH, self.spacing.field_height, label, &[clipped]);
            return y + self.spacing.field_height + self.spacing.field_gap;
        }

        let chars_per_line = options.chars_per_line.max(1);
        let estimated = char_count.div_ceil(chars_per_line);
        let wrapped = wrap_text(&value, chars_per_line);
        let mut extra_lines = estimated.saturating_sub(wrapped.len());

        let mut remaining: &[String] = &wrapped;
        let mut y = y;
        let mut first = true;
        loop {
            let available = printable_bottom() - y - LABEL_BAND - 2.0 * BOX_PADDING;
            let mut fit = (available / LINE_HEIGHT).floor().max(0.0) as usize;
            if fit == 0 {
                if y <= MARGIN {
                    fit = 1;
                } else {
                    y = self.new_page();
                    continue;
                }
            }

            let take = fit.min(remaining.len());
            let (chunk, rest) = remaining.split_at(take);
            let padding_lines = if rest.is_empty() {
                let pad = extra_lines.min(fit - take);
                extra_lines = 0;
                pad
            } else {
                0
            };
            let height = LABEL_BAND + (take + padding_lines) as f32 * LINE_HEIGHT + 2.0 * BOX_PADDING;
            let shown_label = if first {
                label.to_string()
            } else {
                format!("{label} (cont.)")
            };
            self.field_box(MARGIN, y, CONTENT_WIDTH, height, &shown_label, chunk);

            if rest.is_empty() {
                return y + height + self.spacing.field_gap;
            }
            remaining = rest;
            first = false;
            y = self.new_page();
        }
    }

    /// Two one-line fields side by side.
    pub fn render_field_pair(
        &mut self,
        label_a: &str,
        value_a: Option<&str>,
        label_b: &str,
        value_b: Option<&str>,
        y: f32,
    ) -> f32 {
        let width = (CONTENT_WIDTH - PAIR_GAP) / 2.0;
        let height = self.spacing.field_height;
        for (i, (label, value)) in [(label_a, value_a), (label_b, value_b)].into_iter().enumerate() {
            let x = MARGIN + i as f32 * (width + PAIR_GAP);
            let shown = clip_to_width(&display_value(value), width - 2.0 * BOX_PADDING, TextStyle::Value);
            self.field_box(x, y, width, height, label, &[shown]);
        }
        y + height + self.spacing.field_gap
    }

    /// Free text wrapped to the content width, breaking pages between lines.
    pub fn render_paragraph(&mut self, text: &str, y: f32, style: TextStyle) -> f32 {
        let mut y = y;
        for line in wrap_text(text, chars_for_width(PARAGRAPH_WIDTH, style)) {
            y = self.check_page_break(y, LINE_HEIGHT);
            self.text(MARGIN + PARAGRAPH_INDENT, y + style.size(), line, style, INK);
            y += LINE_HEIGHT;
        }
        y + 4.0
    }

    /// Phase 1 result.
    pub fn finish(self) -> Vec<Page> {
        self.pages
    }

    fn field_box(&mut self, x: f32, y: f32, width: f32, height: f32, label: &str, lines: &[String]) {
        self.rect(x, y, width, height, None, Some(BORDER));
        self.text(x + BOX_PADDING, y + 10.0, label, TextStyle::Label, MUTED);
        let mut baseline = y + LABEL_BAND + TextStyle::Value.size();
        for line in lines {
            self.text(x + BOX_PADDING, baseline, line.clone(), TextStyle::Value, INK);
            baseline += LINE_HEIGHT;
        }
    }
}

/// Footer content shared by every page.
#[derive(Debug, Clone)]
pub struct FooterText {
    pub org_name: String,
    pub generated_at: String,
}

/// Phase 2: stamp a two-line footer with the final page count on every page.
pub fn stamp_footers(pages: &mut [Page], footer: &FooterText) {
    let total = pages.len();
    for (index, page) in pages.iter_mut().enumerate() {
        let top = PAGE_HEIGHT - BOTTOM_MARGIN + 20.0;
        page.blocks.push(Block::Rect {
            x: MARGIN,
            y: top,
            width: CONTENT_WIDTH,
            height: 0.6,
            fill: Some(BORDER),
            stroke: None,
        });
        page.blocks.push(Block::Text {
            x: MARGIN,
            y: top + 12.0,
            text: format!("{} | Confidential resident record", footer.org_name),
            style: TextStyle::Footer,
            color: MUTED,
        });
        page.blocks.push(Block::Text {
            x: MARGIN,
            y: top + 23.0,
            text: format!("Generated {}", footer.generated_at),
            style: TextStyle::Footer,
            color: MUTED,
        });
        page.blocks.push(Block::Text {
            x: PAGE_WIDTH - MARGIN - 60.0,
            y: top + 23.0,
            text: format!("Page {} of {}", index + 1, total),
            style: TextStyle::Footer,
            color: MUTED,
        });
    }
}

pub fn printable_bottom() -> f32 {
    PAGE_HEIGHT - BOTTOM_MARGIN
}

/// Value as printed: trimmed, or the placeholder when absent/blank.
pub fn display_value(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Characters of `style` that fit `width` points, at the average glyph width.
pub fn chars_for_width(width: f32, style: TextStyle) -> usize {
    (width / (style.size() * AVG_GLYPH_WIDTH)).floor().max(4.0) as usize
}

/// Clip to the number of characters that fit `width` points at `style`.
pub fn clip_to_width(text: &str, width: f32, style: TextStyle) -> String {
    let max_chars = chars_for_width(width, style);
    let single_line: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let mut clipped: String = single_line.chars().take(max_chars - 3).collect();
    clipped.push_str("...");
    clipped
}

/// Word wrap at `max_chars`; words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: String = word.to_string();
        while word.chars().count() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let head: String = word.chars().take(max_chars).collect();
            word = word.chars().skip(max_chars).collect();
            lines.push(head);
        }
        if current.chars().count() + word.chars().count() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(multiline: bool) -> FieldOptions {
        FieldOptions {
            multiline,
            chars_per_line: 45,
        }
    }

    fn values(page: &Page) -> Vec<&str> {
        page.texts()
            .filter(|(_, s)| *s == TextStyle::Value)
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn missing_value_renders_placeholder() {
        let mut canvas = Canvas::new(Spacing::REGULAR);
        canvas.render_field("Religion", None, 120.0, &options(false));
        canvas.render_field("Caste", Some("   "), 160.0, &options(false));
        let pages = canvas.finish();
        assert_eq!(values(&pages[0]), ["N/A", "N/A"]);
    }

    #[test]
    fn single_line_field_advances_fixed_height() {
        let mut canvas = Canvas::new(Spacing::REGULAR);
        let next = canvas.render_field("Name", Some("Asha"), 200.0, &options(false));
        assert_eq!(next, 200.0 + 30.0 + 6.0);
    }

    #[test]
    fn non_multiline_value_is_clipped() {
        let mut canvas = Canvas::new(Spacing::REGULAR);
        let long = "x".repeat(500);
        let next = canvas.render_field("Notes", Some(&long), 200.0, &options(false));
        assert_eq!(next, 236.0);
        let pages = canvas.finish();
        let shown = values(&pages[0])[0];
        assert!(shown.ends_with("..."));
        assert!(shown.len() < 500);
    }

    #[test]
    fn multiline_field_grows_with_estimated_lines() {
        let mut canvas = Canvas::new(Spacing::REGULAR);
        let text = "word ".repeat(40); // 200 chars -> ceil(199/45) = 5 lines
        let next = canvas.render_field("History", Some(&text), 200.0, &options(true));
        let expected_height = LABEL_BAND + 5.0 * LINE_HEIGHT + 2.0 * BOX_PADDING;
        assert_eq!(next, 200.0 + expected_height + 6.0);
    }

    #[test]
    fn short_multiline_value_stays_one_line() {
        let mut canvas = Canvas::new(Spacing::REGULAR);
        let next = canvas.render_field("History", Some("Diabetic"), 200.0, &options(true));
        assert_eq!(next, 236.0);
    }

    #[test]
    fn multiline_field_continues_on_next_page() {
        let mut canvas = Canvas::new(Spacing::REGULAR);
        let text = "lorem ipsum dolor sit amet ".repeat(200);
        canvas.render_field("Notes", Some(&text), 600.0, &options(true));
        assert!(canvas.page_count() >= 3);
        let pages = canvas.finish();
        assert!(pages[1].contains_text("Notes (cont.)"));
    }

    #[test]
    fn field_pair_is_one_line_high() {
        let mut canvas = Canvas::new(Spacing::COMPACT);
        let next = canvas.render_field_pair("Gender", Some("Female"), "Age", None, 300.0);
        assert_eq!(next, 300.0 + 24.0 + 3.0);
        let pages = canvas.finish();
        assert_eq!(values(&pages[0]), ["Female", "N/A"]);
    }

    #[test]
    fn page_break_when_space_runs_out() {
        let mut canvas = Canvas::new(Spacing::REGULAR);
        let y = canvas.check_page_break(750.0, 40.0);
        assert_eq!(y, MARGIN);
        assert_eq!(canvas.page_count(), 2);
    }

    #[test]
    fn no_page_break_when_space_remains() {
        let mut canvas = Canvas::new(Spacing::REGULAR);
        assert_eq!(canvas.check_page_break(300.0, 40.0), 300.0);
        assert_eq!(canvas.page_count(), 1);
    }

    #[test]
    fn no_page_break_in_opening_region() {
        let mut canvas = Canvas::new(Spacing::REGULAR);
        // Requirement larger than the page, but nothing drawn yet
        assert_eq!(canvas.check_page_break(80.0, 2000.0), 80.0);
        assert_eq!(canvas.page_count(), 1);
    }

    #[test]
    fn paragraph_wraps_at_content_width() {
        let mut canvas = Canvas::new(Spacing::REGULAR);
        let note = "This document type (application/msword) cannot be displayed inline.";
        let y = canvas.render_paragraph(note, 200.0, TextStyle::Body);
        assert_eq!(y, 200.0 + LINE_HEIGHT + 4.0);
        let pages = canvas.finish();
        assert!(pages[0].texts().any(|(t, _)| t == note));

        let mut canvas = Canvas::new(Spacing::REGULAR);
        let long = "word ".repeat(60);
        canvas.render_paragraph(&long, 200.0, TextStyle::Body);
        let pages = canvas.finish();
        let lines: Vec<_> = pages[0].texts().map(|(t, _)| t.to_string()).collect();
        assert!(lines.len() > 1);
        let max = chars_for_width(PARAGRAPH_WIDTH, TextStyle::Body);
        assert!(lines.iter().all(|l| l.chars().count() <= max));
    }

    #[test]
    fn section_header_advances_fixed_offset() {
        let mut canvas = Canvas::new(Spacing::REGULAR);
        assert_eq!(canvas.render_section_header("Health", 140.0), 170.0);
        let pages = canvas.finish();
        assert!(pages[0]
            .texts()
            .any(|(t, s)| t == "Health" && s == TextStyle::Heading));
    }

    #[test]
    fn footers_use_final_page_count() {
        let mut canvas = Canvas::new(Spacing::REGULAR);
        canvas.new_page();
        canvas.new_page();
        let mut pages = canvas.finish();
        stamp_footers(
            &mut pages,
            &FooterText {
                org_name: "Sunrise".into(),
                generated_at: "01 Jan 2024 10:00 UTC".into(),
            },
        );
        for (i, page) in pages.iter().enumerate() {
            assert!(page.contains_text(&format!("Page {} of 3", i + 1)));
            assert!(page.contains_text("Sunrise | Confidential resident record"));
        }
    }

    #[test]
    fn wrap_text_splits_long_words() {
        let lines = wrap_text(&"a".repeat(100), 40);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.chars().count() <= 40));
    }

    #[test]
    fn wrap_text_respects_width() {
        let text = "This is a long sentence that should be wrapped at around forty characters or so.";
        let lines = wrap_text(text, 40);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 40));
    }

    #[test]
    fn wrap_text_empty() {
        assert_eq!(wrap_text("", 40), vec![String::new()]);
    }
}
