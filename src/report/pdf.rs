//! printpdf backend: draws finished pages.
//!
//! Layout works top-down in points; PDF space is bottom-up in millimetres.

use std::io::BufWriter;

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfLayerReference, Rect, Rgb as PdfRgb,
};

use super::layout::{Block, Page, Rgb, PAGE_HEIGHT, PAGE_WIDTH};
use super::ReportError;

const PT_TO_MM: f32 = 25.4 / 72.0;
/// Resolution images are placed at before scaling.
const IMAGE_DPI: f32 = 300.0;

fn mm(points: f32) -> Mm {
    Mm(points * PT_TO_MM)
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(PdfRgb::new(
        rgb.0 as f32 / 255.0,
        rgb.1 as f32 / 255.0,
        rgb.2 as f32 / 255.0,
        None,
    ))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Serialize `pages` to PDF bytes. An empty page list yields one blank page.
///
/// Text uses the builtin Helvetica fonts, which only cover WinAnsi
/// (Latin-1). Names in other scripts, such as Devanagari, do not render
/// correctly until a Unicode TTF is embedded with `add_external_font`.
pub fn write_pdf(title: &str, pages: &[Page]) -> Result<Vec<u8>, ReportError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1");
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Pdf(format!("font error: {e}")))?,
    };

    for (index, page) in pages.iter().enumerate() {
        let (page_ref, layer_ref) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), "Layer 1")
        };
        let layer = doc.get_page(page_ref).get_layer(layer_ref);
        for block in &page.blocks {
            draw_block(&layer, block, &fonts);
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ReportError::Pdf(format!("buffer error: {e}")))
}

fn draw_block(layer: &PdfLayerReference, block: &Block, fonts: &Fonts) {
    match block {
        Block::Text {
            x,
            y,
            text,
            style,
            color: rgb,
        } => {
            let font = if style.bold() { &fonts.bold } else { &fonts.regular };
            layer.set_fill_color(color(*rgb));
            layer.use_text(text.as_str(), style.size(), mm(*x), mm(PAGE_HEIGHT - *y), font);
        }
        Block::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        } => {
            let mode = match (fill, stroke) {
                (Some(_), Some(_)) => PaintMode::FillStroke,
                (Some(_), None) => PaintMode::Fill,
                (None, Some(_)) => PaintMode::Stroke,
                (None, None) => return,
            };
            if let Some(rgb) = fill {
                layer.set_fill_color(color(*rgb));
            }
            if let Some(rgb) = stroke {
                layer.set_outline_color(color(*rgb));
                layer.set_outline_thickness(0.6);
            }
            let rect = Rect::new(
                mm(*x),
                mm(PAGE_HEIGHT - *y - *height),
                mm(*x + *width),
                mm(PAGE_HEIGHT - *y),
            )
            .with_mode(mode);
            layer.add_rect(rect);
        }
        Block::Image {
            x,
            y,
            width,
            height,
            image,
        } => {
            // Natural size at IMAGE_DPI, in points
            let natural_w = image.width().max(1) as f32 * 72.0 / IMAGE_DPI;
            let natural_h = image.height().max(1) as f32 * 72.0 / IMAGE_DPI;
            Image::from_dynamic_image(image.as_ref()).add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(mm(*x)),
                    translate_y: Some(mm(PAGE_HEIGHT - *y - *height)),
                    scale_x: Some(*width / natural_w),
                    scale_y: Some(*height / natural_h),
                    dpi: Some(IMAGE_DPI),
                    ..Default::default()
                },
            );
        }
    }
}
