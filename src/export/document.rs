//! PDF export: A4 quote with header block and a two-column table.

use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};
use image::GenericImageView;
use std::path::Path;
use tracing::{debug, warn};

use super::{ExportError, QuoteDocument, RowStyle};
use crate::pricing::round_money;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 20.0;
const MARGIN_RIGHT: f32 = 190.0;
const MARGIN_BOTTOM: f32 = 25.0;
const TOP: f32 = 277.0;
const LINE_HEIGHT: f32 = 6.0;
const BODY_SIZE: f32 = 10.0;
const LOGO_HEIGHT_MM: f32 = 25.0;

const PT_PER_MM: f32 = 72.0 / 25.4;

fn pdf_error(e: impl std::fmt::Display) -> ExportError {
    ExportError::Document(e.to_string())
}

/// Cursor over the current page, adding pages as the table grows
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: TOP,
            pages: 1,
        })
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y - height >= MARGIN_BOTTOM {
            return;
        }
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = TOP;
        self.pages += 1;
    }

    fn text(&mut self, text: &str, size: f32, bold: bool) {
        self.ensure_space(LINE_HEIGHT);
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(text, size, Mm(MARGIN_LEFT), Mm(self.y), font);
        self.y -= LINE_HEIGHT;
    }

    /// Description on the left, amount right-aligned to the margin
    fn row(&mut self, description: &str, amount: Option<&str>, bold: bool) {
        self.ensure_space(LINE_HEIGHT);
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(description, BODY_SIZE, Mm(MARGIN_LEFT), Mm(self.y), font);
        if let Some(amount) = amount {
            let x = MARGIN_RIGHT - text_width_mm(amount, BODY_SIZE);
            self.layer.use_text(amount, BODY_SIZE, Mm(x), Mm(self.y), font);
        }
        self.y -= LINE_HEIGHT;
    }

    fn gap(&mut self, lines: f32) {
        self.y -= LINE_HEIGHT * lines;
    }
}

/// Render the quote as PDF bytes.
///
/// `logo` is drawn in the header when the file exists and decodes; a
/// missing or broken logo never fails the export.
pub fn render_document(quote: &QuoteDocument, logo: Option<&Path>) -> Result<Vec<u8>, ExportError> {
    let writer = layout(quote, logo)?;
    debug!(
        "Rendered quote {} on {} page(s)",
        quote.quote_number, writer.pages
    );
    writer.doc.save_to_bytes().map_err(pdf_error)
}

fn layout(quote: &QuoteDocument, logo: Option<&Path>) -> Result<PageWriter, ExportError> {
    let mut writer = PageWriter::new(&format!("Quote {}", quote.quote_number))?;

    if let Some(path) = logo {
        if draw_logo(&writer, path) {
            writer.y -= LOGO_HEIGHT_MM + LINE_HEIGHT;
        }
    }

    // Business block
    let business = &quote.business;
    writer.text(&business.name, 16.0, true);
    for line in [
        &business.address,
        &business.phone,
        &business.email,
        &business.website,
    ] {
        if !line.is_empty() {
            writer.text(line, BODY_SIZE, false);
        }
    }
    writer.gap(1.0);

    // Customer block
    let customer = &quote.snapshot.customer;
    writer.text("Quote for", BODY_SIZE, true);
    writer.text(&customer.name, BODY_SIZE, false);
    for line in customer.address.lines().filter(|l| !l.trim().is_empty()) {
        writer.text(line.trim(), BODY_SIZE, false);
    }
    if !customer.email.is_empty() {
        writer.text(&customer.email, BODY_SIZE, false);
    }
    writer.gap(1.0);

    writer.text(&format!("Quote number: {}", quote.quote_number), BODY_SIZE, false);
    writer.text(&format!("Date: {}", quote.date), BODY_SIZE, false);
    writer.gap(1.0);

    writer.row("Description", Some("Amount"), true);
    for row in quote.rows() {
        let bold = matches!(
            row.style,
            RowStyle::ServiceTitle | RowStyle::ServiceTotal | RowStyle::Total
        );
        if row.style == RowStyle::ServiceTitle || row.style == RowStyle::Subtotal {
            writer.gap(0.5);
        }
        let amount = row.amount.map(pdf_money);
        writer.row(&row.description, amount.as_deref(), bold);
    }

    Ok(writer)
}

/// Builtin PDF fonts only cover Latin-1, so the euro sign is spelled out
fn pdf_money(amount: rust_decimal::Decimal) -> String {
    format!("EUR {:.2}", round_money(amount, 2))
}

fn draw_logo(writer: &PageWriter, path: &Path) -> bool {
    if !path.exists() {
        return false;
    }

    let decoded = match image::open(path) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!("Failed to load logo {}: {}", path.display(), e);
            return false;
        }
    };
    if decoded.height() == 0 {
        return false;
    }

    // Scale so the logo is LOGO_HEIGHT_MM tall at the image's native 300 dpi
    let dpi = 300.0;
    let native_height_mm = decoded.height() as f32 / dpi * 25.4;
    let scale = LOGO_HEIGHT_MM / native_height_mm;

    Image::from_dynamic_image(&decoded).add_to_layer(
        writer.layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN_LEFT)),
            translate_y: Some(Mm(writer.y - LOGO_HEIGHT_MM)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
    true
}

/// Approximate Helvetica advance width for amount strings
fn text_width_mm(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match c {
            '0'..='9' => 556,
            '.' | ',' | ' ' => 278,
            '-' => 333,
            'E' => 667,
            'U' => 722,
            'R' => 722,
            'A' => 667,
            'm' => 833,
            'o' | 'n' | 'u' => 556,
            't' => 278,
            _ => 556,
        })
        .sum();
    units as f32 / 1000.0 * size / PT_PER_MM
}
