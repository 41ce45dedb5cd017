//! services/api/src/adapters/pdf.rs
//!
//! This module contains the PDF adapter. `PrintPdfCanvas` implements the
//! core `Canvas` on top of `printpdf` builtin fonts, and `PrintPdfRenderer`
//! implements the `PoemRenderer` port with it.

use std::collections::HashMap;

use chrono::Local;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfPageIndex, Point as PdfPoint, Polygon, Rect,
};
use rhyme_workshop_core::domain::{FontFamily, PoemDocument, Rgb, StyleDescriptor};
use rhyme_workshop_core::layout::{compose_poem, Canvas, Font, FontStyle, Point};
use rhyme_workshop_core::ports::{PoemRenderer, PortError, PortResult};
use tracing::debug;

const A4_WIDTH: f32 = 210.0;
const A4_HEIGHT: f32 = 297.0;
const MM_TO_PT: f32 = 72.0 / 25.4;
const PT_TO_MM: f32 = 25.4 / 72.0;
const LAYER_NAME: &str = "Poema";

//=========================================================================================
// The Canvas
//=========================================================================================

/// A `Canvas` that draws into an in-memory `printpdf` document.
pub struct PrintPdfCanvas {
    doc: PdfDocumentReference,
    current: (PdfPageIndex, PdfLayerIndex),
    pages: usize,
    width: f32,
    height: f32,
    fonts: HashMap<(FontFamily, FontStyle), IndirectFontRef>,
    fill: Rgb,
    outline: Rgb,
    line_width: f32,
}

impl PrintPdfCanvas {
    /// Creates an empty A4 document with every builtin font it may need.
    pub fn a4(title: &str) -> Result<Self, printpdf::Error> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(A4_WIDTH), Mm(A4_HEIGHT), LAYER_NAME);

        let mut fonts = HashMap::new();
        for family in [FontFamily::Courier, FontFamily::Helvetica, FontFamily::Times] {
            for style in [FontStyle::Regular, FontStyle::Bold, FontStyle::Italic] {
                let font = doc.add_builtin_font(builtin_font(family, style))?;
                fonts.insert((family, style), font);
            }
        }

        Ok(Self {
            doc,
            current: (page, layer),
            pages: 0,
            width: A4_WIDTH,
            height: A4_HEIGHT,
            fonts,
            fill: Rgb::grey(0),
            outline: Rgb::grey(0),
            line_width: 0.2,
        })
    }

    /// Finishes the document and returns its bytes.
    pub fn into_bytes(self) -> Result<Vec<u8>, printpdf::Error> {
        self.doc.save_to_bytes()
    }

    fn layer(&self) -> printpdf::PdfLayerReference {
        self.doc.get_page(self.current.0).get_layer(self.current.1)
    }

    /// Converts top-left page coordinates to PDF's bottom-left origin.
    fn point(&self, x: f32, y: f32) -> PdfPoint {
        PdfPoint::new(Mm(x), Mm(self.height - y))
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, mode: PaintMode) {
        let rect = Rect::new(Mm(x), Mm(self.height - (y + h)), Mm(x + w), Mm(self.height - y))
            .with_mode(mode);
        let layer = self.layer();
        apply_colours(&layer, self.fill, self.outline, self.line_width);
        layer.add_rect(rect);
    }
}

fn pdf_color(color: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        None,
    ))
}

fn apply_colours(layer: &printpdf::PdfLayerReference, fill: Rgb, outline: Rgb, line_width: f32) {
    layer.set_fill_color(pdf_color(fill));
    layer.set_outline_color(pdf_color(outline));
    layer.set_outline_thickness(line_width * MM_TO_PT);
}

fn builtin_font(family: FontFamily, style: FontStyle) -> BuiltinFont {
    match (family, style) {
        (FontFamily::Courier, FontStyle::Regular) => BuiltinFont::Courier,
        (FontFamily::Courier, FontStyle::Bold) => BuiltinFont::CourierBold,
        (FontFamily::Courier, FontStyle::Italic) => BuiltinFont::CourierOblique,
        (FontFamily::Helvetica, FontStyle::Regular) => BuiltinFont::Helvetica,
        (FontFamily::Helvetica, FontStyle::Bold) => BuiltinFont::HelveticaBold,
        (FontFamily::Helvetica, FontStyle::Italic) => BuiltinFont::HelveticaOblique,
        (FontFamily::Times, FontStyle::Regular) => BuiltinFont::TimesRoman,
        (FontFamily::Times, FontStyle::Bold) => BuiltinFont::TimesBold,
        (FontFamily::Times, FontStyle::Italic) => BuiltinFont::TimesItalic,
    }
}

/// Approximate advance width of `c` in ems for the proportional builtins.
fn glyph_em(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | 'í' | 'ì' | '\'' | '|' => 0.22,
        ' ' | '.' | ',' | ':' | ';' | '!' | 'I' | 'f' | 't' | 'r' => 0.3,
        'm' | 'w' | 'M' | 'W' => 0.83,
        '0'..='9' => 0.556,
        c if c.is_uppercase() => 0.67,
        _ => 0.52,
    }
}

impl Canvas for PrintPdfCanvas {
    fn page_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn add_page(&mut self) {
        self.pages += 1;
        // The document is created with its first page already in place.
        if self.pages > 1 {
            self.current = self.doc.add_page(Mm(self.width), Mm(self.height), LAYER_NAME);
        }
        debug!("Started PDF page {}.", self.pages);
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.fill = color;
    }

    fn set_draw_color(&mut self, color: Rgb) {
        self.outline = color;
    }

    fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.rect(x, y, w, h, PaintMode::Fill);
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.rect(x, y, w, h, PaintMode::Stroke);
    }

    fn fill_polygon(&mut self, points: &[Point]) {
        let ring: Vec<(PdfPoint, bool)> = points
            .iter()
            .map(|p| (self.point(p.x, p.y), false))
            .collect();
        let layer = self.layer();
        apply_colours(&layer, self.fill, self.outline, self.line_width);
        layer.add_polygon(Polygon {
            rings: vec![ring],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn text(&mut self, x: f32, y: f32, text: &str, font: Font, color: Rgb) {
        let Some(font_ref) = self.fonts.get(&(font.family, font.style)) else {
            return;
        };
        let layer = self.layer();
        layer.set_fill_color(pdf_color(color));
        layer.use_text(text, font.size, Mm(x), Mm(self.height - y), font_ref);
    }

    fn text_width(&self, text: &str, font: Font) -> f32 {
        let ems: f32 = match font.family {
            FontFamily::Courier => text.chars().count() as f32 * 0.6,
            FontFamily::Helvetica => text.chars().map(glyph_em).sum(),
            FontFamily::Times => text.chars().map(glyph_em).sum::<f32>() * 0.92,
        };
        let bold = if font.style == FontStyle::Bold { 1.06 } else { 1.0 };
        ems * bold * font.size * PT_TO_MM
    }
}

//=========================================================================================
// `PoemRenderer` Trait Implementation
//=========================================================================================

/// Renders poems to A4 PDF documents, entirely in memory.
#[derive(Clone, Default)]
pub struct PrintPdfRenderer;

impl PrintPdfRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl PoemRenderer for PrintPdfRenderer {
    fn render(&self, poem: &PoemDocument, style: &StyleDescriptor) -> PortResult<Vec<u8>> {
        let mut canvas =
            PrintPdfCanvas::a4(&poem.title).map_err(|e| PortError::Unexpected(e.to_string()))?;
        compose_poem(&mut canvas, style, poem, Local::now().date_naive());
        canvas
            .into_bytes()
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}
