//! crates/rhyme_workshop_core/src/layout.rs
//!
//! Lays out the exported poem on an abstract drawing canvas. The concrete
//! PDF library lives behind the `Canvas` trait in the api service.
//!
//! All coordinates are millimetres from the top-left corner of the page.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{BorderStyle, FontFamily, PoemDocument, Rgb, StyleDescriptor};
use crate::icons;

const PT_TO_MM: f32 = 25.4 / 72.0;
const MARGIN: f32 = 10.0;
const PAGE_BREAK_MARGIN: f32 = 20.0;
const FOOTER_OFFSET: f32 = 15.0;
const STAR_SIZE: f32 = 10.0;
const STAR_INSET: f32 = 20.0;
const WATERMARK_RADIUS: f32 = 40.0;
const WATERMARK_FADE: f32 = 0.85;
const TAB_WIDTH: usize = 4;

//=========================================================================================
// Canvas Contract
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub family: FontFamily,
    pub style: FontStyle,
    /// Size in points.
    pub size: f32,
}

impl Font {
    pub const fn new(family: FontFamily, style: FontStyle, size: f32) -> Self {
        Self { family, style, size }
    }
}

/// The drawing primitives the composer needs.
pub trait Canvas {
    /// Page width and height.
    fn page_size(&self) -> (f32, f32);
    fn add_page(&mut self);
    fn set_fill_color(&mut self, color: Rgb);
    fn set_draw_color(&mut self, color: Rgb);
    fn set_line_width(&mut self, width: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn fill_polygon(&mut self, points: &[Point]);
    /// Draws `text` with its baseline at `y`.
    fn text(&mut self, x: f32, y: f32, text: &str, font: Font, color: Rgb);
    fn text_width(&self, text: &str, font: Font) -> f32;
}

//=========================================================================================
// Page Decoration
//=========================================================================================

/// Background, watermark and border, drawn at the start of every page.
pub fn draw_header(canvas: &mut dyn Canvas, style: &StyleDescriptor) {
    let (width, height) = canvas.page_size();
    canvas.set_fill_color(style.background);
    canvas.fill_rect(0.0, 0.0, width, height);
    draw_watermark(canvas, style);
    draw_border(canvas, style);
}

/// Draws the style's icon faded towards the background, centred on the page.
///
/// Icons without artwork, or with unusable artwork, are skipped.
pub fn draw_watermark(canvas: &mut dyn Canvas, style: &StyleDescriptor) {
    let Some(icon) = style.icon else {
        return;
    };
    let Some(shapes) = icons::asset(icon).filter(icons::is_drawable) else {
        debug!("No drawable artwork for icon '{}', skipping watermark.", icon.as_str());
        return;
    };

    let (width, height) = canvas.page_size();
    let (cx, cy) = (width / 2.0, height / 2.0);
    canvas.set_fill_color(style.border.blend(style.background, WATERMARK_FADE));
    for shape in shapes {
        let placed: Vec<Point> = shape
            .iter()
            .map(|p| Point::new(cx + p.x * WATERMARK_RADIUS, cy + p.y * WATERMARK_RADIUS))
            .collect();
        canvas.fill_polygon(&placed);
    }
}

pub fn draw_border(canvas: &mut dyn Canvas, style: &StyleDescriptor) {
    let (width, height) = canvas.page_size();
    canvas.set_draw_color(style.border);

    match style.border_style {
        BorderStyle::Simples => {
            canvas.set_line_width(1.0);
            canvas.stroke_rect(5.0, 5.0, width - 10.0, height - 10.0);
        }
        BorderStyle::Dupla => {
            canvas.set_line_width(1.0);
            canvas.stroke_rect(5.0, 5.0, width - 10.0, height - 10.0);
            canvas.set_line_width(0.5);
            canvas.stroke_rect(7.0, 7.0, width - 14.0, height - 14.0);
        }
        BorderStyle::Estrelas => {
            canvas.set_line_width(0.2);
            canvas.set_fill_color(style.border);
            let corners = [
                (STAR_INSET, STAR_INSET),
                (width - STAR_INSET, STAR_INSET),
                (STAR_INSET, height - STAR_INSET),
                (width - STAR_INSET, height - STAR_INSET),
            ];
            for (x, y) in corners {
                canvas.fill_polygon(&icons::star(x, y, STAR_SIZE, STAR_SIZE / 2.5, 5));
            }
        }
    }
}

pub fn footer_text(generated_on: NaiveDate) -> String {
    format!("Gerado pela Oficina de Rimas - {}", generated_on.format("%d/%m/%Y"))
}

//=========================================================================================
// Text Flow
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
    Right,
}

struct Composer<'a> {
    canvas: &'a mut dyn Canvas,
    style: &'a StyleDescriptor,
    footer: String,
    y: f32,
}

impl<'a> Composer<'a> {
    fn new_page(&mut self) {
        self.canvas.add_page();
        draw_header(self.canvas, self.style);

        let (width, height) = self.canvas.page_size();
        let font = Font::new(FontFamily::Helvetica, FontStyle::Italic, 8.0);
        let text_width = self.canvas.text_width(&self.footer, font);
        let baseline = height - FOOTER_OFFSET + baseline_offset(10.0, font);
        self.canvas.text((width - text_width) / 2.0, baseline, &self.footer, font, Rgb::grey(128));

        self.y = MARGIN;
    }

    fn gap(&mut self, height: f32) {
        self.y += height;
    }

    fn paragraph(&mut self, text: &str, font: Font, color: Rgb, line_height: f32, align: Align) {
        let (width, _) = self.canvas.page_size();
        let available = width - 2.0 * MARGIN;
        for source_line in text.split('\n') {
            let wrapped = wrap(&*self.canvas, source_line.trim_end_matches('\r'), font, available);
            for line in wrapped {
                self.line(&line, font, color, line_height, align);
            }
        }
    }

    fn line(&mut self, line: &str, font: Font, color: Rgb, line_height: f32, align: Align) {
        let (width, height) = self.canvas.page_size();
        if self.y + line_height > height - PAGE_BREAK_MARGIN {
            self.new_page();
        }
        if !line.is_empty() {
            let line_width = self.canvas.text_width(line, font);
            let x = match align {
                Align::Left => MARGIN,
                Align::Center => (width - line_width) / 2.0,
                Align::Right => width - MARGIN - line_width,
            };
            let baseline = self.y + baseline_offset(line_height, font);
            self.canvas.text(x, baseline, line, font, color);
        }
        self.y += line_height;
    }
}

/// Baseline position inside a cell of `line_height`, text vertically centred.
fn baseline_offset(line_height: f32, font: Font) -> f32 {
    line_height / 2.0 + 0.3 * font.size * PT_TO_MM
}

/// Greedy word wrap at spaces. Indentation and runs of spaces inside a
/// verse are kept; tabs become `TAB_WIDTH` spaces. Spaces are only dropped
/// where a line is broken. An empty input yields one empty line so blank
/// verses keep their vertical space.
fn wrap(canvas: &dyn Canvas, text: &str, font: Font, available: f32) -> Vec<String> {
    let expanded = text.replace('\t', &" ".repeat(TAB_WIDTH));
    let mut lines = Vec::new();
    let mut current = String::new();

    for token in expanded.split_inclusive(' ') {
        let candidate = format!("{}{}", current, token);
        if canvas.text_width(candidate.trim_end(), font) <= available {
            current = candidate;
            continue;
        }
        if !current.trim().is_empty() {
            lines.push(current.trim_end().to_string());
        }
        current.clear();

        let word = token.trim_end_matches(' ');
        if word.is_empty() {
            continue;
        }
        if canvas.text_width(word, font) <= available {
            current = token.to_string();
        } else {
            // A single word wider than the page is broken by characters.
            for c in word.chars() {
                current.push(c);
                if canvas.text_width(&current, font) > available && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::replace(&mut current, c.to_string()));
                }
            }
            if token.ends_with(' ') {
                current.push(' ');
            }
        }
    }
    if !current.trim().is_empty() || lines.is_empty() {
        lines.push(current.trim_end().to_string());
    }
    lines
}

/// Lays out the full document: title, poem body and author line.
pub fn compose_poem(
    canvas: &mut dyn Canvas,
    style: &StyleDescriptor,
    poem: &PoemDocument,
    generated_on: NaiveDate,
) {
    let mut composer = Composer {
        canvas,
        style,
        footer: footer_text(generated_on),
        y: MARGIN,
    };
    composer.new_page();

    let family = style.font;
    composer.paragraph(
        &poem.title,
        Font::new(family, FontStyle::Bold, 24.0),
        style.title,
        15.0,
        Align::Center,
    );
    composer.gap(20.0);
    composer.paragraph(
        &poem.body,
        Font::new(family, FontStyle::Regular, 12.0),
        style.text,
        10.0,
        Align::Left,
    );
    composer.gap(10.0);
    composer.paragraph(
        &format!("- {}", poem.author),
        Font::new(family, FontStyle::Italic, 14.0),
        style.text,
        10.0,
        Align::Right,
    );
}
