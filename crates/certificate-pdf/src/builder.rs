//! Single-page drawing context
//!
//! [`PageBuilder`] records content-stream operations for one page and the
//! resources they reference, then serializes everything into a fresh
//! `lopdf::Document` in [`PageBuilder::finish`]. A builder is consumed by
//! `finish`, so drawing state can never carry over to another document.
//!
//! All public coordinates are layout millimeters (top-left origin).

use crate::error::CertificateError;
use crate::fonts::FontStyle;
use crate::seal::SealImage;
use crate::text::{encode_win_ansi, text_width_mm};
use crate::units::{layout_to_pdf, media_box, mm_to_pt, pt_to_mm};
use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use std::collections::{BTreeMap, BTreeSet};

/// Bezier control point distance for a quarter circle
const KAPPA: f64 = 0.552_284_75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    fn operands(&self) -> Vec<Object> {
        vec![
            channel(self.0),
            channel(self.1),
            channel(self.2),
        ]
    }
}

fn channel(value: u8) -> Object {
    real(value as f64 / 255.0)
}

/// Round to 1/100 so content streams stay readable and stable
fn real(value: f64) -> Object {
    Object::Real(((value * 100.0).round() / 100.0) as f32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Tracked graphics state, mirrored by `q`/`Q` in the content stream.
/// Starts at the PDF defaults so unchanged settings emit no operator.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    pub font: FontStyle,
    pub font_size: f64,
    pub text_color: Rgb,
    pub draw_color: Rgb,
    pub line_width_mm: f64,
    pub opacity: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            font: FontStyle::Normal,
            font_size: 12.0,
            text_color: Rgb::BLACK,
            draw_color: Rgb::BLACK,
            line_width_mm: pt_to_mm(1.0),
            opacity: 1.0,
        }
    }
}

/// Document information dictionary entries
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub created: NaiveDate,
}

#[derive(Debug, Default)]
pub struct PageBuilder {
    operations: Vec<Operation>,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
    fonts: BTreeSet<FontStyle>,
    opacities: BTreeMap<String, f64>,
    images: BTreeMap<String, SealImage>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_font(&mut self, font: FontStyle, size: f64) {
        self.state.font = font;
        self.state.font_size = size;
    }

    pub fn set_text_color(&mut self, color: Rgb) {
        if self.state.text_color != color {
            self.state.text_color = color;
            self.push("rg", color.operands());
        }
    }

    pub fn set_draw_color(&mut self, color: Rgb) {
        if self.state.draw_color != color {
            self.state.draw_color = color;
            self.push("RG", color.operands());
        }
    }

    pub fn set_line_width(&mut self, width_mm: f64) {
        if self.state.line_width_mm != width_mm {
            self.state.line_width_mm = width_mm;
            self.push("w", vec![real(mm_to_pt(width_mm))]);
        }
    }

    /// Set fill and stroke alpha through an ExtGState resource
    pub fn set_opacity(&mut self, opacity: f64) {
        let opacity = opacity.clamp(0.0, 1.0);
        let name = format!("GS{}", (opacity * 100.0).round() as u32);
        self.opacities.insert(name.clone(), opacity);
        self.state.opacity = opacity;
        self.push("gs", vec![Object::Name(name.into_bytes())]);
    }

    pub fn save_graphics_state(&mut self) {
        self.saved.push(self.state.clone());
        self.push("q", vec![]);
    }

    /// Pop the last saved state. Unbalanced restores are ignored.
    pub fn restore_graphics_state(&mut self) {
        match self.saved.pop() {
            Some(state) => {
                self.state = state;
                self.push("Q", vec![]);
            }
            None => tracing::warn!("restore_graphics_state without matching save"),
        }
    }

    /// Draw one line of text with its baseline at `y`. Empty text draws nothing.
    pub fn text(&mut self, text: &str, x: f64, y: f64, align: Align) {
        if text.is_empty() {
            return;
        }

        let width = text_width_mm(text, self.state.font, self.state.font_size);
        let x = match align {
            Align::Left => x,
            Align::Center => x - width / 2.0,
        };
        self.show_text(text, x, y, None);
    }

    /// Draw pre-wrapped lines, each `line_height` below the previous
    pub fn text_lines(&mut self, lines: &[String], x: f64, y: f64, line_height: f64, align: Align) {
        for (i, line) in lines.iter().enumerate() {
            self.text(line, x, y + i as f64 * line_height, align);
        }
    }

    /// Draw pre-wrapped lines stretched to `width` through word spacing.
    /// The last line stays ragged.
    pub fn justified_lines(&mut self, lines: &[String], x: f64, y: f64, line_height: f64, width: f64) {
        for (i, line) in lines.iter().enumerate() {
            let line_y = y + i as f64 * line_height;
            let gaps = line.matches(' ').count();
            if i + 1 == lines.len() || gaps == 0 {
                self.text(line, x, line_y, Align::Left);
                continue;
            }

            let slack = width - text_width_mm(line, self.state.font, self.state.font_size);
            let spacing = mm_to_pt(slack.max(0.0)) / gaps as f64;
            self.show_text(line, x, line_y, Some(spacing));
        }
    }

    fn show_text(&mut self, text: &str, x: f64, y: f64, word_spacing: Option<f64>) {
        if text.is_empty() {
            return;
        }

        let (font, font_size) = (self.state.font, self.state.font_size);
        let (px, py) = layout_to_pdf(x, y);

        self.fonts.insert(font);
        self.push("BT", vec![]);
        self.push(
            "Tf",
            vec![
                Object::Name(font.resource_name().as_bytes().to_vec()),
                real(font_size),
            ],
        );
        self.push("Td", vec![real(px), real(py)]);
        if let Some(spacing) = word_spacing {
            self.push("Tw", vec![real(spacing)]);
        }
        self.push(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        );
        // Tw is text state and outlives ET
        if word_spacing.is_some() {
            self.push("Tw", vec![real(0.0)]);
        }
        self.push("ET", vec![]);
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let (ax, ay) = layout_to_pdf(x1, y1);
        let (bx, by) = layout_to_pdf(x2, y2);
        self.push("m", vec![real(ax), real(ay)]);
        self.push("l", vec![real(bx), real(by)]);
        self.push("S", vec![]);
    }

    /// Stroked rectangle with its top-left corner at (x, y)
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (px, py) = layout_to_pdf(x, y + height);
        self.push(
            "re",
            vec![real(px), real(py), real(mm_to_pt(width)), real(mm_to_pt(height))],
        );
        self.push("S", vec![]);
    }

    /// Stroked circle approximated by four cubic Bezier segments
    pub fn circle(&mut self, cx: f64, cy: f64, radius: f64) {
        let (x, y) = layout_to_pdf(cx, cy);
        let r = mm_to_pt(radius);
        let k = r * KAPPA;

        self.push("m", vec![real(x + r), real(y)]);
        let quarters = [
            [x + r, y + k, x + k, y + r, x, y + r],
            [x - k, y + r, x - r, y + k, x - r, y],
            [x - r, y - k, x - k, y - r, x, y - r],
            [x + k, y - r, x + r, y - k, x + r, y],
        ];
        for points in quarters {
            self.push("c", points.iter().map(|&v| real(v)).collect());
        }
        self.push("h", vec![]);
        self.push("S", vec![]);
    }

    /// Register an image XObject and return its resource name
    pub fn add_image(&mut self, image: SealImage) -> String {
        let name = format!("Im{}", self.images.len() + 1);
        self.images.insert(name.clone(), image);
        name
    }

    /// Paint a registered image into the box with top-left corner (x, y)
    pub fn image(&mut self, name: &str, x: f64, y: f64, width: f64, height: f64) {
        let (px, py) = layout_to_pdf(x, y + height);
        self.push("q", vec![]);
        self.push(
            "cm",
            vec![
                real(mm_to_pt(width)),
                real(0.0),
                real(0.0),
                real(mm_to_pt(height)),
                real(px),
                real(py),
            ],
        );
        self.push("Do", vec![Object::Name(name.as_bytes().to_vec())]);
        self.push("Q", vec![]);
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    /// Serialize the page into a new single-page PDF
    pub fn finish(mut self, info: &DocumentInfo) -> Result<Vec<u8>, CertificateError> {
        while !self.saved.is_empty() {
            tracing::warn!("closing unbalanced graphics state at finish");
            self.restore_graphics_state();
        }

        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut resources = Dictionary::new();
        if !self.fonts.is_empty() {
            let mut fonts = Dictionary::new();
            for font in &self.fonts {
                fonts.set(
                    font.resource_name(),
                    Object::Dictionary(dictionary! {
                        "Type" => "Font",
                        "Subtype" => "Type1",
                        "BaseFont" => font.base_font(),
                        "Encoding" => "WinAnsiEncoding",
                    }),
                );
            }
            resources.set("Font", Object::Dictionary(fonts));
        }
        if !self.opacities.is_empty() {
            let mut states = Dictionary::new();
            for (name, opacity) in &self.opacities {
                states.set(
                    name.as_str(),
                    Object::Dictionary(dictionary! {
                        "Type" => "ExtGState",
                        "ca" => real(*opacity),
                        "CA" => real(*opacity),
                    }),
                );
            }
            resources.set("ExtGState", Object::Dictionary(states));
        }
        if !self.images.is_empty() {
            let mut xobjects = Dictionary::new();
            for (name, image) in &self.images {
                let image_id = add_image_object(&mut doc, image);
                xobjects.set(name.as_str(), Object::Reference(image_id));
            }
            resources.set("XObject", Object::Dictionary(xobjects));
        }

        let content = Content {
            operations: self.operations,
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

        let [x0, y0, x1, y1] = media_box();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![real(x0), real(y0), real(x1), real(y1)],
            "Contents" => Object::Reference(content_id),
            "Resources" => Object::Dictionary(resources),
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let info_id = doc.add_object(info_dictionary(info));
        doc.trailer.set("Info", Object::Reference(info_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}

fn add_image_object(doc: &mut Document, image: &SealImage) -> lopdf::ObjectId {
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => image.width as i64,
        "Height" => image.height as i64,
        "ColorSpace" => image.color_space.pdf_name(),
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };

    if let Some(mask) = &image.soft_mask {
        let mask_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            mask.clone(),
        ));
        dict.set("SMask", Object::Reference(mask_id));
    }

    doc.add_object(Stream::new(dict, image.data.clone()))
}

fn info_dictionary(info: &DocumentInfo) -> Dictionary {
    let text = |value: &str| Object::String(encode_win_ansi(value), StringFormat::Literal);
    let created = format!("D:{}000000", info.created.format("%Y%m%d"));

    dictionary! {
        "Title" => text(&info.title),
        "Author" => text(&info.author),
        "Subject" => text(&info.subject),
        "Creator" => text("barangay-cert"),
        "Producer" => text(concat!("certificate-pdf ", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => Object::String(created.into_bytes(), StringFormat::Literal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info() -> DocumentInfo {
        DocumentInfo {
            title: "Test".to_string(),
            author: "Barangay San Juan".to_string(),
            subject: "Unit test".to_string(),
            created: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
        }
    }

    fn operators(builder: &PageBuilder) -> Vec<&str> {
        builder
            .operations
            .iter()
            .map(|op| op.operator.as_str())
            .collect()
    }

    #[test]
    fn test_text_emits_text_object() {
        let mut builder = PageBuilder::new();
        builder.set_font(FontStyle::Bold, 14.0);
        builder.text("Hello", 20.0, 30.0, Align::Left);
        assert_eq!(operators(&builder), vec!["BT", "Tf", "Td", "Tj", "ET"]);
        assert!(builder.fonts.contains(&FontStyle::Bold));
    }

    #[test]
    fn test_justified_lines_reset_word_spacing() {
        let mut builder = PageBuilder::new();
        builder.set_font(FontStyle::Normal, 11.0);
        let lines = vec!["one two three".to_string(), "four".to_string()];
        builder.justified_lines(&lines, 20.0, 88.0, 6.0, 120.0);
        assert_eq!(
            operators(&builder),
            vec!["BT", "Tf", "Td", "Tw", "Tj", "Tw", "ET", "BT", "Tf", "Td", "Tj", "ET"]
        );
        match builder.operations[3].operands[0] {
            Object::Real(spacing) => assert!(spacing > 0.0),
            ref other => panic!("unexpected operand {:?}", other),
        }
    }

    #[test]
    fn test_empty_text_draws_nothing() {
        let mut builder = PageBuilder::new();
        builder.text("", 20.0, 30.0, Align::Center);
        assert!(builder.operations.is_empty());
        assert!(builder.fonts.is_empty());
    }

    #[test]
    fn test_center_alignment_offsets_by_half_width() {
        let mut builder = PageBuilder::new();
        builder.set_font(FontStyle::Normal, 10.0);
        builder.text("WW", 105.0, 50.0, Align::Center);
        let td = &builder.operations[2];
        let expected = mm_to_pt(105.0 - text_width_mm("WW", FontStyle::Normal, 10.0) / 2.0);
        match td.operands[0] {
            Object::Real(x) => assert!((x as f64 - expected).abs() < 0.01),
            ref other => panic!("unexpected operand {:?}", other),
        }
    }

    #[test]
    fn test_save_restore_round_trips_state() {
        let mut builder = PageBuilder::new();
        builder.save_graphics_state();
        builder.set_opacity(0.1);
        builder.set_text_color(Rgb(200, 200, 200));
        assert_eq!(builder.saved.len(), 1);
        assert_eq!(builder.state.opacity, 0.1);

        builder.restore_graphics_state();
        assert!(builder.saved.is_empty());
        assert_eq!(builder.state, GraphicsState::default());
        assert_eq!(operators(&builder), vec!["q", "gs", "rg", "Q"]);
    }

    #[test]
    fn test_unchanged_state_emits_nothing() {
        let mut builder = PageBuilder::new();
        builder.set_text_color(Rgb::BLACK);
        builder.set_draw_color(Rgb::BLACK);
        builder.set_line_width(pt_to_mm(1.0));
        assert!(builder.operations.is_empty());

        builder.set_line_width(0.3);
        builder.set_line_width(0.3);
        builder.set_draw_color(Rgb(200, 200, 200));
        builder.set_draw_color(Rgb(200, 200, 200));
        assert_eq!(operators(&builder), vec!["w", "RG"]);
    }

    #[test]
    fn test_restored_state_is_reemitted() {
        let mut builder = PageBuilder::new();
        builder.save_graphics_state();
        builder.set_text_color(Rgb(200, 200, 200));
        builder.restore_graphics_state();
        // Q reset the fill color to black, so gray must be set again
        builder.set_text_color(Rgb(200, 200, 200));
        assert_eq!(operators(&builder), vec!["q", "rg", "Q", "rg"]);
    }

    #[test]
    fn test_unbalanced_restore_ignored() {
        let mut builder = PageBuilder::new();
        builder.restore_graphics_state();
        assert!(builder.operations.is_empty());
    }

    #[test]
    fn test_circle_is_closed_path() {
        let mut builder = PageBuilder::new();
        builder.circle(105.0, 148.5, 60.0);
        assert_eq!(operators(&builder), vec!["m", "c", "c", "c", "c", "h", "S"]);
    }

    #[test]
    fn test_finish_produces_single_page_pdf() {
        let mut builder = PageBuilder::new();
        builder.text("Hello", 20.0, 30.0, Align::Left);
        builder.set_opacity(0.1);
        let bytes = builder.finish(&info()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_finish_closes_open_states() {
        let mut builder = PageBuilder::new();
        builder.save_graphics_state();
        builder.save_graphics_state();
        let bytes = builder.finish(&info()).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        let saves = content.operations.iter().filter(|op| op.operator == "q").count();
        let restores = content.operations.iter().filter(|op| op.operator == "Q").count();
        assert_eq!(saves, 2);
        assert_eq!(restores, 2);
    }

    #[test]
    fn test_image_registered_as_xobject() {
        let pixels = [0u8, 0, 0, 255, 255, 255];
        let png = crate::seal::tests::png_bytes(png::ColorType::Rgb, 2, 1, &pixels);
        let seal = SealImage::from_png_bytes(&png).unwrap();

        let mut builder = PageBuilder::new();
        let name = builder.add_image(seal);
        builder.image(&name, 20.0, 15.0, 25.0, 25.0);
        assert_eq!(name, "Im1");
        assert_eq!(operators(&builder), vec!["q", "cm", "Do", "Q"]);

        let bytes = builder.finish(&info()).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
