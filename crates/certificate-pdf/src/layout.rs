//! Fixed certificate template
//!
//! Every element sits at a literal millimeter offset (baseline for text,
//! top-left for boxes). Offsets are accumulated from constants, never from
//! measured text height, so over-long values overlap their neighbours
//! instead of pushing them down. [`crate::fit::check_layout_fit`] reports
//! those cases without changing the drawing.

use crate::builder::{Align, PageBuilder, Rgb};
use crate::fonts::FontStyle;
use crate::text::{ordinal, wrap_text};
use crate::units::{CENTER_X_MM, CONTENT_WIDTH_MM, MARGIN_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use certificate_types::{BarangayInfo, CertificateRequest, OfficialInfo};
use chrono::{Datelike, NaiveDate};

const RIGHT_EDGE_MM: f64 = PAGE_WIDTH_MM - MARGIN_MM;

// Header
pub const SEAL_X: f64 = MARGIN_MM;
pub const SEAL_Y: f64 = 12.0;
pub const SEAL_SIZE: f64 = 28.0;
pub const HEADER_TOP_Y: f64 = 18.0;
pub const HEADER_LINE_STEP: f64 = 5.0;
pub const COUNTRY: &str = "Republic of the Philippines";
pub const OFFICE_TITLE: &str = "OFFICE OF THE PUNONG BARANGAY";

// Watermark
pub const WATERMARK_OPACITY: f64 = 0.1;
pub const WATERMARK_COLOR: Rgb = Rgb(200, 200, 200);
pub const WATERMARK_FONT_SIZE: f64 = 48.0;
pub const WATERMARK_TOP_Y: f64 = 140.0;
pub const WATERMARK_LINE_STEP: f64 = 20.0;
pub const WATERMARK_RADIUS: f64 = 65.0;

// Title
pub const TITLE_Y: f64 = 62.0;
pub const TITLE_FONT_SIZE: f64 = 18.0;
pub const TITLE_RULE_WIDTH: f64 = 90.0;

// Body
pub const SALUTATION_Y: f64 = 78.0;
pub const PARAGRAPH_Y: f64 = 88.0;
pub const BODY_FONT_SIZE: f64 = 11.0;
pub const BODY_LINE_HEIGHT: f64 = 6.0;
pub const PHOTO_X: f64 = 150.0;
pub const PHOTO_Y: f64 = 84.0;
pub const PHOTO_SIZE: f64 = 40.0;
/// Paragraph width left of the photo column
pub const PARAGRAPH_WIDTH: f64 = PHOTO_X - MARGIN_MM - 5.0;
pub const FIELDS_TOP_Y: f64 = 116.0;
pub const FIELD_STEP: f64 = 8.0;
pub const FIELD_VALUE_X: f64 = 62.0;

// Purpose and issuance
pub const PURPOSE_Y: f64 = 170.0;
pub const PURPOSE_VALUE_X: f64 = 30.0;
pub const PURPOSE_FONT_SIZE: f64 = 12.0;
pub const ISSUANCE_Y: f64 = 190.0;

// Signatures
pub const SIGNATURE_LINE_Y: f64 = 222.0;
pub const APPLICANT_LINE: (f64, f64) = (MARGIN_MM, 80.0);
pub const OFFICIAL_LINE: (f64, f64) = (125.0, RIGHT_EDGE_MM);

// Footer
pub const AUTHORITY_Y: f64 = 245.0;
pub const KAGAWAD_LINE_Y: f64 = 262.0;
pub const KAGAWAD_LINE: (f64, f64) = (75.0, 135.0);
pub const NAME_GAP: f64 = 2.0;

/// Labels of the six identity rows, top to bottom
pub const FIELD_LABELS: [&str; 6] = [
    "Name:",
    "Address:",
    "Date of Birth:",
    "Place of Birth:",
    "Gender:",
    "Civil Status:",
];

fn midpoint((start, end): (f64, f64)) -> f64 {
    (start + end) / 2.0
}

/// Baseline of identity row `index`
pub fn field_y(index: usize) -> f64 {
    FIELDS_TOP_Y + index as f64 * FIELD_STEP
}

/// "Issued this 5th day of March, 2025 at ..." sentence
pub fn issuance_sentence(date: NaiveDate, barangay: &BarangayInfo) -> String {
    format!(
        "Issued this {} day of {}, {} at {}, {}, {}, Philippines.",
        ordinal(date.day()),
        date.format("%B"),
        date.year(),
        barangay.display_name(),
        barangay.city,
        barangay.province,
    )
}

/// Everything one render call draws from
pub(crate) struct CertificateLayout<'a> {
    pub request: &'a CertificateRequest,
    pub official: &'a OfficialInfo,
    pub barangay: &'a BarangayInfo,
    pub issue_date: NaiveDate,
    /// XObject name of an embedded seal
    pub seal: Option<&'a str>,
}

impl CertificateLayout<'_> {
    pub fn draw(&self, page: &mut PageBuilder) {
        self.header(page);
        self.watermark(page);
        self.title(page);
        self.body(page);
        self.purpose(page);
        self.issuance(page);
        self.signatures(page);
        self.footer(page);
    }

    fn header(&self, page: &mut PageBuilder) {
        tracing::debug!(seal = self.seal.is_some(), "drawing header");

        match self.seal {
            Some(name) => page.image(name, SEAL_X, SEAL_Y, SEAL_SIZE, SEAL_SIZE),
            None => {
                let cx = SEAL_X + SEAL_SIZE / 2.0;
                let cy = SEAL_Y + SEAL_SIZE / 2.0;
                page.set_line_width(0.5);
                page.circle(cx, cy, SEAL_SIZE / 2.0);
                page.set_font(FontStyle::Bold, 6.0);
                page.text("OFFICIAL", cx, cy - 2.0, Align::Center);
                page.text("BARANGAY", cx, cy + 1.0, Align::Center);
                page.text("SEAL", cx, cy + 4.0, Align::Center);
            }
        }

        let mut y = HEADER_TOP_Y;
        page.set_font(FontStyle::Normal, 11.0);
        page.text(COUNTRY, CENTER_X_MM, y, Align::Center);

        page.set_font(FontStyle::Normal, 10.0);
        y += HEADER_LINE_STEP;
        page.text(&self.barangay.region, CENTER_X_MM, y, Align::Center);
        y += HEADER_LINE_STEP;
        page.text(&self.barangay.province, CENTER_X_MM, y, Align::Center);
        y += HEADER_LINE_STEP;
        page.text(&self.barangay.city, CENTER_X_MM, y, Align::Center);

        page.set_font(FontStyle::Bold, 13.0);
        y += HEADER_LINE_STEP + 1.0;
        page.text(&self.barangay.display_name(), CENTER_X_MM, y, Align::Center);

        page.set_font(FontStyle::Bold, 11.0);
        y += HEADER_LINE_STEP + 1.0;
        page.text(OFFICE_TITLE, CENTER_X_MM, y, Align::Center);
    }

    fn watermark(&self, page: &mut PageBuilder) {
        tracing::debug!("drawing watermark");

        page.save_graphics_state();
        page.set_opacity(WATERMARK_OPACITY);
        page.set_text_color(WATERMARK_COLOR);
        page.set_draw_color(WATERMARK_COLOR);

        page.set_font(FontStyle::Bold, WATERMARK_FONT_SIZE);
        page.text("BARANGAY", CENTER_X_MM, WATERMARK_TOP_Y, Align::Center);
        page.text(
            &self.barangay.name.to_uppercase(),
            CENTER_X_MM,
            WATERMARK_TOP_Y + WATERMARK_LINE_STEP,
            Align::Center,
        );

        page.set_line_width(1.0);
        page.circle(CENTER_X_MM, PAGE_HEIGHT_MM / 2.0, WATERMARK_RADIUS);
        page.restore_graphics_state();
    }

    fn title(&self, page: &mut PageBuilder) {
        page.set_font(FontStyle::BoldItalic, TITLE_FONT_SIZE);
        page.text(self.request.kind.title(), CENTER_X_MM, TITLE_Y, Align::Center);

        page.set_line_width(0.5);
        let half = TITLE_RULE_WIDTH / 2.0;
        page.line(
            CENTER_X_MM - half,
            TITLE_Y + 3.0,
            CENTER_X_MM + half,
            TITLE_Y + 3.0,
        );
    }

    fn body(&self, page: &mut PageBuilder) {
        tracing::debug!("drawing body");
        let resident = &self.request.resident;

        page.set_font(FontStyle::Bold, BODY_FONT_SIZE);
        page.text("TO WHOM IT MAY CONCERN:", MARGIN_MM, SALUTATION_Y, Align::Left);

        page.set_font(FontStyle::Normal, BODY_FONT_SIZE);
        let paragraph = wrap_text(
            self.request.kind.body_text(),
            FontStyle::Normal,
            BODY_FONT_SIZE,
            PARAGRAPH_WIDTH,
        );
        page.justified_lines(&paragraph, MARGIN_MM, PARAGRAPH_Y, BODY_LINE_HEIGHT, PARAGRAPH_WIDTH);

        page.set_line_width(0.3);
        page.rect(PHOTO_X, PHOTO_Y, PHOTO_SIZE, PHOTO_SIZE);
        page.set_font(FontStyle::Normal, 8.0);
        page.text(
            "2x2 PHOTO",
            PHOTO_X + PHOTO_SIZE / 2.0,
            PHOTO_Y + PHOTO_SIZE / 2.0 + 1.0,
            Align::Center,
        );

        let values = [
            resident.full_name.to_uppercase(),
            resident.address.clone(),
            resident.date_of_birth.clone(),
            resident.place_of_birth.clone(),
            resident.gender.to_string(),
            resident.civil_status.to_string(),
        ];
        for (i, (label, value)) in FIELD_LABELS.iter().zip(values.iter()).enumerate() {
            let y = field_y(i);
            page.set_font(FontStyle::Bold, BODY_FONT_SIZE);
            page.text(label, MARGIN_MM, y, Align::Left);
            let value_font = if i == 0 {
                FontStyle::Bold
            } else {
                FontStyle::Normal
            };
            page.set_font(value_font, BODY_FONT_SIZE);
            page.text(value, FIELD_VALUE_X, y, Align::Left);
        }
    }

    fn purpose(&self, page: &mut PageBuilder) {
        page.set_font(FontStyle::Normal, BODY_FONT_SIZE);
        page.text(
            "This certification is issued upon request for the following purpose:",
            MARGIN_MM,
            PURPOSE_Y,
            Align::Left,
        );

        page.set_font(FontStyle::Bold, PURPOSE_FONT_SIZE);
        page.text(
            &self.request.purpose.to_uppercase(),
            PURPOSE_VALUE_X,
            PURPOSE_Y + BODY_LINE_HEIGHT + 1.0,
            Align::Left,
        );
    }

    fn issuance(&self, page: &mut PageBuilder) {
        let sentence = issuance_sentence(self.issue_date, self.barangay);
        let lines = wrap_text(&sentence, FontStyle::Normal, BODY_FONT_SIZE, CONTENT_WIDTH_MM);
        page.set_font(FontStyle::Normal, BODY_FONT_SIZE);
        page.text_lines(&lines, MARGIN_MM, ISSUANCE_Y, BODY_LINE_HEIGHT, Align::Left);
    }

    fn signatures(&self, page: &mut PageBuilder) {
        tracing::debug!("drawing signature block");

        page.set_line_width(0.3);
        page.line(APPLICANT_LINE.0, SIGNATURE_LINE_Y, APPLICANT_LINE.1, SIGNATURE_LINE_Y);
        page.line(OFFICIAL_LINE.0, SIGNATURE_LINE_Y, OFFICIAL_LINE.1, SIGNATURE_LINE_Y);

        let official_x = midpoint(OFFICIAL_LINE);
        page.set_font(FontStyle::Bold, BODY_FONT_SIZE);
        page.text(
            &self.official.punong_barangay.to_uppercase(),
            official_x,
            SIGNATURE_LINE_Y - NAME_GAP,
            Align::Center,
        );

        page.set_font(FontStyle::Normal, 10.0);
        page.text(
            "Signature of Applicant",
            midpoint(APPLICANT_LINE),
            SIGNATURE_LINE_Y + 5.0,
            Align::Center,
        );
        page.set_font(FontStyle::Bold, 10.0);
        page.text("Punong Barangay", official_x, SIGNATURE_LINE_Y + 5.0, Align::Center);

        page.set_font(FontStyle::Italic, 8.0);
        page.text(
            &format!("Term {}", self.official.term_label()),
            official_x,
            SIGNATURE_LINE_Y + 9.0,
            Align::Center,
        );
    }

    fn footer(&self, page: &mut PageBuilder) {
        tracing::debug!(kagawad = self.official.kagawad_name().is_some(), "drawing footer");

        page.set_font(FontStyle::Italic, 10.0);
        page.text(
            "By authority of the Punong Barangay:",
            CENTER_X_MM,
            AUTHORITY_Y,
            Align::Center,
        );

        page.set_line_width(0.3);
        page.line(KAGAWAD_LINE.0, KAGAWAD_LINE_Y, KAGAWAD_LINE.1, KAGAWAD_LINE_Y);

        let x = midpoint(KAGAWAD_LINE);
        if let Some(name) = self.official.kagawad_name() {
            page.set_font(FontStyle::Bold, BODY_FONT_SIZE);
            page.text(&name.to_uppercase(), x, KAGAWAD_LINE_Y - NAME_GAP, Align::Center);
        }

        page.set_font(FontStyle::Italic, 8.0);
        page.text("(Signature over printed name)", x, KAGAWAD_LINE_Y + 4.0, Align::Center);
        page.set_font(FontStyle::Bold, 10.0);
        page.text(&self.official.position, x, KAGAWAD_LINE_Y + 9.0, Align::Center);
        page.set_font(FontStyle::Normal, 9.0);
        page.text("Officer of the Day", x, KAGAWAD_LINE_Y + 14.0, Align::Center);
    }
}
