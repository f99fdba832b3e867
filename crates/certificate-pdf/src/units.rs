//! Page geometry and unit conversion
//!
//! Layout is expressed in millimeters from the top-left corner of an A4
//! page. PDF user space is in points from the bottom-left corner, so every
//! coordinate is converted (and Y flipped) when it is emitted.

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;
pub const MARGIN_MM: f64 = 20.0;

/// Width between the left and right margins
pub const CONTENT_WIDTH_MM: f64 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
pub const CENTER_X_MM: f64 = PAGE_WIDTH_MM / 2.0;

pub const PT_PER_MM: f64 = 72.0 / 25.4;

pub fn mm_to_pt(mm: f64) -> f64 {
    mm * PT_PER_MM
}

pub fn pt_to_mm(pt: f64) -> f64 {
    pt / PT_PER_MM
}

/// Convert layout coordinates (top-left origin, mm) to PDF coordinates
/// (bottom-left origin, points)
pub fn layout_to_pdf(x_mm: f64, y_mm: f64) -> (f64, f64) {
    (mm_to_pt(x_mm), mm_to_pt(PAGE_HEIGHT_MM - y_mm))
}

/// Convert PDF coordinates back to layout coordinates
pub fn pdf_to_layout(x_pt: f64, y_pt: f64) -> (f64, f64) {
    (pt_to_mm(x_pt), PAGE_HEIGHT_MM - pt_to_mm(y_pt))
}

/// A4 media box in points
pub fn media_box() -> [f64; 4] {
    [0.0, 0.0, mm_to_pt(PAGE_WIDTH_MM), mm_to_pt(PAGE_HEIGHT_MM)]
}
