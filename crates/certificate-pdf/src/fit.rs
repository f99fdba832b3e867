//! Layout fit checks
//!
//! The template never reflows. This module measures the variable fields
//! against the space the template leaves for them so callers can warn or
//! refuse before printing overlapping text.

use crate::fonts::FontStyle;
use crate::layout::{
    field_y, BODY_FONT_SIZE, FIELD_VALUE_X, KAGAWAD_LINE, OFFICIAL_LINE, PHOTO_SIZE, PHOTO_X,
    PHOTO_Y, PURPOSE_FONT_SIZE, PURPOSE_VALUE_X, WATERMARK_FONT_SIZE,
};
use crate::text::text_width_mm;
use crate::units::{CONTENT_WIDTH_MM, MARGIN_MM, PAGE_WIDTH_MM};
use certificate_types::{BarangayInfo, CertificateRequest, OfficialInfo};
use serde::Serialize;

/// Minimum clearance kept between a value and the photo box
const PHOTO_GAP: f64 = 2.0;

/// A field whose rendered width exceeds its reserved width
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutOverflow {
    pub field: &'static str,
    pub width_mm: f64,
    pub limit_mm: f64,
}

/// Width available to identity row `index`, which is narrower where the
/// row runs alongside the photo box
fn field_limit(index: usize) -> f64 {
    let y = field_y(index);
    let beside_photo = y > PHOTO_Y && y - BODY_FONT_SIZE * 0.35 < PHOTO_Y + PHOTO_SIZE;
    if beside_photo {
        PHOTO_X - PHOTO_GAP - FIELD_VALUE_X
    } else {
        PAGE_WIDTH_MM - MARGIN_MM - FIELD_VALUE_X
    }
}

/// Measure every variable field; returns one entry per overflowing field
pub fn check_layout_fit(
    request: &CertificateRequest,
    official: &OfficialInfo,
    barangay: &BarangayInfo,
) -> Vec<LayoutOverflow> {
    let resident = &request.resident;
    let mut checks: Vec<(&'static str, f64, f64)> = vec![
        (
            "fullName",
            text_width_mm(&resident.full_name.to_uppercase(), FontStyle::Bold, BODY_FONT_SIZE),
            field_limit(0),
        ),
        (
            "address",
            text_width_mm(&resident.address, FontStyle::Normal, BODY_FONT_SIZE),
            field_limit(1),
        ),
        (
            "dateOfBirth",
            text_width_mm(&resident.date_of_birth, FontStyle::Normal, BODY_FONT_SIZE),
            field_limit(2),
        ),
        (
            "placeOfBirth",
            text_width_mm(&resident.place_of_birth, FontStyle::Normal, BODY_FONT_SIZE),
            field_limit(3),
        ),
        (
            "purpose",
            text_width_mm(
                &request.purpose.to_uppercase(),
                FontStyle::Bold,
                PURPOSE_FONT_SIZE,
            ),
            PAGE_WIDTH_MM - MARGIN_MM - PURPOSE_VALUE_X,
        ),
        (
            "punongBarangay",
            text_width_mm(
                &official.punong_barangay.to_uppercase(),
                FontStyle::Bold,
                BODY_FONT_SIZE,
            ),
            OFFICIAL_LINE.1 - OFFICIAL_LINE.0,
        ),
        (
            "barangayName",
            text_width_mm(
                &barangay.name.to_uppercase(),
                FontStyle::Bold,
                WATERMARK_FONT_SIZE,
            ),
            CONTENT_WIDTH_MM,
        ),
    ];

    if let Some(kagawad) = official.kagawad_name() {
        checks.push((
            "kagawadOnDuty",
            text_width_mm(&kagawad.to_uppercase(), FontStyle::Bold, BODY_FONT_SIZE),
            KAGAWAD_LINE.1 - KAGAWAD_LINE.0,
        ));
    }

    checks
        .into_iter()
        .filter(|(_, width, limit)| width > limit)
        .map(|(field, width_mm, limit_mm)| LayoutOverflow {
            field,
            width_mm,
            limit_mm,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use certificate_types::{CivilStatus, Gender, ResidentInfo};

    fn request(address: &str, purpose: &str) -> CertificateRequest {
        CertificateRequest::new(
            ResidentInfo {
                full_name: "juan dela cruz".to_string(),
                address: address.to_string(),
                date_of_birth: "1990-01-01".to_string(),
                place_of_birth: "Surigao City".to_string(),
                gender: Gender::Male,
                civil_status: CivilStatus::Single,
                photo_url: None,
            },
            purpose,
        )
    }

    #[test]
    fn test_typical_request_fits() {
        let overflows = check_layout_fit(
            &request("123 Rizal St.", "employment"),
            &OfficialInfo::new("maria santos", "pedro reyes"),
            &BarangayInfo::default(),
        );
        assert!(overflows.is_empty(), "{:?}", overflows);
    }

    #[test]
    fn test_long_address_reported() {
        let address = "Purok 7, Block 12 Lot 34, Sitio Malinawon, Near the Old Elementary School \
                       Compound, Behind the Public Market";
        let overflows = check_layout_fit(
            &request(address, "employment"),
            &OfficialInfo::new("maria santos", ""),
            &BarangayInfo::default(),
        );
        assert_eq!(overflows.len(), 1);
        assert_eq!(overflows[0].field, "address");
        assert!(overflows[0].width_mm > overflows[0].limit_mm);
    }

    #[test]
    fn test_rows_beside_photo_are_narrower() {
        // Rows 0 and 1 run alongside the photo box, the rest use the full width
        assert!(field_limit(0) < field_limit(5));
        assert_eq!(field_limit(1), PHOTO_X - PHOTO_GAP - FIELD_VALUE_X);
        assert_eq!(field_limit(4), PAGE_WIDTH_MM - MARGIN_MM - FIELD_VALUE_X);
    }

    #[test]
    fn test_absent_kagawad_not_measured() {
        let long_name = "x".repeat(200);
        let overflows = check_layout_fit(
            &request("123 Rizal St.", "employment"),
            &OfficialInfo::new("maria santos", long_name.as_str()),
            &BarangayInfo::default(),
        );
        assert_eq!(overflows[0].field, "kagawadOnDuty");

        let overflows = check_layout_fit(
            &request("123 Rizal St.", "employment"),
            &OfficialInfo::new("maria santos", ""),
            &BarangayInfo::default(),
        );
        assert!(overflows.is_empty());
    }
}
