//! Certificate rendering entry points

use crate::builder::{DocumentInfo, PageBuilder};
use crate::document::CertificateDocument;
use crate::error::CertificateError;
use crate::fit::check_layout_fit;
use crate::layout::CertificateLayout;
use crate::seal::SealImage;
use certificate_types::{validate_request, BarangayInfo, CertificateRequest, OfficialInfo};

/// Per-call rendering options
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Embedded in place of the placeholder seal when present
    pub seal: Option<SealImage>,
}

impl RenderOptions {
    pub fn with_seal(seal: SealImage) -> Self {
        Self { seal: Some(seal) }
    }

    /// Load the seal referenced by `barangay`, if any.
    ///
    /// A missing or undecodable seal is logged and the certificate falls
    /// back to the drawn placeholder.
    pub fn for_barangay(barangay: &BarangayInfo) -> Self {
        let seal = barangay
            .seal_image
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .and_then(|path| match SealImage::load(path) {
                Ok(seal) => Some(seal),
                Err(e) => {
                    tracing::warn!(path, error = %e, "seal image unavailable, using placeholder");
                    None
                }
            });
        Self { seal }
    }
}

/// Render a certificate with the placeholder seal.
///
/// `barangay = None` uses [`BarangayInfo::default`]. Inputs are not
/// validated; blank or over-long values render as blank space or overlap.
pub fn generate_certificate(
    request: &CertificateRequest,
    official: &OfficialInfo,
    barangay: Option<&BarangayInfo>,
) -> Result<CertificateDocument, CertificateError> {
    generate_certificate_with(request, official, barangay, &RenderOptions::default())
}

/// Render a certificate with explicit options
pub fn generate_certificate_with(
    request: &CertificateRequest,
    official: &OfficialInfo,
    barangay: Option<&BarangayInfo>,
    options: &RenderOptions,
) -> Result<CertificateDocument, CertificateError> {
    let default_barangay;
    let barangay = match barangay {
        Some(info) => info,
        None => {
            default_barangay = BarangayInfo::default();
            &default_barangay
        }
    };
    let issue_date = request.resolved_issue_date();

    tracing::debug!(
        kind = %request.kind,
        requested_at = %request.requested_at,
        %issue_date,
        barangay = %barangay.name,
        "rendering certificate"
    );

    let mut page = PageBuilder::new();
    let seal_name = options.seal.clone().map(|seal| page.add_image(seal));

    CertificateLayout {
        request,
        official,
        barangay,
        issue_date,
        seal: seal_name.as_deref(),
    }
    .draw(&mut page);

    let bytes = page.finish(&DocumentInfo {
        title: format!(
            "{} - {}",
            request.kind.title(),
            request.resident.full_name.to_uppercase()
        ),
        author: barangay.display_name(),
        subject: barangay.summary(),
        created: issue_date,
    })?;

    let document =
        CertificateDocument::new(bytes, request.kind, issue_date, &request.resident.full_name);
    tracing::info!(
        file = document.file_name(),
        hash = %document.content_hash(),
        "certificate rendered"
    );
    Ok(document)
}

/// Validate, check that every field fits the template, then render
pub fn generate_certificate_checked(
    request: &CertificateRequest,
    official: &OfficialInfo,
    barangay: Option<&BarangayInfo>,
    options: &RenderOptions,
) -> Result<CertificateDocument, CertificateError> {
    validate_request(request, official)?;

    let default_barangay = BarangayInfo::default();
    let overflows = check_layout_fit(request, official, barangay.unwrap_or(&default_barangay));
    if let Some(overflow) = overflows.into_iter().next() {
        return Err(CertificateError::FieldTooLong {
            field: overflow.field,
            width_mm: overflow.width_mm,
            limit_mm: overflow.limit_mm,
        });
    }

    generate_certificate_with(request, official, barangay, options)
}
