//! Required-field checks
//!
//! The renderer itself is permissive. Callers that want to reject incomplete
//! requests before rendering run [`validate_request`] first.

use crate::types::{CertificateRequest, OfficialInfo};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Check that every field printed on the certificate is non-blank
pub fn validate_request(
    request: &CertificateRequest,
    official: &OfficialInfo,
) -> Result<(), ValidationError> {
    let resident = &request.resident;
    let required = [
        ("fullName", resident.full_name.as_str()),
        ("address", resident.address.as_str()),
        ("dateOfBirth", resident.date_of_birth.as_str()),
        ("placeOfBirth", resident.place_of_birth.as_str()),
        ("purpose", request.purpose.as_str()),
        ("punongBarangay", official.punong_barangay.as_str()),
        ("position", official.position.as_str()),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(field));
        }
    }
    Ok(())
}
