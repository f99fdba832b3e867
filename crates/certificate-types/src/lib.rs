//! Shared data model for barangay certificates
//!
//! Plain records handed to the renderer: who the certificate is for, who
//! signs it, and which barangay issues it. Nothing in this crate draws or
//! performs I/O.

pub mod jurisdiction;
pub mod types;
pub mod validation;

pub use jurisdiction::{BarangayInfo, Coordinates};
pub use types::{
    CertificateKind, CertificateRequest, CivilStatus, Gender, OfficialInfo, ResidentInfo,
};
pub use validation::{validate_request, ValidationError};
