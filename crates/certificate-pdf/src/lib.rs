//! Barangay certificate PDF renderer
//!
//! Lays out a single A4 certificate page from fixed millimeter offsets and
//! serializes it with lopdf. Each call builds its own [`builder::PageBuilder`],
//! so renders are independent and safe to run in parallel.

pub mod builder;
pub mod certificate;
pub mod document;
pub mod error;
pub mod fit;
pub mod fonts;
pub mod inspect;
pub mod layout;
pub mod seal;
pub mod text;
pub mod units;

pub use certificate::{
    generate_certificate, generate_certificate_checked, generate_certificate_with, RenderOptions,
};
pub use document::{CertificateDocument, DEFAULT_FILE_NAME_PATTERN};
pub use error::CertificateError;
pub use fit::{check_layout_fit, LayoutOverflow};
pub use seal::SealImage;
