use certificate_types::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CertificateError {
    #[error("Failed to write PDF: {0}")]
    Pdf(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid seal image: {0}")]
    Seal(String),

    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Field '{field}' is {width_mm:.1}mm wide but the layout reserves {limit_mm:.1}mm")]
    FieldTooLong {
        field: &'static str,
        width_mm: f64,
        limit_mm: f64,
    },
}

impl From<lopdf::Error> for CertificateError {
    fn from(e: lopdf::Error) -> Self {
        CertificateError::Pdf(e.to_string())
    }
}
