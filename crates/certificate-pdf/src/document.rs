//! Rendered certificate and its export views

use crate::error::CertificateError;
use crate::units::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use base64::{engine::general_purpose::STANDARD, Engine};
use certificate_types::CertificateKind;
use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use std::path::Path;

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// File name pattern; `{kind}`, `{name}` and `{date}` are substituted
pub const DEFAULT_FILE_NAME_PATTERN: &str = "{kind}-{name}-{date}.pdf";

/// A finished single-page certificate.
///
/// Holds the serialized PDF; every export view reads the same bytes, so a
/// saved file, the blob and the data URL are always identical content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateDocument {
    bytes: Vec<u8>,
    kind: CertificateKind,
    issue_date: NaiveDate,
    slug: String,
    file_name: String,
}

impl CertificateDocument {
    pub(crate) fn new(
        bytes: Vec<u8>,
        kind: CertificateKind,
        issue_date: NaiveDate,
        resident_name: &str,
    ) -> Self {
        let mut document = Self {
            bytes,
            kind,
            issue_date,
            slug: slugify(resident_name),
            file_name: String::new(),
        };
        document.file_name = document.file_name_from(DEFAULT_FILE_NAME_PATTERN);
        document
    }

    pub fn kind(&self) -> CertificateKind {
        self.kind
    }

    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    /// Certificates never paginate
    pub fn page_count(&self) -> usize {
        1
    }

    /// Page size in millimeters (A4 portrait)
    pub fn page_size_mm(&self) -> (f64, f64) {
        (PAGE_WIDTH_MM, PAGE_HEIGHT_MM)
    }

    /// Default file name, e.g. `clearance-juan-dela-cruz-2025-03-05.pdf`
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Expand a file name pattern such as [`DEFAULT_FILE_NAME_PATTERN`]
    pub fn file_name_from(&self, pattern: &str) -> String {
        pattern
            .replace("{kind}", &self.kind.to_string())
            .replace("{name}", &self.slug)
            .replace("{date}", &self.issue_date.format("%Y-%m-%d").to_string())
    }

    /// Binary view
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// `data:application/pdf;base64,...` view for embedding in a page
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", PDF_MIME_TYPE, STANDARD.encode(&self.bytes))
    }

    /// Write the PDF to `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CertificateError> {
        let path = path.as_ref();
        std::fs::write(path, &self.bytes)?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "saved certificate");
        Ok(())
    }

    /// SHA-256 of the PDF bytes as lowercase hex
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        hex::encode(hasher.finalize())
    }
}

/// ASCII spelling of the accented letters WinAnsi can print
fn fold_latin(c: char) -> Option<&'static str> {
    let folded = match c {
        'À'..='Å' | 'à'..='å' => "a",
        'Æ' | 'æ' => "ae",
        'Ç' | 'ç' => "c",
        'È'..='Ë' | 'è'..='ë' => "e",
        'Ì'..='Ï' | 'ì'..='ï' => "i",
        'Ñ' | 'ñ' => "n",
        'Ò'..='Ö' | 'Ø' | 'ò'..='ö' | 'ø' => "o",
        'Œ' | 'œ' => "oe",
        'Š' | 'š' => "s",
        'ß' => "ss",
        'Ù'..='Ü' | 'ù'..='ü' => "u",
        'Ý' | 'ý' | 'ÿ' | 'Ÿ' => "y",
        'Ž' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}

/// Lowercase ASCII words joined by '-'
fn slugify(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars() {
        match fold_latin(c) {
            Some(ascii) => folded.push_str(ascii),
            None => folded.push(c),
        }
    }

    let mut slug = String::new();
    for word in folded
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(&word.to_ascii_lowercase());
    }
    if slug.is_empty() {
        slug.push_str("resident");
    }
    slug
}
