//! `render` and `inspect` command implementations

use crate::config::Config;
use anyhow::Context;
use certificate_pdf::inspect::{inspect, PageInspection};
use certificate_pdf::{
    check_layout_fit, generate_certificate_checked, generate_certificate_with,
    CertificateDocument, RenderOptions,
};
use certificate_types::{CertificateKind, CertificateRequest, OfficialInfo};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Inputs of one `render` invocation after flag parsing
#[derive(Debug, Clone, Default)]
pub struct RenderArgs {
    pub request: PathBuf,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub data_url: bool,
    pub strict: bool,
    pub kind: Option<CertificateKind>,
    pub issue_date: Option<NaiveDate>,
    pub punong_barangay: Option<String>,
    pub kagawad: Option<String>,
}

/// Where a rendered certificate went
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutput {
    File(PathBuf),
    DataUrl(String),
}

/// Parse a JSON certificate request from disk
pub fn load_request(path: &Path) -> anyhow::Result<CertificateRequest> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse request JSON: {}", path.display()))
}

/// Render the certificate described by `args`
pub fn render(args: &RenderArgs) -> anyhow::Result<(CertificateDocument, RenderOutput)> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let mut request = load_request(&args.request)?;
    if let Some(kind) = args.kind {
        request.kind = kind;
    }
    if let Some(date) = args.issue_date {
        request.issue_date = Some(date);
    }

    let mut official = OfficialInfo::from(config.officials.clone());
    if let Some(name) = &args.punong_barangay {
        official.punong_barangay = name.clone();
    }
    if let Some(name) = &args.kagawad {
        official.kagawad_on_duty = name.clone();
    }

    let barangay = config.barangay_info();
    let options = barangay
        .as_ref()
        .map(RenderOptions::for_barangay)
        .unwrap_or_default();

    let document = if args.strict {
        generate_certificate_checked(&request, &official, barangay.as_ref(), &options)
            .context("Certificate rejected in strict mode")?
    } else {
        let fit_barangay = barangay.clone().unwrap_or_default();
        for overflow in check_layout_fit(&request, &official, &fit_barangay) {
            tracing::warn!(
                field = overflow.field,
                width_mm = overflow.width_mm,
                limit_mm = overflow.limit_mm,
                "field wider than its reserved space; text will overlap"
            );
        }
        generate_certificate_with(&request, &official, barangay.as_ref(), &options)
            .context("Failed to render certificate")?
    };

    if args.data_url {
        let url = document.to_data_url();
        return Ok((document, RenderOutput::DataUrl(url)));
    }

    let path = match &args.output {
        Some(path) => path.clone(),
        None => {
            fs::create_dir_all(&config.output.directory).with_context(|| {
                format!(
                    "Failed to create output directory: {}",
                    config.output.directory.display()
                )
            })?;
            config
                .output
                .directory
                .join(document.file_name_from(&config.output.file_name))
        }
    };
    document
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok((document, RenderOutput::File(path)))
}

/// Read back a PDF written by `render`
pub fn inspect_file(path: &Path) -> anyhow::Result<PageInspection> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read PDF: {}", path.display()))?;
    inspect(&bytes).with_context(|| format!("Failed to inspect PDF: {}", path.display()))
}

/// One line per text run: position, font, size, opacity, text
pub fn format_inspection(page: &PageInspection) -> String {
    let mut out = format!(
        "pages: {}  images: {}  runs: {}\n",
        page.page_count,
        page.image_count,
        page.text_runs.len()
    );
    for run in &page.text_runs {
        let font = run
            .font
            .map(|font| font.base_font())
            .unwrap_or("?");
        out.push_str(&format!(
            "{:>6.1} {:>6.1}  {:<22} {:>5.1}  {:.2}  {}\n",
            run.x_mm, run.y_mm, font, run.size, run.opacity, run.text
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REQUEST_JSON: &str = r#"{
        "resident": {
            "fullName": "juan dela cruz",
            "address": "123 Rizal St.",
            "dateOfBirth": "1990-01-01",
            "placeOfBirth": "Surigao City",
            "gender": "male",
            "civilStatus": "single"
        },
        "purpose": "employment",
        "issueDate": "2025-03-05"
    }"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_render_to_configured_directory() {
        let dir = tempfile::tempdir().unwrap();
        let request = write(dir.path(), "request.json", REQUEST_JSON);
        let out_dir = dir.path().join("out");
        let config = write(
            dir.path(),
            "config.toml",
            &format!(
                "[officials]\npunong_barangay = \"maria santos\"\n\n[output]\ndirectory = {:?}\n",
                out_dir.display().to_string()
            ),
        );

        let (document, output) = render(&RenderArgs {
            request,
            config: Some(config),
            ..RenderArgs::default()
        })
        .unwrap();

        let expected = out_dir.join("clearance-juan-dela-cruz-2025-03-05.pdf");
        assert_eq!(output, RenderOutput::File(expected.clone()));
        assert_eq!(fs::read(&expected).unwrap(), document.as_bytes());

        let page = inspect_file(&expected).unwrap();
        assert!(page.find("MARIA SANTOS").is_some());
        assert!(page.find("JUAN DELA CRUZ").is_some());
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let request = write(dir.path(), "request.json", REQUEST_JSON);

        let (document, output) = render(&RenderArgs {
            request,
            data_url: true,
            kind: Some(CertificateKind::Residency),
            punong_barangay: Some("ana reyes".to_string()),
            kagawad: Some("pedro reyes".to_string()),
            ..RenderArgs::default()
        })
        .unwrap();

        assert_eq!(output, RenderOutput::DataUrl(document.to_data_url()));
        let page = inspect(document.as_bytes()).unwrap();
        assert!(page.find("CERTIFICATE OF RESIDENCY").is_some());
        assert!(page.find("ANA REYES").is_some());
        assert!(page.find("PEDRO REYES").is_some());
    }

    #[test]
    fn test_strict_mode_rejects_missing_official() {
        let dir = tempfile::tempdir().unwrap();
        let request = write(dir.path(), "request.json", REQUEST_JSON);
        let result = render(&RenderArgs {
            request,
            strict: true,
            data_url: true,
            ..RenderArgs::default()
        });
        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("punongBarangay"));
    }

    #[test]
    fn test_bad_request_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let request = write(dir.path(), "request.json", "{ not json");
        let err = load_request(&request).unwrap_err();
        assert!(err.to_string().contains("request.json"));
    }

    #[test]
    fn test_format_inspection_lists_runs() {
        let dir = tempfile::tempdir().unwrap();
        let request = write(dir.path(), "request.json", REQUEST_JSON);
        let (document, _) = render(&RenderArgs {
            request,
            data_url: true,
            ..RenderArgs::default()
        })
        .unwrap();
        let listing = format_inspection(&inspect(document.as_bytes()).unwrap());
        assert!(listing.starts_with("pages: 1  images: 0"));
        assert!(listing.contains("Helvetica-Bold"));
        assert!(listing.contains("JUAN DELA CRUZ"));
    }
}
