//! TOML configuration for the `barangay-cert` binary
//!
//! A config file names the signing officials, optionally overrides the
//! issuing barangay, and says where rendered certificates are written.
//!
//! ```toml
//! [officials]
//! punong_barangay = "maria santos"
//! kagawad_on_duty = "pedro reyes"
//!
//! [barangay]
//! name = "Taft"
//! seal_image = "assets/taft-seal.png"
//!
//! [output]
//! directory = "certificates"
//! file_name = "{date}-{kind}-{name}.pdf"
//! ```

use anyhow::Context;
use certificate_pdf::DEFAULT_FILE_NAME_PATTERN;
use certificate_types::jurisdiction::{
    DEFAULT_BARANGAY_NAME, DEFAULT_CITY, DEFAULT_PROVINCE, DEFAULT_REGION,
};
use certificate_types::types::{DEFAULT_POSITION, DEFAULT_TERM};
use certificate_types::{BarangayInfo, OfficialInfo};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub officials: OfficialsConfig,
    /// Replaces the built-in jurisdiction when present
    #[serde(default)]
    pub barangay: Option<BarangayConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A relative `seal_image` is taken relative to the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_str(&content)?;
        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        Ok(config)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    fn resolve_paths(&mut self, base: &Path) {
        if let Some(seal) = self
            .barangay
            .as_mut()
            .and_then(|barangay| barangay.seal_image.as_mut())
        {
            if seal.is_relative() {
                *seal = base.join(&*seal);
            }
        }
    }

    pub fn barangay_info(&self) -> Option<BarangayInfo> {
        self.barangay.clone().map(BarangayInfo::from)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficialsConfig {
    #[serde(default)]
    pub punong_barangay: String,
    #[serde(default)]
    pub kagawad_on_duty: String,
    #[serde(default = "default_position")]
    pub position: String,
    #[serde(default = "default_term")]
    pub term: String,
}

impl Default for OfficialsConfig {
    fn default() -> Self {
        Self {
            punong_barangay: String::new(),
            kagawad_on_duty: String::new(),
            position: default_position(),
            term: default_term(),
        }
    }
}

impl From<OfficialsConfig> for OfficialInfo {
    fn from(config: OfficialsConfig) -> Self {
        OfficialInfo {
            punong_barangay: config.punong_barangay,
            kagawad_on_duty: config.kagawad_on_duty,
            position: config.position,
            term: Some(config.term),
        }
    }
}

/// Jurisdiction override; unset names fall back to the built-in barangay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarangayConfig {
    #[serde(default = "default_barangay_name")]
    pub name: String,
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_province")]
    pub province: String,
    #[serde(default = "default_region")]
    pub region: String,
    pub address: Option<String>,
    pub plus_code: Option<String>,
    /// PNG seal embedded in the header instead of the placeholder
    pub seal_image: Option<PathBuf>,
}

impl From<BarangayConfig> for BarangayInfo {
    fn from(config: BarangayConfig) -> Self {
        BarangayInfo {
            name: config.name,
            city: config.city,
            province: config.province,
            region: config.region,
            address: config.address,
            plus_code: config.plus_code,
            coordinates: None,
            seal_image: config.seal_image.map(|path| path.display().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// Pattern with `{kind}`, `{name}` and `{date}` placeholders
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            file_name: default_file_name(),
        }
    }
}

fn default_position() -> String {
    DEFAULT_POSITION.to_string()
}

fn default_term() -> String {
    DEFAULT_TERM.to_string()
}

fn default_barangay_name() -> String {
    DEFAULT_BARANGAY_NAME.to_string()
}

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

fn default_province() -> String {
    DEFAULT_PROVINCE.to_string()
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_name() -> String {
    DEFAULT_FILE_NAME_PATTERN.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.officials.position, "Kagawad");
        assert_eq!(config.officials.term, "2023-2025");
        assert_eq!(config.output.directory, PathBuf::from("."));
        assert_eq!(config.output.file_name, DEFAULT_FILE_NAME_PATTERN);
        assert!(config.barangay_info().is_none());
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_str(
            r#"
            [officials]
            punong_barangay = "maria santos"
            kagawad_on_duty = "pedro reyes"
            term = "2026-2028"

            [barangay]
            name = "Taft"
            seal_image = "assets/taft-seal.png"

            [output]
            directory = "out"
            file_name = "{date}-{name}.pdf"
            "#,
        )
        .unwrap();

        let official = OfficialInfo::from(config.officials.clone());
        assert_eq!(official.punong_barangay, "maria santos");
        assert_eq!(official.kagawad_name(), Some("pedro reyes"));
        assert_eq!(official.term_label(), "2026-2028");

        let barangay = config.barangay_info().unwrap();
        assert_eq!(barangay.name, "Taft");
        assert_eq!(barangay.city, DEFAULT_CITY);
        assert_eq!(barangay.region, DEFAULT_REGION);
        assert_eq!(barangay.seal_image.as_deref(), Some("assets/taft-seal.png"));

        assert_eq!(config.output.directory, PathBuf::from("out"));
        assert_eq!(config.output.file_name, "{date}-{name}.pdf");
    }

    #[test]
    fn test_malformed_config_rejected() {
        let err = Config::from_str("[officials\npunong_barangay = 1").unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("barangay.toml");
        fs::write(&path, "[officials]\npunong_barangay = \"maria santos\"\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.officials.punong_barangay, "maria santos");

        assert!(Config::from_file(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_seal_path_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("barangay.toml");
        fs::write(&path, "[barangay]\nname = \"Taft\"\nseal_image = \"assets/seal.png\"\n")
            .unwrap();

        let config = Config::from_file(&path).unwrap();
        let seal = config.barangay.unwrap().seal_image.unwrap();
        assert_eq!(seal, dir.path().join("assets/seal.png"));
    }

    #[test]
    fn test_absolute_seal_path_kept() {
        let dir = tempfile::tempdir().unwrap();
        let seal = dir.path().join("seal.png");
        let path = dir.path().join("nested").join("barangay.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            format!("[barangay]\nseal_image = {:?}\n", seal.display().to_string()),
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.barangay.unwrap().seal_image, Some(seal));
    }
}
