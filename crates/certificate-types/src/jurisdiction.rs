//! Issuing jurisdiction metadata
//!
//! Every certificate header and watermark is drawn from a [`BarangayInfo`].
//! Deployments normally serve a single barangay, so a built-in default is
//! provided and callers only override it when they need to.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BARANGAY_NAME: &str = "San Juan";
pub const DEFAULT_CITY: &str = "Surigao City";
pub const DEFAULT_PROVINCE: &str = "Surigao del Norte";
pub const DEFAULT_REGION: &str = "Caraga Region (Region XIII)";
pub const DEFAULT_ADDRESS: &str = "Barangay Hall, San Juan, Surigao City 8400";
pub const DEFAULT_PLUS_CODE: &str = "8Q2R+7M Surigao City";
pub const DEFAULT_COORDINATES: Coordinates = Coordinates {
    lat: 9.7515,
    lng: 125.4916,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Static jurisdiction metadata used in the header and watermark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarangayInfo {
    pub name: String,
    pub city: String,
    pub province: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plus_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Path or storage reference of the official seal (PNG)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seal_image: Option<String>,
}

impl Default for BarangayInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_BARANGAY_NAME.to_string(),
            city: DEFAULT_CITY.to_string(),
            province: DEFAULT_PROVINCE.to_string(),
            region: DEFAULT_REGION.to_string(),
            address: Some(DEFAULT_ADDRESS.to_string()),
            plus_code: Some(DEFAULT_PLUS_CODE.to_string()),
            coordinates: Some(DEFAULT_COORDINATES),
            seal_image: None,
        }
    }
}

impl BarangayInfo {
    /// "Barangay <name>" as printed in the header and issuance clause
    pub fn display_name(&self) -> String {
        format!("Barangay {}", self.name)
    }

    /// One-line jurisdiction summary for document metadata
    pub fn summary(&self) -> String {
        let mut parts = vec![self.display_name(), self.city.clone(), self.province.clone()];
        if let Some(address) = self.address.as_deref().filter(|a| !a.trim().is_empty()) {
            parts.push(address.to_string());
        }
        if let Some(plus_code) = self.plus_code.as_deref().filter(|p| !p.trim().is_empty()) {
            parts.push(plus_code.to_string());
        }
        if let Some(Coordinates { lat, lng }) = self.coordinates {
            parts.push(format!("{:.4}, {:.4}", lat, lng));
        }
        parts.join(", ")
    }
}
