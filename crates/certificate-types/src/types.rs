use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Term of office printed next to the punong barangay signature when the
/// caller does not supply one.
pub const DEFAULT_TERM: &str = "2023-2025";

/// Position label used for the on-duty council member.
pub const DEFAULT_POSITION: &str = "Kagawad";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(alias = "male", alias = "MALE")]
    Male,
    #[serde(alias = "female", alias = "FEMALE")]
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CivilStatus {
    #[serde(alias = "single", alias = "SINGLE")]
    Single,
    #[serde(alias = "married", alias = "MARRIED")]
    Married,
    #[serde(alias = "widowed", alias = "WIDOWED")]
    Widowed,
    #[serde(alias = "separated", alias = "SEPARATED")]
    Separated,
}

impl fmt::Display for CivilStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CivilStatus::Single => write!(f, "Single"),
            CivilStatus::Married => write!(f, "Married"),
            CivilStatus::Widowed => write!(f, "Widowed"),
            CivilStatus::Separated => write!(f, "Separated"),
        }
    }
}

/// Identity fields printed on the certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentInfo {
    pub full_name: String,
    pub address: String,
    /// Display string, printed as given (e.g. "1990-01-01" or "January 1, 1990")
    pub date_of_birth: String,
    pub place_of_birth: String,
    pub gender: Gender,
    pub civil_status: CivilStatus,
    /// Storage reference for the resident's photo. The certificate only
    /// reserves a box for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Kind of certificate requested. All kinds share one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateKind {
    #[default]
    Clearance,
    Residency,
    Indigency,
}

impl CertificateKind {
    pub fn title(&self) -> &'static str {
        match self {
            CertificateKind::Clearance => "BARANGAY CLEARANCE",
            CertificateKind::Residency => "CERTIFICATE OF RESIDENCY",
            CertificateKind::Indigency => "CERTIFICATE OF INDIGENCY",
        }
    }

    /// Boilerplate paragraph drawn under "TO WHOM IT MAY CONCERN"
    pub fn body_text(&self) -> &'static str {
        match self {
            CertificateKind::Clearance => {
                "This is to certify that the person whose name and personal information \
                 appear below is a bona fide resident of this barangay and has no derogatory \
                 record on file in this office as of this date."
            }
            CertificateKind::Residency => {
                "This is to certify that the person whose name and personal information \
                 appear below is a bona fide resident of this barangay and has been residing \
                 within its jurisdiction up to the present."
            }
            CertificateKind::Indigency => {
                "This is to certify that the person whose name and personal information \
                 appear below is a bona fide resident of this barangay and belongs to an \
                 indigent family of this community."
            }
        }
    }
}

impl fmt::Display for CertificateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertificateKind::Clearance => write!(f, "clearance"),
            CertificateKind::Residency => write!(f, "residency"),
            CertificateKind::Indigency => write!(f, "indigency"),
        }
    }
}

/// One render invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    pub resident: ResidentInfo,
    pub purpose: String,
    #[serde(default = "Utc::now")]
    pub requested_at: DateTime<Utc>,
    /// Date printed in the issuance clause. Defaults to the render date.
    ///
    /// Accepts a plain `YYYY-MM-DD` date or an ISO-8601 timestamp.
    #[serde(
        default,
        deserialize_with = "deserialize_issue_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub kind: CertificateKind,
}

impl CertificateRequest {
    /// Create a clearance request stamped with the current time
    pub fn new(resident: ResidentInfo, purpose: impl Into<String>) -> Self {
        Self {
            resident,
            purpose: purpose.into(),
            requested_at: Utc::now(),
            issue_date: None,
            kind: CertificateKind::default(),
        }
    }

    pub fn with_issue_date(mut self, date: NaiveDate) -> Self {
        self.issue_date = Some(date);
        self
    }

    pub fn with_kind(mut self, kind: CertificateKind) -> Self {
        self.kind = kind;
        self
    }

    /// Issue date, falling back to today's local date
    pub fn resolved_issue_date(&self) -> NaiveDate {
        self.issue_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Parse an issue date from `YYYY-MM-DD` or an ISO-8601 timestamp.
///
/// A timestamp keeps the calendar date of its own offset, so
/// `2025-03-05T00:30:00+08:00` is March 5 and `2025-03-04T16:30:00Z` is
/// March 4.
pub fn parse_issue_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|timestamp| timestamp.date())
}

fn deserialize_issue_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    value
        .map(|raw| {
            parse_issue_date(&raw).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid issue date: {}", raw))
            })
        })
        .transpose()
}

/// Signing authority identities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficialInfo {
    pub punong_barangay: String,
    /// May be empty when no council member is on duty
    #[serde(default)]
    pub kagawad_on_duty: String,
    #[serde(default = "default_position")]
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
}

fn default_position() -> String {
    DEFAULT_POSITION.to_string()
}

impl OfficialInfo {
    pub fn new(punong_barangay: impl Into<String>, kagawad_on_duty: impl Into<String>) -> Self {
        Self {
            punong_barangay: punong_barangay.into(),
            kagawad_on_duty: kagawad_on_duty.into(),
            position: default_position(),
            term: None,
        }
    }

    /// Kagawad name, or `None` when blank
    pub fn kagawad_name(&self) -> Option<&str> {
        let name = self.kagawad_on_duty.trim();
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    pub fn term_label(&self) -> &str {
        self.term.as_deref().unwrap_or(DEFAULT_TERM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resident() -> ResidentInfo {
        ResidentInfo {
            full_name: "juan dela cruz".to_string(),
            address: "123 Rizal St.".to_string(),
            date_of_birth: "1990-01-01".to_string(),
            place_of_birth: "Surigao City".to_string(),
            gender: Gender::Male,
            civil_status: CivilStatus::Single,
            photo_url: None,
        }
    }

    #[test]
    fn test_request_deserializes_from_app_json() {
        let json = r#"{
            "resident": {
                "fullName": "juan dela cruz",
                "address": "123 Rizal St.",
                "dateOfBirth": "1990-01-01",
                "placeOfBirth": "Surigao City",
                "gender": "Male",
                "civilStatus": "single"
            },
            "purpose": "employment",
            "requestedAt": "2025-03-01T08:00:00Z",
            "issueDate": "2025-03-05"
        }"#;
        let request: CertificateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.resident, resident());
        assert_eq!(request.kind, CertificateKind::Clearance);
        assert_eq!(
            request.issue_date,
            Some(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap())
        );
    }

    #[test]
    fn test_issue_date_accepts_app_timestamp() {
        let json = r#"{
            "resident": {
                "fullName": "juan dela cruz",
                "address": "123 Rizal St.",
                "dateOfBirth": "1990-01-01",
                "placeOfBirth": "Surigao City",
                "gender": "male",
                "civilStatus": "single"
            },
            "purpose": "employment",
            "issueDate": "2025-03-05T08:00:00.000Z"
        }"#;
        let request: CertificateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request.issue_date,
            Some(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap())
        );
    }

    #[test]
    fn test_parse_issue_date_forms() {
        let march_5 = NaiveDate::from_ymd_opt(2025, 3, 5);
        assert_eq!(parse_issue_date("2025-03-05"), march_5);
        assert_eq!(parse_issue_date("2025-03-05T00:30:00+08:00"), march_5);
        assert_eq!(parse_issue_date("2025-03-05T08:00:00"), march_5);
        assert_eq!(
            parse_issue_date("2025-03-04T16:30:00Z"),
            NaiveDate::from_ymd_opt(2025, 3, 4)
        );
        assert_eq!(parse_issue_date("next tuesday"), None);
    }

    #[test]
    fn test_issue_date_null_or_invalid() {
        let base = r#"{"resident":{"fullName":"a","address":"b","dateOfBirth":"c",
            "placeOfBirth":"d","gender":"Male","civilStatus":"Single"},"purpose":"e""#;

        let request: CertificateRequest =
            serde_json::from_str(&format!("{},\"issueDate\":null}}", base)).unwrap();
        assert_eq!(request.issue_date, None);

        let err = serde_json::from_str::<CertificateRequest>(&format!(
            "{},\"issueDate\":\"05/03/2025\"}}",
            base
        ))
        .unwrap_err();
        assert!(err.to_string().contains("invalid issue date"));
    }

    #[test]
    fn test_serialized_issue_date_reloads() {
        let request = CertificateRequest::new(resident(), "employment")
            .with_issue_date(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains(r#""issueDate":"2025-03-05""#));
        let reloaded: CertificateRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded, request);
    }

    #[test]
    fn test_issue_date_defaults_to_today() {
        let request = CertificateRequest::new(resident(), "employment");
        assert_eq!(request.resolved_issue_date(), Local::now().date_naive());
    }

    #[test]
    fn test_explicit_issue_date_wins() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        let request = CertificateRequest::new(resident(), "employment").with_issue_date(date);
        assert_eq!(request.resolved_issue_date(), date);
    }

    #[test]
    fn test_blank_kagawad_is_absent() {
        assert_eq!(OfficialInfo::new("maria santos", "").kagawad_name(), None);
        assert_eq!(OfficialInfo::new("maria santos", "   ").kagawad_name(), None);
        assert_eq!(
            OfficialInfo::new("maria santos", " pedro reyes ").kagawad_name(),
            Some("pedro reyes")
        );
    }

    #[test]
    fn test_official_defaults() {
        let official: OfficialInfo =
            serde_json::from_str(r#"{"punongBarangay":"maria santos"}"#).unwrap();
        assert_eq!(official.position, "Kagawad");
        assert_eq!(official.kagawad_name(), None);
        assert_eq!(official.term_label(), DEFAULT_TERM);
    }

    #[test]
    fn test_kind_titles_are_distinct() {
        let titles = [
            CertificateKind::Clearance.title(),
            CertificateKind::Residency.title(),
            CertificateKind::Indigency.title(),
        ];
        assert_eq!(titles.len(), 3);
        assert_ne!(titles[0], titles[1]);
        assert_ne!(titles[1], titles[2]);
    }

    #[test]
    fn test_kind_serde_snake_case() {
        let kind: CertificateKind = serde_json::from_str(r#""indigency""#).unwrap();
        assert_eq!(kind, CertificateKind::Indigency);
        assert_eq!(kind.to_string(), "indigency");
    }
}
