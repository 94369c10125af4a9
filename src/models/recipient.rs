//! Recipient model
//!
//! A Medicaid service recipient and the service codes they are approved to
//! be billed under.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::RecipientId;
use super::schedule::ServiceType;

/// Number of digits in a Medicaid ID
pub const MEDICAID_ID_LEN: usize = 12;

/// Service codes valid for work (day program) billing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkServiceCode {
    #[serde(alias = "adf")]
    Adf,
    #[serde(alias = "avf")]
    Avf,
    #[serde(alias = "fvf")]
    Fvf,
}

impl WorkServiceCode {
    pub const ALL: [WorkServiceCode; 3] = [Self::Adf, Self::Avf, Self::Fvf];

    /// Parse a work service code (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ADF" => Some(Self::Adf),
            "AVF" => Some(Self::Avf),
            "FVF" => Some(Self::Fvf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adf => "ADF",
            Self::Avf => "AVF",
            Self::Fvf => "FVF",
        }
    }
}

impl fmt::Display for WorkServiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service codes valid for trip (transportation) billing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TripServiceCode {
    #[serde(alias = "atb")]
    Atb,
    #[serde(alias = "ftb")]
    Ftb,
}

impl TripServiceCode {
    pub const ALL: [TripServiceCode; 2] = [Self::Atb, Self::Ftb];

    /// Parse a trip service code (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ATB" => Some(Self::Atb),
            "FTB" => Some(Self::Ftb),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Atb => "ATB",
            Self::Ftb => "FTB",
        }
    }
}

impl fmt::Display for TripServiceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Medicaid service recipient
///
/// Recipients are immutable once created; corrections are made by deleting
/// and re-adding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    /// Unique identifier, assigned by the directory
    pub id: RecipientId,

    pub last_name: String,

    pub first_name: String,

    /// Exactly twelve digits
    pub medicaid_id: String,

    /// Work service code, absent when work is not billed
    #[serde(default)]
    pub work_service_code: Option<WorkServiceCode>,

    /// Transportation service code, absent when trips are not billed
    #[serde(default)]
    pub trip_service_code: Option<TripServiceCode>,

    /// When the recipient was added
    pub created_at: DateTime<Utc>,
}

impl Recipient {
    /// Create a new recipient without service codes
    pub fn new(
        last_name: impl Into<String>,
        first_name: impl Into<String>,
        medicaid_id: impl Into<String>,
    ) -> Self {
        Self {
            id: RecipientId::new(),
            last_name: last_name.into(),
            first_name: first_name.into(),
            medicaid_id: medicaid_id.into(),
            work_service_code: None,
            trip_service_code: None,
            created_at: Utc::now(),
        }
    }

    /// Set the work service code
    pub fn with_work_code(mut self, code: WorkServiceCode) -> Self {
        self.work_service_code = Some(code);
        self
    }

    /// Set the trip service code
    pub fn with_trip_code(mut self, code: TripServiceCode) -> Self {
        self.trip_service_code = Some(code);
        self
    }

    /// The service code billed for the given service type, if any
    pub fn service_code(&self, service_type: ServiceType) -> Option<&'static str> {
        match service_type {
            ServiceType::Work => self.work_service_code.map(|c| c.as_str()),
            ServiceType::Trip => self.trip_service_code.map(|c| c.as_str()),
        }
    }

    /// Whether the recipient may be scheduled for the given service type
    pub fn is_valid_service_code(&self, service_type: ServiceType) -> bool {
        self.service_code(service_type).is_some()
    }

    /// Case-insensitive surname used for ordering
    pub fn sort_key(&self) -> (String, String) {
        (self.last_name.to_lowercase(), self.first_name.to_lowercase())
    }

    /// "Last, F." form used in the billing grid
    pub fn short_name(&self) -> String {
        match self.first_name.chars().next() {
            Some(initial) => format!(
                "{}, {}.",
                capitalize(&self.last_name),
                initial.to_uppercase()
            ),
            None => capitalize(&self.last_name),
        }
    }

    /// Validate the recipient
    pub fn validate(&self) -> Result<(), RecipientValidationError> {
        if self.last_name.trim().is_empty() {
            return Err(RecipientValidationError::EmptyLastName);
        }

        if self.first_name.trim().is_empty() {
            return Err(RecipientValidationError::EmptyFirstName);
        }

        if !is_valid_medicaid_id(&self.medicaid_id) {
            return Err(RecipientValidationError::InvalidMedicaidId(
                self.medicaid_id.clone(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}",
            capitalize(&self.last_name),
            capitalize(&self.first_name)
        )
    }
}

/// Check that a Medicaid ID is exactly twelve ASCII digits
pub fn is_valid_medicaid_id(id: &str) -> bool {
    id.len() == MEDICAID_ID_LEN && id.bytes().all(|b| b.is_ascii_digit())
}

/// Uppercase the first letter, lowercase the rest
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Validation errors for recipients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientValidationError {
    EmptyLastName,
    EmptyFirstName,
    InvalidMedicaidId(String),
    UnknownWorkCode(String),
    UnknownTripCode(String),
}

impl fmt::Display for RecipientValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLastName => write!(f, "Last name cannot be empty"),
            Self::EmptyFirstName => write!(f, "First name cannot be empty"),
            Self::InvalidMedicaidId(id) => {
                write!(f, "Medicaid ID must be exactly 12 digits (got '{}')", id)
            }
            Self::UnknownWorkCode(code) => {
                write!(f, "Unknown work service code '{}' (expected ADF, AVF or FVF)", code)
            }
            Self::UnknownTripCode(code) => {
                write!(f, "Unknown trip service code '{}' (expected ATB or FTB)", code)
            }
        }
    }
}

impl std::error::Error for RecipientValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes_case_insensitive() {
        assert_eq!(WorkServiceCode::parse("adf"), Some(WorkServiceCode::Adf));
        assert_eq!(WorkServiceCode::parse(" Fvf "), Some(WorkServiceCode::Fvf));
        assert_eq!(WorkServiceCode::parse("ATB"), None);
        assert_eq!(WorkServiceCode::parse(""), None);

        assert_eq!(TripServiceCode::parse("ftb"), Some(TripServiceCode::Ftb));
        assert_eq!(TripServiceCode::parse("ADF"), None);
    }

    #[test]
    fn test_service_code_eligibility() {
        let recipient =
            Recipient::new("Doe", "Jane", "123456789012").with_work_code(WorkServiceCode::Adf);

        assert!(recipient.is_valid_service_code(ServiceType::Work));
        assert!(!recipient.is_valid_service_code(ServiceType::Trip));
        assert_eq!(recipient.service_code(ServiceType::Work), Some("ADF"));
    }

    #[test]
    fn test_validation() {
        let mut recipient = Recipient::new("Doe", "Jane", "123456789012");
        assert!(recipient.validate().is_ok());

        recipient.medicaid_id = "12345678901".into();
        assert!(matches!(
            recipient.validate(),
            Err(RecipientValidationError::InvalidMedicaidId(_))
        ));

        recipient.medicaid_id = "12345678901a".into();
        assert!(recipient.validate().is_err());

        recipient.medicaid_id = "123456789012".into();
        recipient.last_name = "  ".into();
        assert_eq!(
            recipient.validate(),
            Err(RecipientValidationError::EmptyLastName)
        );
    }

    #[test]
    fn test_names() {
        let recipient = Recipient::new("smith", "jOHN", "123456789012");
        assert_eq!(recipient.to_string(), "Smith, John");
        assert_eq!(recipient.short_name(), "Smith, J.");
    }

    #[test]
    fn test_deserialize_lowercase_codes() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "last_name": "Doe",
            "first_name": "Jane",
            "medicaid_id": "123456789012",
            "work_service_code": "avf",
            "trip_service_code": null,
            "created_at": "2025-06-01T00:00:00Z"
        }"#;

        let recipient: Recipient = serde_json::from_str(json).unwrap();
        assert_eq!(recipient.work_service_code, Some(WorkServiceCode::Avf));
        assert_eq!(recipient.trip_service_code, None);

        let out = serde_json::to_value(&recipient).unwrap();
        assert_eq!(out["work_service_code"], "AVF");
    }
}
