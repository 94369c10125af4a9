//! Custom error types for medicaid-billing
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::billing::{FieldError, UnitError};
use crate::models::week::WeekError;

/// The main error type for billing operations
#[derive(Error, Debug)]
pub enum BillingError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// The anchor date is a real date but not a Monday
    #[error("The date provided does not fall on Monday: {}", date.format("%m/%d/%y"))]
    NotMonday { date: NaiveDate },

    /// The anchor could not be read as a calendar date
    #[error("Invalid anchor date: {0}")]
    InvalidAnchor(String),

    /// A schedule referenced a recipient that does not exist
    #[error("Unknown recipient: {0}")]
    UnknownRecipient(String),

    /// The recipient has no valid service code for the requested service type
    #[error("Recipient {recipient} does not have a valid service code for {service_type}")]
    IneligibleServiceCode {
        recipient: String,
        service_type: String,
    },

    /// The (recipient, weekday, service type) triple is already scheduled
    #[error("{recipient} is already scheduled for {service_type} on {weekday}")]
    DuplicateSchedule {
        recipient: String,
        weekday: String,
        service_type: String,
    },

    /// A unit value exceeds its per-field cap
    #[error("{field} value {value} exceeds the maximum of {max}")]
    UnitOutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },

    /// Submission refused while field errors remain
    #[error("Submission blocked: {} field error(s) must be fixed first", errors.len())]
    SubmissionBlocked { errors: Vec<FieldError> },

    /// Operation not allowed in the current billing session state
    #[error("Session error: {0}")]
    Session(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BillingError {
    /// Create a "not found" error for recipients
    pub fn recipient_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Recipient",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BillingError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BillingError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for BillingError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<WeekError> for BillingError {
    fn from(err: WeekError) -> Self {
        match err {
            WeekError::NotMonday(date) => Self::NotMonday { date },
            other => Self::InvalidAnchor(other.to_string()),
        }
    }
}

impl From<FieldError> for BillingError {
    fn from(err: FieldError) -> Self {
        match err.error {
            UnitError::OutOfRange { value, max } => Self::UnitOutOfRange {
                field: err.key.field.as_str(),
                value,
                max,
            },
            UnitError::NotANumber(_) => Self::Validation(err.to_string()),
        }
    }
}

/// Result type alias for billing operations
pub type BillingResult<T> = Result<T, BillingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BillingError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = BillingError::recipient_not_found("123456789012");
        assert_eq!(err.to_string(), "Recipient not found: 123456789012");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_not_monday_display() {
        let err = BillingError::NotMonday {
            date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "The date provided does not fall on Monday: 06/10/25"
        );
    }

    #[test]
    fn test_from_week_error() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let err: BillingError = WeekError::NotMonday(date).into();
        assert!(matches!(err, BillingError::NotMonday { .. }));

        let err: BillingError = WeekError::InvalidDate("023025".into()).into();
        assert!(matches!(err, BillingError::InvalidAnchor(_)));
    }

    #[test]
    fn test_from_field_error() {
        use crate::models::{FieldKey, RecipientId, UnitField};

        let err: BillingError = FieldError {
            key: FieldKey::new(
                RecipientId::new(),
                NaiveDate::from_ymd_opt(2025, 6, 9).unwrap(),
                UnitField::WorkUnits,
            ),
            error: UnitError::OutOfRange { value: 25, max: 20 },
        }
        .into();
        assert_eq!(
            err.to_string(),
            "work_units value 25 exceeds the maximum of 20"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let billing_err: BillingError = io_err.into();
        assert!(matches!(billing_err, BillingError::Io(_)));
    }
}
