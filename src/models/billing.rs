//! Billing entry model
//!
//! A dated count of work units or trips for one recipient, plus the
//! per-field caps and error keys used while units are being entered.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::RecipientId;
use super::schedule::ServiceType;
use super::week::format_date;

/// Maximum work units billable for one recipient on one day
pub const MAX_WORK_UNITS: u32 = 20;

/// Maximum trips billable for one recipient on one day
pub const MAX_TRIP_UNITS: u32 = 2;

/// Which unit column of a billing entry a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitField {
    WorkUnits,
    TripUnits,
}

impl UnitField {
    /// The column a service type bills into
    pub fn for_service(service_type: ServiceType) -> Self {
        match service_type {
            ServiceType::Work => Self::WorkUnits,
            ServiceType::Trip => Self::TripUnits,
        }
    }

    /// Per-field cap
    pub fn cap(&self) -> u32 {
        match self {
            Self::WorkUnits => MAX_WORK_UNITS,
            Self::TripUnits => MAX_TRIP_UNITS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorkUnits => "work_units",
            Self::TripUnits => "trip_units",
        }
    }
}

impl fmt::Display for UnitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A billing record for one recipient on one date
///
/// Built transiently for one anchor week and handed to the export side;
/// never stored by the reconciler itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingEntry {
    pub recipient_id: RecipientId,

    pub date: NaiveDate,

    #[serde(default)]
    pub work_units: Option<u32>,

    #[serde(default)]
    pub trip_units: Option<u32>,
}

impl BillingEntry {
    /// Create an entry with both unit fields blank
    pub fn new(recipient_id: RecipientId, date: NaiveDate) -> Self {
        Self {
            recipient_id,
            date,
            work_units: None,
            trip_units: None,
        }
    }

    /// Set one unit field
    pub fn with_units(mut self, field: UnitField, value: u32) -> Self {
        match field {
            UnitField::WorkUnits => self.work_units = Some(value),
            UnitField::TripUnits => self.trip_units = Some(value),
        }
        self
    }

    /// True when neither field is populated (such entries are never submitted)
    pub fn is_empty(&self) -> bool {
        self.work_units.is_none() && self.trip_units.is_none()
    }

    /// Check both fields against their caps
    pub fn validate(&self) -> Result<(), FieldError> {
        for (field, value) in [
            (UnitField::WorkUnits, self.work_units),
            (UnitField::TripUnits, self.trip_units),
        ] {
            if let Some(value) = value {
                if value > field.cap() {
                    return Err(FieldError {
                        key: FieldKey::new(self.recipient_id, self.date, field),
                        error: UnitError::OutOfRange {
                            value,
                            max: field.cap(),
                        },
                    });
                }
            }
        }
        Ok(())
    }
}

/// A billing entry accepted by the export side, with its rendered line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedEntry {
    pub entry: BillingEntry,

    /// Fixed-width flat-file line
    pub line: String,

    pub submitted_at: DateTime<Utc>,
}

/// Parse a typed unit value for a field
///
/// Blank input means "not entered" and yields `Ok(None)`.
pub fn parse_unit_value(field: UnitField, raw: &str) -> Result<Option<u32>, UnitError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let value: u32 = match raw.parse() {
        Ok(value) => value,
        // all digits but wider than u32: still a count, just far over the cap
        Err(_) if raw.bytes().all(|b| b.is_ascii_digit()) => u32::MAX,
        Err(_) => return Err(UnitError::NotANumber(raw.to_string())),
    };

    if value > field.cap() {
        return Err(UnitError::OutOfRange {
            value,
            max: field.cap(),
        });
    }

    Ok(Some(value))
}

/// Problems with a single typed unit value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitError {
    NotANumber(String),
    OutOfRange { value: u32, max: u32 },
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber(raw) => write!(f, "'{}' is not a whole number", raw),
            Self::OutOfRange { max, .. } if *max == MAX_TRIP_UNITS => {
                write!(f, "Max {} trips", max)
            }
            Self::OutOfRange { max, .. } => write!(f, "Max {} units", max),
        }
    }
}

impl std::error::Error for UnitError {}

/// Error key: one input cell of the billing grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldKey {
    pub recipient_id: RecipientId,
    pub date: NaiveDate,
    pub field: UnitField,
}

impl FieldKey {
    pub fn new(recipient_id: RecipientId, date: NaiveDate, field: UnitField) -> Self {
        Self {
            recipient_id,
            date,
            field,
        }
    }
}

/// A flagged unit value, keyed by the cell it was typed into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub key: FieldKey,
    pub error: UnitError,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}: {}",
            self.key.recipient_id,
            format_date(self.key.date),
            self.key.field,
            self.error
        )
    }
}
