//! Schedule model
//!
//! A recurring weekly commitment: one recipient, one weekday, one service
//! type. Weekday and service-type strings are canonicalized here and
//! nowhere else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{RecipientId, ScheduleId};

/// A billable weekday (Monday through Friday)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// All billable weekdays in week order
    pub const ALL: [Weekday; 5] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
    ];

    /// Parse a weekday (case-insensitive, full name or three-letter abbreviation)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "monday" | "mon" => Some(Self::Monday),
            "tuesday" | "tue" => Some(Self::Tuesday),
            "wednesday" | "wed" => Some(Self::Wednesday),
            "thursday" | "thu" => Some(Self::Thursday),
            "friday" | "fri" => Some(Self::Friday),
            _ => None,
        }
    }

    /// Offset from Monday (0 = Monday .. 4 = Friday)
    pub fn index(&self) -> usize {
        match self {
            Self::Monday => 0,
            Self::Tuesday => 1,
            Self::Wednesday => 2,
            Self::Thursday => 3,
            Self::Friday => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monday => write!(f, "Monday"),
            Self::Tuesday => write!(f, "Tuesday"),
            Self::Wednesday => write!(f, "Wednesday"),
            Self::Thursday => write!(f, "Thursday"),
            Self::Friday => write!(f, "Friday"),
        }
    }
}

/// Kind of billable service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// Day program work, billed in units
    Work,
    /// Transportation, billed in trips
    Trip,
}

impl ServiceType {
    pub const ALL: [ServiceType; 2] = [Self::Work, Self::Trip];

    /// Parse a service type (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "work" => Some(Self::Work),
            "trip" | "transportation" => Some(Self::Trip),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Trip => "trip",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Work => write!(f, "Work"),
            Self::Trip => write!(f, "Trip"),
        }
    }
}

/// A recurring weekly service assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: ScheduleId,

    /// Non-owning reference into the recipient directory
    pub recipient_id: RecipientId,

    pub weekday: Weekday,

    pub service_type: ServiceType,

    pub created_at: DateTime<Utc>,
}

impl ScheduleEntry {
    /// Create a new schedule entry with a fresh id
    pub fn new(recipient_id: RecipientId, weekday: Weekday, service_type: ServiceType) -> Self {
        Self {
            id: ScheduleId::new(),
            recipient_id,
            weekday,
            service_type,
            created_at: Utc::now(),
        }
    }

    /// The uniqueness key of this entry
    pub fn key(&self) -> UnitKey {
        UnitKey::new(self.recipient_id, self.weekday, self.service_type)
    }
}

/// Composite key (recipient, weekday, service type)
///
/// Identifies a schedule slot and the unit input typed against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitKey {
    pub recipient_id: RecipientId,
    pub weekday: Weekday,
    pub service_type: ServiceType,
}

impl UnitKey {
    pub fn new(recipient_id: RecipientId, weekday: Weekday, service_type: ServiceType) -> Self {
        Self {
            recipient_id,
            weekday,
            service_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_parse() {
        assert_eq!(Weekday::parse("Monday"), Some(Weekday::Monday));
        assert_eq!(Weekday::parse("  FRIDAY "), Some(Weekday::Friday));
        assert_eq!(Weekday::parse("wed"), Some(Weekday::Wednesday));
        assert_eq!(Weekday::parse("saturday"), None);
        assert_eq!(Weekday::parse(""), None);
    }

    #[test]
    fn test_weekday_index_matches_order() {
        for (i, day) in Weekday::ALL.iter().enumerate() {
            assert_eq!(day.index(), i);
        }
        assert!(Weekday::Monday < Weekday::Friday);
    }

    #[test]
    fn test_service_type_parse() {
        assert_eq!(ServiceType::parse("WORK"), Some(ServiceType::Work));
        assert_eq!(ServiceType::parse("Trip"), Some(ServiceType::Trip));
        assert_eq!(ServiceType::parse("lunch"), None);
    }

    #[test]
    fn test_entry_key() {
        let recipient = RecipientId::new();
        let a = ScheduleEntry::new(recipient, Weekday::Monday, ServiceType::Work);
        let b = ScheduleEntry::new(recipient, Weekday::Monday, ServiceType::Work);

        assert_ne!(a.id, b.id);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_serialization_is_lowercase() {
        let entry = ScheduleEntry::new(RecipientId::new(), Weekday::Tuesday, ServiceType::Trip);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["weekday"], "tuesday");
        assert_eq!(json["service_type"], "trip");
    }
}
