//! Core data models for medicaid-billing
//!
//! This module contains the data structures of the billing domain:
//! recipients, weekly schedules, resolved billing weeks and billing entries.

pub mod billing;
pub mod ids;
pub mod recipient;
pub mod schedule;
pub mod week;

pub use billing::{
    BillingEntry, ExportedEntry, FieldError, FieldKey, UnitError, UnitField, MAX_TRIP_UNITS, MAX_WORK_UNITS,
};
pub use ids::{RecipientId, ScheduleId};
pub use recipient::{Recipient, RecipientValidationError, TripServiceCode, WorkServiceCode};
pub use schedule::{ScheduleEntry, ServiceType, UnitKey, Weekday};
pub use week::{resolve_week, ResolvedWeek, WeekError};
