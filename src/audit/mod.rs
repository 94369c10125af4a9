//! Audit logging for medicaid-billing
//!
//! Records every create, delete, submission and clear in an append-only
//! line-delimited JSON log next to the data directory.
//!
//! - `AuditEntry`: a single entry with timestamp, operation, entity
//!   information and optional before/after values.
//! - `AuditLog`: appends entries to the log file and reads them back.

mod entry;
mod log;

pub use entry::{AuditEntry, EntityType, Operation};
pub use log::AuditLog;
