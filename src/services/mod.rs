//! Service layer for medicaid-billing
//!
//! The service layer provides business logic on top of the storage layer:
//! directory and registry validation, week reconciliation and export.

pub mod billing;
pub mod export;
pub mod import;
pub mod recipient;
pub mod schedule;

pub use billing::{build_billing_batch, BatchSink, BillingBatch, BillingSession, SessionState, UnitInputs};
pub use export::{ExportFile, ExportService};
pub use import::{ImportRowError, ImportService, UnitImport};
pub use recipient::{is_valid_service_code, NewRecipient, RecipientService};
pub use schedule::{ScheduleListing, ScheduleService};
