//! medicaid-billing - recipient scheduling and weekly Medicaid billing
//!
//! Keeps a directory of service recipients and their recurring weekly
//! schedules, resolves a Monday anchor into that week's billing dates, and
//! reconciles typed unit counts into billing entries that accumulate in a
//! fixed-width flat file.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (recipients, schedules, weeks, billing entries)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `export`: Flat-file rendering
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use medicaid_billing::models::resolve_week;
//!
//! let week = resolve_week("06/09/25")?;
//! assert_eq!(week.formatted()[4], "06/13/25");
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{BillingError, BillingResult};
