//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod billing;
pub mod export;
pub mod recipient;
pub mod schedule;

pub use billing::{handle_bill_command, handle_week_command, BillArgs};
pub use export::{handle_export_command, ExportCommands};
pub use recipient::{handle_recipient_command, RecipientCommands};
pub use schedule::{handle_schedule_command, ScheduleCommands};
