//! Display formatting for terminal output
//!
//! Plain-text tables for recipients, schedules and the billing week.

pub mod billing;
pub mod recipient;
pub mod schedule;

pub use billing::{format_batch_summary, format_billing_grid, format_field_errors, format_week};
pub use recipient::{format_recipient_details, format_recipient_list};
pub use schedule::format_schedule_list;
