//! Fixed-width billing file
//!
//! Each accepted billing entry becomes one 75-character line:
//!
//! | field          | width |
//! |----------------|-------|
//! | provider prefix| 20    |
//! | medicaid id    | 12    |
//! | date YYYYMMDD  | 8     |
//! | service code   | 3     |
//! | work units     | 2     |
//! | trip units     | 2     |
//! | filler         | 28    |

use chrono::NaiveDate;

use crate::error::{BillingError, BillingResult};
use crate::models::{BillingEntry, Recipient, ServiceType};

pub const LINE_WIDTH: usize = 75;
pub const PREFIX_WIDTH: usize = 20;
const FILLER_WIDTH: usize = 28;

/// Render one billing entry as a flat-file line
pub fn format_line(
    provider_prefix: &str,
    recipient: &Recipient,
    entry: &BillingEntry,
) -> BillingResult<String> {
    let service_type = if entry.work_units.is_some() {
        ServiceType::Work
    } else {
        ServiceType::Trip
    };

    let code = recipient.service_code(service_type).ok_or_else(|| {
        BillingError::Export(format!(
            "{} has no {} service code",
            recipient, service_type
        ))
    })?;

    let prefix: String = provider_prefix.chars().take(PREFIX_WIDTH).collect();

    let line = format!(
        "{:<prefix_w$}{:<12}{}{:<3}{:02}{:02}{}",
        prefix,
        recipient.medicaid_id,
        entry.date.format("%Y%m%d"),
        code,
        entry.work_units.unwrap_or(0),
        entry.trip_units.unwrap_or(0),
        " ".repeat(FILLER_WIDTH),
        prefix_w = PREFIX_WIDTH,
    );

    let width = line.chars().count();
    if width != LINE_WIDTH {
        return Err(BillingError::Export(format!(
            "Line width invalid: {} (expected {})",
            width, LINE_WIDTH
        )));
    }

    Ok(line)
}

/// Join lines into the downloadable file body
pub fn to_bytes(lines: &[String]) -> Vec<u8> {
    lines.join("\n").into_bytes()
}

/// Suggested file name, `<stem>_<YYYYMMDD>.txt`
pub fn file_name(stem: &str, date: NaiveDate) -> String {
    format!("{}_{}.txt", stem, date.format("%Y%m%d"))
}
