//! Week and billing CLI commands
//!
//! `week` resolves an anchor date; `bill` runs a full billing session for
//! one week from unit values given as flags or a CSV file.

use std::path::PathBuf;

use clap::Args;

use crate::config::Settings;
use crate::display::{format_batch_summary, format_billing_grid, format_field_errors, format_week};
use crate::error::{BillingError, BillingResult};
use crate::models::{resolve_week, ServiceType, UnitKey, Weekday};
use crate::services::{
    BillingSession, ExportService, ImportService, RecipientService, ScheduleService, SessionState,
};
use crate::storage::Storage;

/// Arguments for `billing bill`
#[derive(Args)]
pub struct BillArgs {
    /// Monday anchor date (MMDDYY or MM/DD/YY)
    pub anchor: String,

    /// Unit value as RECIPIENT:WEEKDAY:TYPE=N (repeatable)
    #[arg(short, long = "unit", value_name = "R:DAY:TYPE=N")]
    pub units: Vec<String>,

    /// CSV file with recipient,weekday,service_type,units rows
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Show the batch without submitting it
    #[arg(long)]
    pub dry_run: bool,
}

/// Print the five dates of the week starting at `anchor`
pub fn handle_week_command(anchor: &str) -> BillingResult<()> {
    let week = resolve_week(anchor)?;
    print!("{}", format_week(&week));
    Ok(())
}

/// Run a billing session for one week and submit it to the export
pub fn handle_bill_command(storage: &Storage, settings: &Settings, args: BillArgs) -> BillingResult<()> {
    let schedules = ScheduleService::new(storage)
        .list()?
        .into_iter()
        .map(|l| l.entry)
        .collect();
    let recipients = RecipientService::new(storage).list()?;

    let mut session = BillingSession::new(schedules, recipients);
    if session.enter_anchor(&args.anchor)? == SessionState::Empty {
        return Err(BillingError::InvalidAnchor(format!(
            "'{}' is incomplete (expected MMDDYY)",
            args.anchor
        )));
    }

    let mut inputs = Vec::new();

    if let Some(path) = &args.file {
        let import = ImportService::new(storage).parse_units_file(path)?;
        for row in &import.errors {
            eprintln!("Skipping line {}: {}", row.line, row.message);
        }
        inputs.extend(import.inputs);
    }

    for flag in &args.units {
        inputs.push(parse_unit_flag(storage, flag)?);
    }

    for (key, raw) in inputs {
        match session.set_unit(key, &raw) {
            Ok(_) => {}
            Err(BillingError::Validation(msg)) => eprintln!("Ignoring value '{}': {}", raw, msg),
            Err(e) => return Err(e),
        }
    }

    print!("{}", format_billing_grid(&session));

    if session.has_errors() {
        println!("\nFix these values before submitting:");
        print!("{}", format_field_errors(&session.errors(), session.recipients()));
        return Err(BillingError::SubmissionBlocked {
            errors: session.errors(),
        });
    }

    let batch = session.preview()?;
    println!("\n{}", format_batch_summary(&batch));

    if args.dry_run {
        println!("Dry run: nothing submitted");
        return Ok(());
    }

    let export = ExportService::new(storage, settings);
    let submitted = session.submit(&export)?;
    println!(
        "Submitted {} billing entr{}",
        submitted,
        if submitted == 1 { "y" } else { "ies" }
    );

    Ok(())
}

/// Parse `RECIPIENT:WEEKDAY:TYPE=N`
fn parse_unit_flag(storage: &Storage, flag: &str) -> BillingResult<(UnitKey, String)> {
    let invalid = || {
        BillingError::Validation(format!(
            "'{}' should look like RECIPIENT:WEEKDAY:TYPE=N",
            flag
        ))
    };

    let (slot, value) = flag.rsplit_once('=').ok_or_else(invalid)?;
    let mut parts = slot.split(':');
    let (Some(recipient), Some(weekday), Some(service_type), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let recipient = RecipientService::new(storage)
        .find(recipient)?
        .ok_or_else(|| BillingError::UnknownRecipient(recipient.to_string()))?;
    let weekday = Weekday::parse(weekday)
        .ok_or_else(|| BillingError::Validation(format!("'{}' is not a weekday", weekday)))?;
    let service_type = ServiceType::parse(service_type).ok_or_else(|| {
        BillingError::Validation(format!("'{}' is not a service type", service_type))
    })?;

    Ok((
        UnitKey::new(recipient.id, weekday, service_type),
        value.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BillingPaths;
    use crate::models::Recipient;
    use tempfile::TempDir;

    #[test]
    fn test_parse_unit_flag() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BillingPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        let jane = Recipient::new("Doe", "Jane", "123456789012");
        storage.recipients.upsert(jane.clone()).unwrap();

        let (key, value) = parse_unit_flag(&storage, "123456789012:mon:work=6").unwrap();
        assert_eq!(key, UnitKey::new(jane.id, Weekday::Monday, ServiceType::Work));
        assert_eq!(value, "6");

        assert!(parse_unit_flag(&storage, "123456789012:mon=6")
            .unwrap_err()
            .is_validation());
        assert!(parse_unit_flag(&storage, "123456789012:mon:work").is_err());
        assert!(matches!(
            parse_unit_flag(&storage, "000000000000:mon:work=1"),
            Err(BillingError::UnknownRecipient(_))
        ));
    }
}
