//! Billing week display formatting
//!
//! Renders the resolved week and the unit entry grid for a session.

use std::collections::HashMap;

use crate::models::week::format_date;
use crate::models::{FieldError, FieldKey, Recipient, RecipientId, ResolvedWeek, UnitField, Weekday};
use crate::services::{BillingBatch, BillingSession};

/// Format the five dates of a week, one per line
pub fn format_week(week: &ResolvedWeek) -> String {
    let mut output = String::new();
    for day in Weekday::ALL {
        output.push_str(&format!(
            "{:<10} {}\n",
            day.to_string(),
            format_date(week.date_for(day))
        ));
    }
    output
}

/// Format the unit grid: one row per scheduled slot, grouped by date
pub fn format_billing_grid(session: &BillingSession) -> String {
    let Some(week) = session.week() else {
        return "Enter a Monday anchor date (MMDDYY) to start.".to_string();
    };

    let names = name_lookup(session.recipients());
    if session.schedules().is_empty() {
        return format!("Week of {}\n\nNo schedules found.", week);
    }

    let name_width = names.values().map(|n| n.chars().count()).max().unwrap_or(4).max(4);

    let mut output = format!("Week of {}\n", week);

    for day in Weekday::ALL {
        let date = week.date_for(day);
        let rows: Vec<_> = session
            .schedules()
            .iter()
            .filter(|s| s.weekday == day)
            .filter_map(|s| names.get(&s.recipient_id).map(|name| (s, name)))
            .collect();

        if rows.is_empty() {
            continue;
        }

        output.push_str(&format!("\n{} {}\n", day, format_date(date)));

        for (schedule, name) in rows {
            let field = UnitField::for_service(schedule.service_type);
            let value = session.unit_input(&schedule.key()).unwrap_or("");
            let flag = session
                .field_error(&FieldKey::new(schedule.recipient_id, date, field))
                .map(|e| format!("  ! {}", e))
                .unwrap_or_default();

            output.push_str(&format!(
                "  {:<name_width$}  {:<5} {:>3}{}\n",
                name,
                schedule.service_type.to_string(),
                value,
                flag,
                name_width = name_width,
            ));
        }
    }

    output
}

/// Format flagged cells with recipient names
pub fn format_field_errors(errors: &[FieldError], recipients: &[Recipient]) -> String {
    let names = name_lookup(recipients);
    let mut output = String::new();

    for error in errors {
        let name = names
            .get(&error.key.recipient_id)
            .cloned()
            .unwrap_or_else(|| error.key.recipient_id.to_string());
        output.push_str(&format!(
            "  {} {} {}: {}\n",
            name,
            format_date(error.key.date),
            error.key.field,
            error.error
        ));
    }

    output
}

/// One-line summary of a reconciled batch
pub fn format_batch_summary(batch: &BillingBatch) -> String {
    let work: u32 = batch.entries.iter().filter_map(|e| e.work_units).sum();
    let trips: u32 = batch.entries.iter().filter_map(|e| e.trip_units).sum();

    let mut summary = format!(
        "{} entr{}: {} work unit(s), {} trip(s)",
        batch.entries.len(),
        if batch.entries.len() == 1 { "y" } else { "ies" },
        work,
        trips
    );
    if batch.is_blocked() {
        summary.push_str(&format!(", {} error(s)", batch.errors.len()));
    }
    summary
}

fn name_lookup(recipients: &[Recipient]) -> HashMap<RecipientId, String> {
    recipients.iter().map(|r| (r.id, r.short_name())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{resolve_week, ScheduleEntry, ServiceType, UnitKey, WorkServiceCode};

    #[test]
    fn test_format_week() {
        let week = resolve_week("060925").unwrap();
        let output = format_week(&week);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Monday     06/09/25");
        assert_eq!(lines[4], "Friday     06/13/25");
    }

    #[test]
    fn test_grid_shows_values_and_errors() {
        let jane =
            Recipient::new("Doe", "Jane", "123456789012").with_work_code(WorkServiceCode::Adf);
        let schedule = ScheduleEntry::new(jane.id, Weekday::Tuesday, ServiceType::Work);
        let mut session = BillingSession::new(vec![schedule], vec![jane.clone()]);

        assert!(format_billing_grid(&session).starts_with("Enter a Monday"));

        session.enter_anchor("060925").unwrap();
        session
            .set_unit(UnitKey::new(jane.id, Weekday::Tuesday, ServiceType::Work), "30")
            .unwrap();

        let output = format_billing_grid(&session);
        assert!(output.contains("Tuesday 06/10/25"));
        assert!(output.contains("Doe, J."));
        assert!(output.contains("! Max 20 units"));
        assert!(!output.contains("Monday 06/09/25"));

        let errors = format_field_errors(&session.errors(), session.recipients());
        assert!(errors.contains("Doe, J. 06/10/25 work_units: Max 20 units"));
    }

    #[test]
    fn test_grid_aligns_accented_names() {
        let jose = Recipient::new("Muñoz", "José", "123456789012")
            .with_work_code(WorkServiceCode::Adf);
        let jane =
            Recipient::new("Doe", "Jane", "210987654321").with_work_code(WorkServiceCode::Adf);
        let schedules = vec![
            ScheduleEntry::new(jose.id, Weekday::Monday, ServiceType::Work),
            ScheduleEntry::new(jane.id, Weekday::Monday, ServiceType::Work),
        ];
        let mut session = BillingSession::new(schedules, vec![jose.clone(), jane.clone()]);
        session.enter_anchor("060925").unwrap();

        let output = format_billing_grid(&session);
        let columns: Vec<usize> = output
            .lines()
            .filter(|l| l.contains("Work"))
            .map(|l| l[..l.find("Work").unwrap()].chars().count())
            .collect();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0], columns[1]);
    }
}
