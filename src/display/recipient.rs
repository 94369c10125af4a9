//! Recipient display formatting
//!
//! Formats recipients for terminal output in table and detail views.

use crate::models::{Recipient, ScheduleEntry};

/// Format the recipient directory as a table
pub fn format_recipient_list(recipients: &[Recipient]) -> String {
    if recipients.is_empty() {
        return "No recipients found.".to_string();
    }

    let name_width = recipients
        .iter()
        .map(|r| r.to_string().chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<name_width$}  {:<12}  {:<4}  {:<4}\n",
        "ID",
        "Name",
        "Medicaid ID",
        "Work",
        "Trip",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<name_width$}  {:-<12}  {:-<4}  {:-<4}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for recipient in recipients {
        output.push_str(&format!(
            "{:<12}  {:<name_width$}  {:<12}  {:<4}  {:<4}\n",
            recipient.id.to_string(),
            recipient.to_string(),
            recipient.medicaid_id,
            recipient.work_service_code.map(|c| c.as_str()).unwrap_or("-"),
            recipient.trip_service_code.map(|c| c.as_str()).unwrap_or("-"),
            name_width = name_width,
        ));
    }

    output.push_str(&format!("\n{} recipient(s)\n", recipients.len()));
    output
}

/// Format a single recipient with their weekly schedule
pub fn format_recipient_details(recipient: &Recipient, schedules: &[ScheduleEntry]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Recipient: {}\n", recipient));
    output.push_str(&format!("  ID:             {}\n", recipient.id));
    output.push_str(&format!("  Medicaid ID:    {}\n", recipient.medicaid_id));
    output.push_str(&format!(
        "  Work code:      {}\n",
        recipient.work_service_code.map(|c| c.as_str()).unwrap_or("(none)")
    ));
    output.push_str(&format!(
        "  Trip code:      {}\n",
        recipient.trip_service_code.map(|c| c.as_str()).unwrap_or("(none)")
    ));
    output.push_str(&format!(
        "  Added:          {}\n",
        recipient.created_at.format("%Y-%m-%d")
    ));

    if schedules.is_empty() {
        output.push_str("  Schedule:       (none)\n");
        return output;
    }

    let mut sorted: Vec<&ScheduleEntry> = schedules.iter().collect();
    sorted.sort_by_key(|s| (s.weekday, s.service_type));

    output.push_str("  Schedule:\n");
    for entry in sorted {
        output.push_str(&format!(
            "    {:<10} {:<5} {}\n",
            entry.weekday.to_string(),
            entry.service_type.to_string(),
            entry.id
        ));
    }

    output
}
