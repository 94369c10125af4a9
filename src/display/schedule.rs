//! Schedule display formatting

use crate::services::ScheduleListing;

/// Format the registry listing, grouped under weekday headings
///
/// Expects listings already in registry order.
pub fn format_schedule_list(listings: &[ScheduleListing]) -> String {
    if listings.is_empty() {
        return "No schedules found.".to_string();
    }

    let name_width = listings
        .iter()
        .map(|l| l.recipient.to_string().chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    let mut current_day = None;

    for listing in listings {
        if current_day != Some(listing.entry.weekday) {
            if current_day.is_some() {
                output.push('\n');
            }
            output.push_str(&format!("{}\n", listing.entry.weekday));
            current_day = Some(listing.entry.weekday);
        }

        let code = listing
            .recipient
            .service_code(listing.entry.service_type)
            .unwrap_or("-");

        output.push_str(&format!(
            "  {:<12}  {:<name_width$}  {:<5} {}\n",
            listing.entry.id.to_string(),
            listing.recipient.to_string(),
            listing.entry.service_type.to_string(),
            code,
            name_width = name_width,
        ));
    }

    output
}
