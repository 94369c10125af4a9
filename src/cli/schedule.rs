//! Schedule CLI commands

use clap::Subcommand;

use crate::display::format_schedule_list;
use crate::error::{BillingError, BillingResult};
use crate::models::Weekday;
use crate::services::{RecipientService, ScheduleService};
use crate::storage::Storage;

/// Schedule subcommands
#[derive(Subcommand)]
pub enum ScheduleCommands {
    /// Schedule a recipient for a weekday and service type
    Add {
        /// Recipient ID or Medicaid ID
        recipient: String,
        /// Weekday (monday through friday)
        weekday: String,
        /// Service type (work or trip)
        service_type: String,
    },
    /// List schedules in weekday order
    List {
        /// Only show one weekday
        #[arg(short, long)]
        day: Option<String>,
    },
    /// Delete a schedule entry
    Delete {
        /// Schedule ID
        schedule: String,
    },
}

/// Handle a schedule command
pub fn handle_schedule_command(storage: &Storage, cmd: ScheduleCommands) -> BillingResult<()> {
    let service = ScheduleService::new(storage);

    match cmd {
        ScheduleCommands::Add {
            recipient,
            weekday,
            service_type,
        } => {
            let recipient_id = match RecipientService::new(storage).find(&recipient)? {
                Some(r) => r.id,
                None => return Err(BillingError::UnknownRecipient(recipient)),
            };

            let entry = service.add_schedule(recipient_id, &weekday, &service_type)?;
            println!(
                "Scheduled {} on {} ({})",
                entry.service_type, entry.weekday, entry.id
            );
        }

        ScheduleCommands::List { day } => {
            let listings = match day {
                Some(day) => {
                    let weekday = Weekday::parse(&day).ok_or_else(|| {
                        BillingError::Validation(format!("'{}' is not a weekday", day))
                    })?;
                    service.list_for_weekday(weekday)?
                }
                None => service.list()?,
            };
            println!("{}", format_schedule_list(&listings));
        }

        ScheduleCommands::Delete { schedule } => match service.find(&schedule)? {
            Some(entry) => {
                service.delete_schedule(entry.id)?;
                println!("Deleted schedule: {} {} ({})", entry.weekday, entry.service_type, entry.id);
            }
            None => println!("No schedule matching '{}'; nothing deleted", schedule),
        },
    }

    Ok(())
}
