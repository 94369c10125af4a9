//! Recipient CLI commands
//!
//! Implements CLI commands for the recipient directory.

use clap::Subcommand;

use crate::display::{format_recipient_details, format_recipient_list};
use crate::error::{BillingError, BillingResult};
use crate::services::{NewRecipient, RecipientService};
use crate::storage::Storage;

/// Recipient subcommands
#[derive(Subcommand)]
pub enum RecipientCommands {
    /// Add a recipient to the directory
    Add {
        /// Last name
        last_name: String,
        /// First name
        first_name: String,
        /// Twelve-digit Medicaid ID
        medicaid_id: String,
        /// Work service code (ADF, AVF or FVF)
        #[arg(short, long)]
        work: Option<String>,
        /// Transportation service code (ATB or FTB)
        #[arg(short, long)]
        trip: Option<String>,
    },
    /// List all recipients
    List,
    /// Show recipient details and schedule
    Show {
        /// Recipient ID or Medicaid ID
        recipient: String,
    },
    /// Delete a recipient and their schedule
    Delete {
        /// Recipient ID or Medicaid ID
        recipient: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a recipient command
pub fn handle_recipient_command(storage: &Storage, cmd: RecipientCommands) -> BillingResult<()> {
    let service = RecipientService::new(storage);

    match cmd {
        RecipientCommands::Add {
            last_name,
            first_name,
            medicaid_id,
            work,
            trip,
        } => {
            let recipient = service.create(NewRecipient {
                last_name,
                first_name,
                medicaid_id,
                work_service_code: work,
                trip_service_code: trip,
            })?;
            println!("Added recipient: {} ({})", recipient, recipient.id);
        }

        RecipientCommands::List => {
            let recipients = service.list()?;
            println!("{}", format_recipient_list(&recipients));
        }

        RecipientCommands::Show { recipient } => {
            let r = service
                .find(&recipient)?
                .ok_or_else(|| BillingError::recipient_not_found(&recipient))?;
            let schedules = storage.schedules.get_by_recipient(r.id)?;
            print!("{}", format_recipient_details(&r, &schedules));
        }

        RecipientCommands::Delete { recipient, force } => {
            let r = service
                .find(&recipient)?
                .ok_or_else(|| BillingError::recipient_not_found(&recipient))?;

            if !force {
                let scheduled = storage.schedules.get_by_recipient(r.id)?.len();
                println!("About to delete recipient: {}", r);
                if scheduled > 0 {
                    println!("This also removes {} schedule entr{}", scheduled, if scheduled == 1 { "y" } else { "ies" });
                }
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let deleted = service.delete(r.id)?;
            println!("Deleted recipient: {}", deleted);
        }
    }

    Ok(())
}
