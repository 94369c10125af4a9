//! Export CLI commands
//!
//! Shows, saves and clears the accumulated billing output.

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::Settings;
use crate::error::BillingResult;
use crate::services::ExportService;
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Print the accumulated flat-file lines
    Show,
    /// Write the flat file to disk
    Save {
        /// Directory to write into (default: current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Remove all accumulated output
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle an export command
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> BillingResult<()> {
    let service = ExportService::new(storage, settings);

    match cmd {
        ExportCommands::Show => {
            let lines = service.fetch_exported_lines()?;
            if lines.is_empty() {
                println!("No billing output yet.");
                return Ok(());
            }
            for line in &lines {
                println!("{}", line);
            }
        }

        ExportCommands::Save { dir } => {
            let file = service.request_export_file()?;
            let path = dir.unwrap_or_else(|| PathBuf::from(".")).join(&file.filename);
            std::fs::write(&path, &file.bytes)?;
            println!("Wrote {} bytes to {}", file.bytes.len(), path.display());
        }

        ExportCommands::Clear { force } => {
            if !force {
                let count = service.fetch_exported_lines()?.len();
                println!("About to remove {} exported line(s)", count);
                println!("Use --force to confirm");
                return Ok(());
            }
            let removed = service.clear_exported_output()?;
            println!("Cleared {} exported line(s)", removed);
        }
    }

    Ok(())
}
