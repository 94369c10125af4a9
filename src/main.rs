use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::fmt::time::ChronoLocal;

use medicaid_billing::cli::{
    handle_bill_command, handle_export_command, handle_recipient_command,
    handle_schedule_command, handle_week_command, BillArgs, ExportCommands, RecipientCommands,
    ScheduleCommands,
};
use medicaid_billing::config::{BillingPaths, Settings};
use medicaid_billing::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "billing",
    version,
    about = "Medicaid recipient scheduling and weekly billing",
    long_about = "Keeps a directory of Medicaid service recipients and their weekly \
                  work and transportation schedules, turns a Monday anchor date into \
                  that week's billing dates, and accumulates the accepted unit counts \
                  into a fixed-width flat file for upload."
)]
struct Cli {
    /// Data directory (overrides the default location)
    #[arg(long, global = true, env = "BILLING_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show or change configuration
    Config {
        /// Provider identifier written at the start of each export line
        #[arg(long)]
        provider_prefix: Option<String>,
        /// Stem of the exported file name
        #[arg(long)]
        file_stem: Option<String>,
    },

    /// Recipient directory commands
    #[command(subcommand)]
    Recipient(RecipientCommands),

    /// Weekly schedule commands
    #[command(subcommand)]
    Schedule(ScheduleCommands),

    /// Show the billing dates for the week starting on a Monday
    Week {
        /// Monday anchor date (MMDDYY or MM/DD/YY)
        anchor: String,
    },

    /// Enter units for a week and submit them to the export
    Bill(BillArgs),

    /// Accumulated billing output
    #[command(subcommand)]
    Export(ExportCommands),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // `week` is pure and needs no data directory
    if let Some(Commands::Week { anchor }) = &cli.command {
        handle_week_command(anchor)?;
        return Ok(());
    }

    let paths = match cli.data_dir {
        Some(dir) => BillingPaths::with_base_dir(dir),
        None => BillingPaths::new()?,
    };
    let mut settings = Settings::load_or_create(&paths)?;
    debug!(base_dir = %paths.base_dir().display(), "paths resolved");

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing billing data at: {}", paths.base_dir().display());
            initialize_storage(&paths, &mut settings)?;
            println!("Initialization complete!");
            println!();
            if settings.provider_prefix.is_empty() {
                println!("Set the provider prefix for export lines with:");
                println!("  billing config --provider-prefix <PREFIX>");
            }
        }
        Some(Commands::Config {
            provider_prefix,
            file_stem,
        }) => {
            let changed = provider_prefix.is_some() || file_stem.is_some();
            if let Some(prefix) = provider_prefix {
                settings.provider_prefix = prefix;
            }
            if let Some(stem) = file_stem {
                settings.export_file_stem = stem;
            }
            if changed {
                settings.save(&paths)?;
            }

            println!("Billing Configuration");
            println!("=====================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Provider prefix:  {}", settings.provider_prefix);
            println!("  Export file stem: {}", settings.export_file_stem);
        }
        Some(Commands::Recipient(cmd)) => handle_recipient_command(&storage, cmd)?,
        Some(Commands::Schedule(cmd)) => handle_schedule_command(&storage, cmd)?,
        Some(Commands::Bill(args)) => handle_bill_command(&storage, &settings, args)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, &settings, cmd)?,
        Some(Commands::Week { .. }) => {}
        None => {
            println!("billing - Medicaid recipient scheduling and weekly billing");
            println!();
            println!("Run 'billing --help' for usage information.");
        }
    }

    Ok(())
}
