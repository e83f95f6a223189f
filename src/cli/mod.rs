pub mod config;
pub mod log;
pub mod process;
pub mod reminder;
pub mod summary;

use std::{env, ffi::OsString};

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::{process_config_command, ConfigCommand};
use log::{process_log_command, LogCommand};
use process::respawn_background_daemon;
use reminder::{process_reminder_command, ReminderCommand};
use summary::{process_summary_command, SummaryCommand};
use tracing::level_filters::LevelFilter;

use crate::{
    daemon::start_daemon,
    utils::{
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX, DAEMON_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Didit", version, long_about = None)]
#[command(about = "A fun CLI-based time/habit tracker", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Log a habit with optional duration")]
    Log {
        #[command(flatten)]
        command: LogCommand,
    },
    #[command(about = "Show habit summary")]
    Summary {
        #[command(flatten)]
        command: SummaryCommand,
    },
    #[command(about = "Configure habits and settings")]
    Config {
        #[command(flatten)]
        command: ConfigCommand,
    },
    #[command(about = "Check for pending goals and show late reminders")]
    Reminder {
        #[command(flatten)]
        command: ReminderCommand,
    },
    #[command(about = "Run the reminder daemon for automatic late reminders")]
    Daemon {
        #[arg(long, help = "Run daemon in background")]
        background: bool,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse_from(with_implied_log(env::args_os().collect()));

    let data_dir = create_application_default_path()?;
    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    let prefix = match &args.commands {
        Commands::Daemon { background: false } => DAEMON_PREFIX,
        _ => CLI_PREFIX,
    };
    enable_logging(prefix, &data_dir, logging_level, args.log)?;

    match args.commands {
        Commands::Log { command } => process_log_command(command, &data_dir),
        Commands::Summary { command } => process_summary_command(command, &data_dir),
        Commands::Config { command } => process_config_command(command, &data_dir),
        Commands::Reminder { command } => process_reminder_command(command, &data_dir),
        Commands::Daemon { background: true } => respawn_background_daemon(),
        Commands::Daemon { background: false } => {
            println!("💡 Press Ctrl+C to stop the daemon");
            println!("✅ Daemon started successfully!");
            start_daemon(data_dir).await
        }
    }
}

const KNOWN_COMMANDS: &[&str] = &[
    "log", "summary", "config", "reminder", "daemon", "help", "version",
];

/// `didit code 2h` reads better than `didit log code 2h`. A first argument
/// that is neither a subcommand nor a flag is treated as a habit name and the
/// log subcommand is spliced in front of it.
fn with_implied_log(mut argv: Vec<OsString>) -> Vec<OsString> {
    if let Some(first) = argv.get(1).and_then(|arg| arg.to_str()) {
        if !first.starts_with('-') && !KNOWN_COMMANDS.contains(&first) {
            argv.insert(1, "log".into());
        }
    }
    argv
}
