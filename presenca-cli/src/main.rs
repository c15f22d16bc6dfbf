use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod context;
mod session;

use commands::{
    AuthCommand, ClassCommand, ConfigCommand, RecordCommand, ReportCommand, SyncCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "presenca")]
#[command(version)]
#[command(about = "Church class attendance from the command line", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and out
    Auth(AuthCommand),

    /// Classes and their rosters
    Class(ClassCommand),

    /// Attendance records
    Record(RecordCommand),

    /// Attendance totals
    Report(ReportCommand),

    /// Reload from the server
    Sync(SyncCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "presenca=warn,presenca_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let cli_config_path = cli.config.clone();
    let config = Config::load(cli.config)?;

    match &cli.command {
        Some(Commands::Auth(cmd)) => cmd.run(&config),
        Some(Commands::Class(cmd)) => cmd.run(&config),
        Some(Commands::Record(cmd)) => cmd.run(&config),
        Some(Commands::Report(cmd)) => cmd.run(&config),
        Some(Commands::Sync(cmd)) => cmd.run(&config),
        Some(Commands::Config(cmd)) => cmd.run(&config, cli_config_path),
        None => {
            println!("Use --help to see available commands");
            Ok(())
        }
    }
}
