mod auth;
mod class;
mod config_cmd;
mod record;
mod report;
mod sync_cmd;

pub use auth::AuthCommand;
pub use class::ClassCommand;
pub use config_cmd::ConfigCommand;
pub use record::{RecordCommand, RecordSubcommand};
pub use report::ReportCommand;
pub use sync_cmd::SyncCommand;

use clap::ValueEnum;
use std::io::{self, Write};

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Asks a yes/no question on stdin. Anything but `y` is a no.
fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Converts a 1-based position from the command line to an index.
fn to_index(position: usize) -> Result<usize, String> {
    position
        .checked_sub(1)
        .ok_or_else(|| "Positions start at 1".to_string())
}
