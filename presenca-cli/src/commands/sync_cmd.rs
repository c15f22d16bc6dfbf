//! Reload everything from the server.

use clap::{Args, Subcommand};

use crate::config::Config;
use crate::context::{print_failures, Context, Refresh};

/// Reload classes, rosters and records from the server
#[derive(Debug, Args)]
pub struct SyncCommand {
    #[command(subcommand)]
    command: Option<SyncSubcommand>,
}

#[derive(Debug, Subcommand)]
enum SyncSubcommand {
    /// Reload only the attendance records
    Records,
    /// Reload only the class rosters
    Rosters,
}

impl SyncCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(async {
            let mut ctx = Context::open(config, Refresh::Never).await?;

            println!("Syncing with server...");
            println!();

            let result = match &self.command {
                None => ctx.gateway.load_all().await.map(|report| {
                    println!("  ✓ {} classes", report.classes);
                    println!("  ✓ {} students", report.students);
                    println!("  ✓ {} records", report.records);
                    report
                }),
                Some(SyncSubcommand::Records) => {
                    ctx.gateway.reload_records().await.map(|count| {
                        println!("  ✓ {} records", count);
                        Default::default()
                    })
                }
                Some(SyncSubcommand::Rosters) => ctx.gateway.reload_rosters().await.map(|report| {
                    println!("  ✓ {} classes", report.classes);
                    println!("  ✓ {} students", report.students);
                    report
                }),
            };
            ctx.close().await;

            let report = result?;
            println!();
            if report.is_complete() {
                println!("Sync complete.");
            } else {
                print_failures(&report);
                println!("Sync finished with {} failure(s).", report.failures.len());
            }
            Ok(())
        })
    }
}
