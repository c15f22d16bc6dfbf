use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::{Config, ConfigSource};

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init,
}

const DEFAULT_CONFIG: &str = r#"# presenca configuration

# Directory for snapshots and the session (default: platform data dir)
# data_dir: ~/.local/share/presenca

api:
  # Attendance API root
  base_url: http://localhost:3000/api

  # Use built-in demo data instead of the server
  use_mock: true

  # Request timeout in seconds
  timeout_secs: 10

  # Records fetched per page
  page_size: 100

  # Simulated delay of the demo server, in milliseconds
  mock_latency_ms: 300

  # Reload from the server before listing
  auto_refresh: true
"#;

impl ConfigCommand {
    pub fn run(
        &self,
        config: &Config,
        cli_config_path: Option<PathBuf>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        print_value(
                            "data_dir",
                            config.data_dir.value.display(),
                            &config.data_dir.source,
                        );
                        let api = &config.api;
                        print_value("api.base_url", &api.base_url.value, &api.base_url.source);
                        print_value("api.use_mock", api.use_mock.value, &api.use_mock.source);
                        print_value(
                            "api.timeout_secs",
                            api.timeout_secs.value,
                            &api.timeout_secs.source,
                        );
                        print_value("api.page_size", api.page_size.value, &api.page_size.source);
                        print_value(
                            "api.mock_latency_ms",
                            api.mock_latency_ms.value,
                            &api.mock_latency_ms.source,
                        );
                        print_value(
                            "api.auto_refresh",
                            api.auto_refresh.value,
                            &api.auto_refresh.source,
                        );
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = cli_config_path.unwrap_or_else(Config::default_config_path);

                if config_path.exists() {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'presenca config show' to view current configuration.");
                    return Ok(());
                }

                if let Some(parent) = config_path.parent() {
                    fs::create_dir_all(parent)?;
                }

                let mut file = fs::File::create(&config_path)?;
                file.write_all(DEFAULT_CONFIG.as_bytes())?;

                println!("Created config file: {}", config_path.display());
                println!("\nEdit this file to customize your settings.");
                Ok(())
            }
        }
    }
}

fn print_value(key: &str, value: impl std::fmt::Display, source: &ConfigSource) {
    println!("{}: {}", key, value);
    println!("  source: {}", source);
    println!();
}
