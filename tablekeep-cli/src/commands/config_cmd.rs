use clap::{Args, Subcommand};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{CommandResult, OutputFormat};
use crate::config::{Config, ConfigValue, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT_SECS};

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

impl ConfigCommand {
    pub fn run(&self, config: &Config, config_path: Option<PathBuf>) -> CommandResult {
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

                        print_value("api_url", &config.api_url);
                        let masked = ConfigValue::new(
                            if config.api_key.value.is_some() { "********" } else { "(none)" },
                            config.api_key.source,
                        );
                        print_value("api_key", &masked);
                        print_value(
                            "data_dir",
                            &ConfigValue::new(
                                config.data_dir.value.display(),
                                config.data_dir.source,
                            ),
                        );
                        print_value("request_timeout_secs", &config.request_timeout_secs);
                        print_value("offline", &config.offline);
                    }
                }
                Ok(())
            }

            ConfigSubcommand::Init => {
                let config_path = config_path.unwrap_or_else(Config::default_config_path);
                if write_default_config(&config_path)? {
                    println!("Created config file: {}", config_path.display());
                    println!("\nEdit this file to customize your settings.");
                } else {
                    println!("Config file already exists: {}", config_path.display());
                    println!("Use 'tk config show' to view current configuration.");
                }
                Ok(())
            }
        }
    }
}

fn print_value<T: std::fmt::Display>(name: &str, value: &ConfigValue<T>) {
    println!("{}: {}", name, value.value);
    println!("  source: {}", value.source);
    println!();
}

/// Writes a commented starter file. Returns false if one already exists.
fn write_default_config(path: &Path) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let default_config = format!(
        r#"# tablekeep configuration

# Base URL of the tablekeep API
api_url: {}

# API key sent as a bearer token
# api_key: your-key-here

# Where cached data is kept (default: platform data dir + tablekeep)
# data_dir: ~/.local/share/tablekeep

# Seconds before a request is abandoned
request_timeout_secs: {}

# Never contact the server
offline: false
"#,
        DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT_SECS
    );

    let mut file = fs::File::create(path)?;
    file.write_all(default_config.as_bytes())?;
    Ok(true)
}
