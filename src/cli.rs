//! Command-line definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI tool for the GIS.ph API
#[derive(Parser, Debug)]
#[command(name = "gisph", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(long, value_name = "FILE", env = "GISPH_CONFIG", global = true)]
    pub config_file: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage and view regions
    #[command(subcommand)]
    Regions(RegionsCommands),
    /// Manage CLI configuration
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Update the CLI to the latest version
    Update(UpdateArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum RegionsCommands {
    /// List all regions
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Limit number of results
        #[arg(short, long)]
        limit: Option<u32>,
        /// Filter results (e.g., status:active)
        #[arg(long, value_name = "FIELD:VALUE")]
        filter: Option<String>,
    },
    /// Get details of a specific region
    Get {
        /// Region ID
        id: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key (apiUrl, apiKey)
        key: String,
        /// Configuration value
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// List all configuration values
    List,
    /// Delete a configuration value
    Delete {
        /// Configuration key
        key: String,
    },
    /// Enable or disable automatic update checks
    AutoUpdate {
        /// Action: enable or disable
        action: String,
    },
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Check for updates without installing
    #[arg(long)]
    pub check: bool,
    /// Force update even if already on latest version
    #[arg(long)]
    pub force: bool,
}
