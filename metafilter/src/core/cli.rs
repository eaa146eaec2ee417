use clap::{Parser, Subcommand, ValueEnum};

use std::path::PathBuf;

use super::constants::{
    APP_NAME_LOWER, ENV_BACKEND, ENV_CONFIG, ENV_METADATA_COLUMN, ENV_SPECIFIC_COLUMNS,
};
use crate::data::sql::Backend;

#[derive(Parser)]
#[command(name = APP_NAME_LOWER)]
#[command(
    version,
    about = "Compile metadata filters into parameterized SQL WHERE clauses",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Target SQL backend (hana or duckdb)
    #[arg(long, short = 'b', global = true, env = ENV_BACKEND, value_parser = Backend::parse)]
    pub backend: Option<Backend>,

    /// JSON column holding generic metadata
    #[arg(long, global = true, env = ENV_METADATA_COLUMN)]
    pub metadata_column: Option<String>,

    /// Property keys backed by dedicated columns (comma separated or repeated)
    #[arg(
        long = "specific-column",
        global = true,
        env = ENV_SPECIFIC_COLUMNS,
        value_delimiter = ','
    )]
    pub specific_columns: Option<Vec<String>>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Compile a filter and print the WHERE clause with its parameters
    Compile {
        /// Filter JSON (reads --file or stdin when omitted)
        filter: Option<String>,

        /// Read the filter JSON from a file
        #[arg(long, short = 'f', conflicts_with = "filter")]
        file: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List supported operators and their SQL rendering
    Operators,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub backend: Option<Backend>,
    pub metadata_column: Option<String>,
    pub specific_columns: Option<Vec<String>>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        backend: cli.backend,
        metadata_column: cli.metadata_column,
        specific_columns: cli.specific_columns.map(|columns| {
            columns
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect()
        }),
    };
    (config, cli.command)
}
