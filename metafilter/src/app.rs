use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::cli::{self, CliConfig, Commands, OutputFormat};
use crate::core::config::AppConfig;
use crate::core::constants::{DEFAULT_LOG_FILTER, ENV_LOG};
use crate::data::filters::{COLUMN_OPERATORS, LogicalOp, WhereClause, WhereClauseBuilder};

/// Command line application
pub struct CoreApp;

impl CoreApp {
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        let (cli_config, command) = cli::parse();
        Self::init_logging();
        Self::dispatch(command, &cli_config)
    }

    /// Run one command; configuration is only loaded by commands that use it
    fn dispatch(command: Commands, cli_config: &CliConfig) -> Result<()> {
        match command {
            Commands::Compile {
                filter,
                file,
                format,
            } => {
                let config = AppConfig::load(cli_config)?;
                let builder = WhereClauseBuilder::new(config.filter)?;
                let json = Self::read_filter(filter, file)?;
                let clause = builder
                    .build_str(&json)
                    .context("Failed to compile filter")?;
                Self::print_clause(&clause, format)
            }
            Commands::Operators => {
                Self::print_operators();
                Ok(())
            }
        }
    }

    fn init_logging() {
        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .with_writer(std::io::stderr)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    /// Filter JSON from the argument, a file, or stdin (in that order)
    fn read_filter(filter: Option<String>, file: Option<PathBuf>) -> Result<String> {
        if let Some(filter) = filter {
            return Ok(filter);
        }
        if let Some(path) = file {
            return std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read filter file: {}", path.display()));
        }
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read filter from stdin")?;
        Ok(input)
    }

    fn print_clause(clause: &WhereClause, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(clause)?);
            }
            OutputFormat::Text => {
                if clause.is_empty() {
                    println!("(no filter)");
                    return Ok(());
                }
                println!("{}", clause.sql);
                for (i, param) in clause.params.iter().enumerate() {
                    println!("  {}: {}", i + 1, param);
                }
            }
        }
        Ok(())
    }

    fn print_operators() {
        for op in [LogicalOp::And, LogicalOp::Or] {
            println!("{:<10} {:<8} logical", op.symbol(), op.sql_keyword());
        }
        for spec in COLUMN_OPERATORS {
            println!(
                "{:<10} {:<8} {:?}",
                spec.symbol,
                spec.sql,
                spec.rendering
            );
        }
    }
}
