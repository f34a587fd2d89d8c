//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for pii-redact using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// pii-redact - PII detection and redaction for text and PDF documents
#[derive(Parser, Debug)]
#[command(name = "pii-redact")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to ./pii-redact.toml when present)
    #[arg(short, long, env = "PII_REDACT_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PII_REDACT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Redact a text argument or standard input
    Text(commands::text::TextArgs),

    /// Redact a .txt or .pdf file
    File(commands::file::FileArgs),

    /// Report detected spans as JSON without redacting
    Scan(commands::scan::ScanArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
