// pii-redact - PII detection and redaction for text and PDF documents
// Copyright (c) 2025 pii-redact Contributors
// Licensed under the MIT License

use pii_redact::cli::commands::{load_settings, EXIT_CONFIG, EXIT_FATAL};
use pii_redact::cli::{Cli, Commands};
use pii_redact::config::{LoggingConfig, RedactConfig};
use pii_redact::domain::{RedactError, Result};
use pii_redact::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref());

    // Console-only logging when the configuration is unusable
    let (log_level, logging_config) = match &settings {
        Ok(config) => (
            cli.log_level
                .clone()
                .unwrap_or_else(|| config.application.log_level.clone()),
            config.logging.clone(),
        ),
        Err(_) => (
            cli.log_level.clone().unwrap_or_else(|| "info".to_string()),
            LoggingConfig::default(),
        ),
    };
    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "pii-redact starting");

    let exit_code = match execute_command(&cli, settings).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, settings: Result<RedactConfig>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::ValidateConfig(args) => args.execute(cli.config.as_deref()).await,
        Commands::Init(args) => args.execute().await,
        Commands::Text(args) => match settings {
            Ok(config) => args.execute(&config).await,
            Err(e) => Ok(config_error(&e)),
        },
        Commands::File(args) => match settings {
            Ok(config) => args.execute(&config).await,
            Err(e) => Ok(config_error(&e)),
        },
        Commands::Scan(args) => match settings {
            Ok(config) => args.execute(&config).await,
            Err(e) => Ok(config_error(&e)),
        },
    }
}

fn config_error(error: &RedactError) -> i32 {
    pii_redact::log_error_with_context!(error, "Failed to load configuration");
    eprintln!("❌ Configuration error: {error}");
    EXIT_CONFIG
}
