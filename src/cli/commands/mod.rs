//! CLI command implementations
//!
//! This module contains all CLI command implementations and the helpers they
//! share for loading configuration and building the engine.

pub mod file;
pub mod init;
pub mod scan;
pub mod text;
pub mod validate;

use crate::config::{load_config, load_default_config, RedactConfig};
use crate::domain::Result;
use crate::model::shared_predictor;
use crate::pipeline::RedactionEngine;
use std::path::Path;

/// Configuration file picked up when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "pii-redact.toml";

/// Successful run
pub const EXIT_OK: i32 = 0;
/// Configuration could not be loaded or is invalid
pub const EXIT_CONFIG: i32 = 2;
/// A document could not be processed
pub const EXIT_PROCESSING: i32 = 3;
/// Unexpected failure
pub const EXIT_FATAL: i32 = 5;

/// Load configuration from `path`, the default file, or defaults plus
/// environment overrides, in that order
pub fn load_settings(path: Option<&str>) -> Result<RedactConfig> {
    match path {
        Some(path) => load_config(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => load_config(DEFAULT_CONFIG_FILE),
        None => load_default_config(),
    }
}

/// Build the engine around the process-wide predictor
pub fn build_engine(config: &RedactConfig) -> Result<RedactionEngine> {
    let predictor = shared_predictor(&config.predictor)?;
    RedactionEngine::from_config(config, predictor)
}
