//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{PredictorBackend, RedactConfig};
use super::secret::secret_string_opt;
use crate::domain::errors::RedactError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "PII_REDACT_";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RedactConfig
/// 4. Applies environment variable overrides (PII_REDACT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`RedactError::Configuration`] if the file cannot be read or
/// parsed, a referenced variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use pii_redact::config::load_config;
///
/// let config = load_config("pii-redact.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RedactConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RedactError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RedactError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Configuration without a file: defaults plus environment overrides
pub fn load_default_config() -> Result<RedactConfig> {
    let mut config = RedactConfig::default();
    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

/// Parse and validate TOML configuration text
pub fn parse_config(contents: &str) -> Result<RedactConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: RedactConfig = toml::from_str(&contents)
        .map_err(|e| RedactError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &RedactConfig) -> Result<()> {
    config.validate().map_err(|e| {
        RedactError::Configuration(format!("Configuration validation failed: {}", e))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| RedactError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RedactError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{key}")).ok()
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match env(key) {
        Some(val) => val.parse().map(Some).map_err(|_| {
            RedactError::Configuration(format!("Invalid value for {ENV_PREFIX}{key}: '{val}'"))
        }),
        None => Ok(None),
    }
}

/// Applies environment variable overrides using the PII_REDACT_* prefix
///
/// Variables follow the pattern `PII_REDACT_<SECTION>_<KEY>`, for example
/// `PII_REDACT_PREDICTOR_ENDPOINT` or `PII_REDACT_DETECTION_CHUNK_SIZE`.
fn apply_env_overrides(config: &mut RedactConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Predictor overrides
    if let Some(val) = env("PREDICTOR_BACKEND") {
        config.predictor.backend = match val.to_lowercase().as_str() {
            "http" => PredictorBackend::Http,
            "disabled" => PredictorBackend::Disabled,
            other => {
                return Err(RedactError::Configuration(format!(
                    "Invalid value for {ENV_PREFIX}PREDICTOR_BACKEND: '{other}'"
                )))
            }
        };
    }
    if let Some(val) = env("PREDICTOR_ENDPOINT") {
        config.predictor.endpoint = Some(val);
    }
    if let Some(val) = env("PREDICTOR_API_TOKEN") {
        config.predictor.api_token = secret_string_opt(Some(val));
    }
    if let Some(val) = parse_env("PREDICTOR_TIMEOUT_SECONDS")? {
        config.predictor.timeout_seconds = val;
    }
    if let Some(val) = env("PREDICTOR_MODEL") {
        config.predictor.model = val;
    }

    // Detection overrides
    if let Some(val) = parse_env("DETECTION_CHUNK_SIZE")? {
        config.detection.chunk_size = val;
    }
    if let Some(val) = parse_env("DETECTION_CHUNK_OVERLAP")? {
        config.detection.chunk_overlap = val;
    }
    if let Some(val) = env("DETECTION_PLACEHOLDER") {
        config.detection.placeholder = val;
    }
    if let Some(val) = env("DETECTION_PATTERN_LIBRARY") {
        config.detection.pattern_library = Some(val.into());
    }

    // PDF overrides
    if let Some(val) = parse_env("PDF_OCR_ENABLED")? {
        config.pdf.ocr_enabled = val;
    }
    if let Some(val) = env("PDF_TESSERACT_COMMAND") {
        config.pdf.tesseract_command = val;
    }
    if let Some(val) = parse_env("PDF_LINES_PER_PAGE")? {
        config.pdf.lines_per_page = val;
    }

    // Audit overrides
    if let Some(val) = parse_env("AUDIT_ENABLED")? {
        config.audit.enabled = val;
    }
    if let Some(val) = env("AUDIT_LOG_PATH") {
        config.audit.log_path = val.into();
    }

    // Logging overrides
    if let Some(val) = parse_env("LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env("LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
