//! Pattern library for PII detection

use crate::domain::PiiLabel;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Pattern family definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Family name, used in error messages and logs
    pub name: String,
    /// Taxonomy tag reported for matches
    pub label: String,
    /// Confidence score (0.0 - 1.0)
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    /// Regex patterns for this family
    pub patterns: Vec<String>,
}

fn default_confidence() -> f32 {
    1.0
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Family name
    pub name: String,
    /// Compiled regex
    pub regex: Regex,
    /// Reported label
    pub label: PiiLabel,
    /// Confidence score
    pub confidence: f32,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: Vec<PatternDefinition>,
}

/// Ordered registry of compiled pattern families
#[derive(Debug)]
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
}

impl PatternRegistry {
    /// Create a new pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read pattern library: {}",
                path.as_ref().display()
            )
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary =
            toml::from_str(content).context("Failed to parse pattern library TOML")?;

        let mut patterns = Vec::new();

        for def in library.patterns {
            let label = Self::parse_label(&def.label).with_context(|| {
                format!("Invalid label in pattern '{}': {}", def.name, def.label)
            })?;

            if !(0.0..=1.0).contains(&def.confidence) {
                anyhow::bail!(
                    "Confidence for pattern '{}' must be within [0, 1], got {}",
                    def.name,
                    def.confidence
                );
            }

            for pattern_str in &def.patterns {
                let regex = Regex::new(pattern_str).with_context(|| {
                    format!("Invalid regex in pattern '{}': {pattern_str}", def.name)
                })?;

                patterns.push(CompiledPattern {
                    name: def.name.clone(),
                    regex,
                    label: label.clone(),
                    confidence: def.confidence,
                });
            }
        }

        Ok(Self { patterns })
    }

    /// Create a default pattern registry with built-in patterns
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// All patterns in library order
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Whether any pattern matches anywhere in `text`
    pub fn matches_any(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.regex.is_match(text))
    }

    fn parse_label(s: &str) -> Result<PiiLabel> {
        match PiiLabel::from_tag(s) {
            PiiLabel::None => anyhow::bail!("Pattern label must not be the non-entity label"),
            PiiLabel::Other(tag) => anyhow::bail!("Unknown PII label: {tag}"),
            label => Ok(label),
        }
    }
}
