//! Credential handling using the secrecy crate
//!
//! Predictor API tokens live in a [`SecretString`]: zeroized on drop, redacted
//! in `Debug`, and only readable through `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use pii_redact::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("hf_example".to_string());
//! assert_eq!(token.expose_secret(), "hf_example");
//! assert!(!format!("{token:?}").contains("hf_example"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String newtype satisfying the `Secret` container bounds
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Secret string: zeroized on drop, never printed
pub type SecretString = Secret<SecretValue>;

/// Wrap a `String` as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Wrap an optional `String`, mapping empty values to `None`
#[inline]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.filter(|s| !s.is_empty()).map(secret_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("hf_token".to_string());
        assert_eq!(secret.expose_secret(), "hf_token");
    }

    #[test]
    fn test_secret_string_opt_drops_empty() {
        assert!(secret_string_opt(Some(String::new())).is_none());
        assert!(secret_string_opt(None).is_none());
        assert!(secret_string_opt(Some("t".to_string())).is_some());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-token".to_string());
        let debug_output = format!("{secret:?}");
        assert!(!debug_output.contains("sensitive-token"));
    }

    #[test]
    fn test_secret_toml_roundtrip() {
        #[derive(Serialize, Deserialize)]
        struct Section {
            api_token: SecretString,
        }

        let section: Section = toml::from_str(r#"api_token = "abc123""#).unwrap();
        assert_eq!(section.api_token.expose_secret(), "abc123");
        let out = toml::to_string(&section).unwrap();
        assert!(out.contains("abc123"));
    }
}
