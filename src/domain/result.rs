//! Result type alias

use super::errors::RedactError;

/// Result type alias for redaction operations
///
/// # Examples
///
/// ```
/// use pii_redact::domain::result::Result;
/// use pii_redact::domain::errors::RedactError;
///
/// fn failing_function() -> Result<()> {
///     Err(RedactError::Decode("not utf-8".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, RedactError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
