//! Subject name validation

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{DEFAULT_SUBJECT, MAX_SUBJECT_LEN};

/// Malformed query input, rejected before any fetch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("subject name is {len} characters, limit is {max}")]
    TooLong { len: usize, max: usize },

    #[error("subject name contains a control character")]
    ControlCharacter,
}

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a subject name: trim, collapse inner whitespace, fall back to
/// `default` when nothing is left.
pub fn normalize_subject(raw: &str, default: &str) -> Result<String, QueryError> {
    if raw.chars().any(|c| c.is_control() && !c.is_whitespace()) {
        return Err(QueryError::ControlCharacter);
    }

    let collapsed = WHITESPACE_REGEX.replace_all(raw.trim(), " ").into_owned();
    if collapsed.is_empty() {
        return Ok(default.to_string());
    }

    let len = collapsed.chars().count();
    if len > MAX_SUBJECT_LEN {
        return Err(QueryError::TooLong {
            len,
            max: MAX_SUBJECT_LEN,
        });
    }
    Ok(collapsed)
}

/// [`normalize_subject`] with the built-in default subject
pub fn validate_subject(raw: &str) -> Result<String, QueryError> {
    normalize_subject(raw, DEFAULT_SUBJECT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_and_collapse() {
        assert_eq!(validate_subject("  Acme \t  Corp  ").unwrap(), "Acme Corp");
    }

    #[test]
    fn test_empty_falls_back_to_default() {
        assert_eq!(validate_subject("").unwrap(), "Innovate Inc.");
        assert_eq!(validate_subject("   \n ").unwrap(), "Innovate Inc.");
        assert_eq!(normalize_subject("", "Fallback Ltd").unwrap(), "Fallback Ltd");
    }

    #[test]
    fn test_rejects_control_characters() {
        assert_eq!(
            validate_subject("Acme\u{0007}Corp"),
            Err(QueryError::ControlCharacter)
        );
    }

    #[test]
    fn test_rejects_overlong_names() {
        let long = "x".repeat(MAX_SUBJECT_LEN + 1);
        assert!(matches!(
            validate_subject(&long),
            Err(QueryError::TooLong { .. })
        ));
        assert!(validate_subject(&"x".repeat(MAX_SUBJECT_LEN)).is_ok());
    }
}
