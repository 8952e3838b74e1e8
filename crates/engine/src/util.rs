//! Internal helpers for input normalization.
//!
//! These utilities are **not** part of the public API. They centralize the
//! trimming rules so every write path stores text the same way.

use crate::{EngineError, ResultEngine};

/// Trim a required name and reject it when nothing is left.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim optional free text; blank text is stored as `NULL`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_text_blank_is_none() {
        assert_eq!(normalize_optional_text(Some("   ")), None);
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(
            normalize_optional_text(Some("  lunch ")),
            Some("lunch".to_string())
        );
    }

    #[test]
    fn required_name_is_trimmed() {
        assert_eq!(normalize_required_name(" Cash ", "account").unwrap(), "Cash");
        assert_eq!(
            normalize_required_name(" ", "account"),
            Err(EngineError::Validation(
                "account name must not be empty".to_string()
            ))
        );
    }
}
