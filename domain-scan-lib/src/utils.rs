//! Utility functions for keyword and label validation.

use crate::error::DomainScanError;
use regex::Regex;

lazy_static::lazy_static! {
    /// Characters allowed in a single domain label.
    static ref LABEL_RE: Regex = Regex::new(r"^[A-Za-z0-9-]+$").expect("label pattern compiles");
}

/// Whether `text` can be used verbatim as a domain label.
pub fn is_valid_label(text: &str) -> bool {
    LABEL_RE.is_match(text)
}

/// Validate a keyword before it is sent for translation.
///
/// Keywords are limited to ASCII letters, digits and hyphens.
pub fn validate_keyword(keyword: &str) -> Result<String, DomainScanError> {
    let keyword = keyword.trim();

    if keyword.is_empty() {
        return Err(DomainScanError::invalid_keyword(
            keyword,
            "Keyword cannot be empty",
        ));
    }

    if !is_valid_label(keyword) {
        return Err(DomainScanError::invalid_keyword(
            keyword,
            "Keyword may only contain letters, numbers and hyphens",
        ));
    }

    Ok(keyword.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_label() {
        assert!(is_valid_label("coffee"));
        assert!(is_valid_label("Kaffee-2"));
        assert!(!is_valid_label(""));
        assert!(!is_valid_label("café"));
        assert!(!is_valid_label("two words"));
        assert!(!is_valid_label("dot.ted"));
        assert!(!is_valid_label("コーヒー"));
    }

    #[test]
    fn test_validate_keyword() {
        assert_eq!(validate_keyword("  coffee ").unwrap(), "coffee");
        assert!(matches!(
            validate_keyword(""),
            Err(DomainScanError::InvalidKeyword { .. })
        ));
        assert!(validate_keyword("coffee!").is_err());
    }
}
