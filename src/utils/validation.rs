// file: src/utils/validation.rs
// description: input validation utilities and text helpers
// reference: input validation patterns

use crate::error::{LookupError, Result};

/// Stack Exchange rejects page sizes above this.
pub const MAX_PAGE_SIZE: usize = 100;

pub struct Validator;

impl Validator {
    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(LookupError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn validate_limit(limit: usize) -> Result<()> {
        if limit == 0 {
            return Err(LookupError::Validation(
                "Result limit must be at least 1".to_string(),
            ));
        }

        if limit > MAX_PAGE_SIZE {
            return Err(LookupError::Validation(format!(
                "Result limit too large (max {})",
                MAX_PAGE_SIZE
            )));
        }

        Ok(())
    }

    pub fn validate_tag(tag: &str) -> Result<()> {
        if tag.trim().is_empty() {
            return Err(LookupError::Validation("Tag is empty".to_string()));
        }

        if tag.chars().any(char::is_whitespace) {
            return Err(LookupError::Validation(format!(
                "Tag must not contain whitespace: {}",
                tag
            )));
        }

        Ok(())
    }

    /// Truncates on a character boundary, appending an ellipsis when shortened.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            None => text.to_string(),
            Some((byte_idx, _)) => format!("{}...", text[..byte_idx].trim_end()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(Validator::validate_url("https://api.stackexchange.com/2.3").is_ok());
        assert!(Validator::validate_url("http://localhost:1234").is_ok());
        assert!(Validator::validate_url("api.stackexchange.com").is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert!(Validator::validate_limit(1).is_ok());
        assert!(Validator::validate_limit(100).is_ok());
        assert!(Validator::validate_limit(0).is_err());
        assert!(Validator::validate_limit(101).is_err());
    }

    #[test]
    fn test_validate_tag() {
        assert!(Validator::validate_tag("python").is_ok());
        assert!(Validator::validate_tag("").is_err());
        assert!(Validator::validate_tag("rust lang").is_err());
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(
            Validator::truncate_text("this is a very long text", 10),
            "this is a..."
        );
    }

    #[test]
    fn test_truncate_text_multibyte() {
        assert_eq!(Validator::truncate_text("héllo wörld", 4), "héll...");
    }
}
