//! Todo title and description validation

use super::ValidationError;

/// Maximum length for todo titles
const MAX_TITLE_LEN: usize = 256;

/// Maximum length for todo descriptions
const MAX_DESCRIPTION_LEN: usize = 4096;

/// Validated todo title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoTitle(String);

impl TodoTitle {
    /// Create a new todo title.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 256 characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }

        if trimmed.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validated todo description; empty is allowed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDescription(String);

impl TodoDescription {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::TooLong {
                field: "description",
                max: MAX_DESCRIPTION_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed() {
        assert_eq!(TodoTitle::new("  buy milk ").unwrap().as_str(), "buy milk");
    }

    #[test]
    fn rejects_whitespace_title() {
        let err = TodoTitle::new("   ").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "title" }));
    }

    #[test]
    fn title_max_length() {
        assert!(TodoTitle::new(&"t".repeat(256)).is_ok());
        let err = TodoTitle::new(&"t".repeat(257)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 256, .. }));
    }

    #[test]
    fn description_may_be_empty() {
        assert_eq!(TodoDescription::new("").unwrap().as_str(), "");
    }

    #[test]
    fn description_is_kept_verbatim() {
        assert_eq!(TodoDescription::new("  d ").unwrap().as_str(), "  d ");
    }

    #[test]
    fn description_max_length() {
        let err = TodoDescription::new(&"d".repeat(4097)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 4096, .. }));
    }
}
