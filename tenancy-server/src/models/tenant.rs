//! Tenant identifier and tenant name validation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ValidationError;

/// Maximum length for tenant names
const MAX_TENANT_NAME_LEN: usize = 128;

/// Length of the hyphenated text form
const HYPHENATED_LEN: usize = 36;
/// Length of the simple (hex only) text form
const SIMPLE_LEN: usize = 32;

/// Opaque tenant identifier.
///
/// Serialized as a hyphenated UUID string. Parsing also accepts the
/// 32-character simple form so `tenant_<hex>` names can be reversed.
/// Braced and `urn:uuid:` forms are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(Uuid);

impl TenantId {
    /// Generate a fresh identifier for a new tenant.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from untrusted text (header value, path segment).
    ///
    /// # Example
    /// ```
    /// use tenancy_server::models::TenantId;
    ///
    /// assert!(TenantId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").is_ok());
    /// assert!(TenantId::parse("not-an-id").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "tenant id" });
        }

        let invalid = ValidationError::InvalidFormat {
            field: "tenant id",
            reason: "invalid UUID format",
        };

        if trimmed.len() != HYPHENATED_LEN && trimmed.len() != SIMPLE_LEN {
            return Err(invalid);
        }

        Uuid::parse_str(trimmed).map(Self).map_err(|_| invalid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for TenantId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for TenantId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validated tenant name (unique within the host database)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantName(String);

impl TenantName {
    /// Create a new tenant name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 128 characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }

        if trimmed.chars().count() > MAX_TENANT_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_TENANT_NAME_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TenantName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hyphenated_and_simple() {
        let hyphenated = TenantId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let simple = TenantId::parse("67e5504410b1426f9247bb680e5fe0c8").unwrap();
        assert_eq!(hyphenated, simple);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert!(TenantId::parse("  67e55044-10b1-426f-9247-bb680e5fe0c8 ").is_ok());
    }

    #[test]
    fn rejects_malformed_id() {
        let err = TenantId::parse("not-an-id").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn rejects_braced_and_urn_forms() {
        for raw in [
            "{67e55044-10b1-426f-9247-bb680e5fe0c8}",
            "urn:uuid:67e55044-10b1-426f-9247-bb680e5fe0c8",
        ] {
            let err = TenantId::parse(raw).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidFormat { .. }),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_empty_id() {
        let err = TenantId::parse("   ").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn display_round_trips() {
        let id = TenantId::new_v4();
        assert_eq!(TenantId::parse(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = TenantId::parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"67e55044-10b1-426f-9247-bb680e5fe0c8\"");
    }

    #[test]
    fn tenant_name_rules() {
        assert_eq!(TenantName::new("  acme ").unwrap().as_str(), "acme");
        assert!(matches!(
            TenantName::new("").unwrap_err(),
            ValidationError::Empty { .. }
        ));
        assert!(TenantName::new(&"a".repeat(128)).is_ok());
        assert!(matches!(
            TenantName::new(&"a".repeat(129)).unwrap_err(),
            ValidationError::TooLong { max: 128, .. }
        ));
    }
}
