//! Logical database names
//!
//! The host database has a fixed name; each tenant database is derived
//! from the tenant id as `tenant_<32 hex digits>`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{TenantId, ValidationError};

/// Name of the host database holding the tenant registry
pub const HOST_DATABASE: &str = "app_db";

/// Prefix for per-tenant database names
const TENANT_PREFIX: &str = "tenant_";

/// Postgres identifier limit is 63 bytes; keep names unquoted-safe
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]{0,62}$").expect("invalid database name regex"));

/// Validated logical database name.
///
/// Only lowercase ASCII identifiers are accepted, so names can be
/// interpolated into DDL/DML as quoted identifiers without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatabaseName(String);

impl DatabaseName {
    /// # Example
    /// ```
    /// use tenancy_server::db::DatabaseName;
    ///
    /// assert!(DatabaseName::new("app_db").is_ok());
    /// assert!(DatabaseName::new("App-DB").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "database name" });
        }

        if !NAME_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "database name",
                reason: "must be a lowercase identifier of at most 63 characters",
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// The fixed host database.
    pub fn host() -> Self {
        Self(HOST_DATABASE.to_owned())
    }

    /// Deterministic database name for a tenant.
    pub fn for_tenant(tenant_id: TenantId) -> Self {
        Self(format!("{}{}", TENANT_PREFIX, tenant_id.as_uuid().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Quoted identifier form, e.g. `"app_db"`.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl AsRef<str> for DatabaseName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatabaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
