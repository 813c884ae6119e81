//! Repository implementations for database access
//!
//! Each repository borrows a `Database` handle resolved for the current
//! request and follows these patterns:
//! - Schema-qualified SQL (`"<database>"."<table>"`)
//! - Uniqueness enforced by indexes; violations map to `DbError::Conflict`
//! - `UPDATE/DELETE ... RETURNING` instead of check-then-write

pub mod tenants;
pub mod users;
pub mod todos;

pub use tenants::{TenantRecord, TenantRepo};
pub use users::{UserRecord, UserRepo};
pub use todos::{TodoRecord, TodoRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {resource} with this {field} already exists")]
    Conflict {
        resource: &'static str,
        field: &'static str,
    },
}

impl DbError {
    /// Map a unique-index violation to `Conflict`, anything else to `Sqlx`.
    pub(crate) fn unique(err: sqlx::Error, resource: &'static str, field: &'static str) -> Self {
        let is_unique = err
            .as_database_error()
            .map(|e| e.is_unique_violation())
            .unwrap_or(false);

        if is_unique {
            Self::Conflict { resource, field }
        } else {
            Self::Sqlx(err)
        }
    }

    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}
