//! Application state shared across handlers
//!
//! Holds only process-wide, immutable-after-startup values. The database
//! a request talks to is never stored here; it travels in the request's
//! `TenantScope`.

use std::sync::Arc;

use crate::db::Database;
use crate::tenancy::TenantResolver;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    resolver: TenantResolver,
}

impl AppState {
    pub fn new(resolver: TenantResolver) -> Self {
        Self {
            inner: Arc::new(AppStateInner { resolver }),
        }
    }

    pub fn resolver(&self) -> &TenantResolver {
        &self.inner.resolver
    }

    /// Host database, used by tenant registry handlers.
    pub fn host(&self) -> &Database {
        self.inner.resolver.host()
    }
}
