//! Tenant context resolution
//!
//! Maps the optional `X-Tenant-ID` of one request to the logical database
//! that request must use. The result is a `TenantScope` value owned by the
//! request; nothing here keeps a "current database" between requests.

use std::sync::Arc;

use crate::db::{ensure_schema, Database, DatabaseName, DbClient, DbError, SchemaCache, ENTITIES};
use crate::models::{TenantId, ValidationError};

/// Header carrying the tenant identifier
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Per-request tenant context.
///
/// `tenant_id` is None in host context; `database` is the handle every
/// data operation of the request goes through.
#[derive(Debug, Clone)]
pub struct TenantScope {
    pub tenant_id: Option<TenantId>,
    pub database: Database,
}

impl TenantScope {
    #[cfg(test)]
    pub(crate) fn is_host(&self) -> bool {
        self.tenant_id.is_none()
    }
}

/// Resolution failure
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Header present but not a tenant id; no database was selected
    #[error("invalid X-Tenant-ID header: {0}")]
    InvalidTenant(#[from] ValidationError),

    /// Tenant database could not be prepared
    #[error("failed to prepare tenant database: {0}")]
    Schema(#[from] DbError),
}

/// Resolves tenant headers to database handles.
///
/// Cheap to clone; clones share the client and the schema cache.
#[derive(Clone, Debug)]
pub struct TenantResolver {
    client: DbClient,
    host: Database,
    schemas: Arc<SchemaCache>,
}

impl TenantResolver {
    pub fn new(client: DbClient, host_name: DatabaseName) -> Self {
        let host = client.select(&host_name);
        Self {
            client,
            host,
            schemas: Arc::new(SchemaCache::new()),
        }
    }

    /// Handle to the host database.
    pub fn host(&self) -> &Database {
        &self.host
    }

    pub fn schemas(&self) -> &SchemaCache {
        &self.schemas
    }

    /// Ensure the host schema, tenant registry included. Startup only.
    pub async fn init_host(&self) -> Result<(), DbError> {
        ensure_schema(&self.host, ENTITIES, true).await?;
        self.schemas.insert(self.host.name().clone()).await;
        tracing::info!(database = %self.host.name(), "host schema ready");
        Ok(())
    }

    /// Scope for a request without a tenant header.
    pub fn host_scope(&self) -> TenantScope {
        TenantScope {
            tenant_id: None,
            database: self.host.clone(),
        }
    }

    /// Resolve the raw header value of one request.
    ///
    /// - `None` → host scope, no I/O
    /// - malformed → `InvalidTenant`, no database selected
    /// - valid → tenant database selected and its schema ensured
    pub async fn resolve(&self, header: Option<&str>) -> Result<TenantScope, ResolveError> {
        let Some(raw) = header else {
            tracing::debug!(database = %self.host.name(), "no tenant header, using host");
            return Ok(self.host_scope());
        };

        let tenant_id = TenantId::parse(raw)?;
        let scope = self.scope_for(tenant_id).await?;

        tracing::debug!(
            tenant_id = %tenant_id,
            database = %scope.database.name(),
            "tenant resolved"
        );
        Ok(scope)
    }

    /// Select and prepare the database of a known tenant.
    pub async fn scope_for(&self, tenant_id: TenantId) -> Result<TenantScope, DbError> {
        let name = DatabaseName::for_tenant(tenant_id);
        let database = self.client.select(&name);
        self.ensure_tenant_schema(&database).await?;

        Ok(TenantScope {
            tenant_id: Some(tenant_id),
            database,
        })
    }

    async fn ensure_tenant_schema(&self, database: &Database) -> Result<(), DbError> {
        if self.schemas.contains(database.name()).await {
            return Ok(());
        }

        ensure_schema(database, ENTITIES, false).await?;

        if self.schemas.insert(database.name().clone()).await {
            tracing::info!(database = %database.name(), "tenant schema ready");
        }
        Ok(())
    }
}
