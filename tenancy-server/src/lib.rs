//! tenancy-server: multi-tenant users/todos HTTP server
//!
//! Each tenant's data lives in its own logical database, selected per
//! request from the `X-Tenant-ID` header. Requests without the header use
//! the host database, which also holds the tenant registry.

pub mod db;
pub mod http;
pub mod models;
pub mod state;
pub mod tenancy;

pub use db::{Database, DatabaseName, DbClient};
pub use http::{build_router, run_server, ApiError, ServerConfig, ServerError};
pub use state::AppState;
pub use tenancy::{TenantResolver, TenantScope, TENANT_HEADER};

/// Connect, prepare the host schema, serve until shutdown, then close the pool.
///
/// Connection and host-schema failures are returned before the listener
/// is bound; callers treat them as fatal.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let host_name = DatabaseName::new(&config.host_database)?;

    let client = DbClient::connect(&config.database_url, config.max_connections).await?;

    let resolver = TenantResolver::new(client.clone(), host_name);
    if let Err(e) = resolver.init_host().await {
        client.close().await;
        return Err(e.into());
    }

    let result = run_server(AppState::new(resolver), &config).await;

    client.close().await;
    result
}
