//! `tenancy serve`: run the multi-tenant HTTP API

use std::net::SocketAddr;

use anyhow::{bail, Context, Result};
use clap::Parser;

use tenancy_server::db::client::DEFAULT_MAX_CONNECTIONS;
use tenancy_server::db::HOST_DATABASE;
use tenancy_server::ServerConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", default_value = "", hide_default_value = true)]
    pub database_url: String,

    /// Maximum pooled database connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Host database holding the tenant registry and untenanted data
    #[arg(long, default_value = HOST_DATABASE)]
    pub host_database: String,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

impl ServeArgs {
    fn into_config(self) -> Result<ServerConfig> {
        if self.database_url.trim().is_empty() {
            bail!("DATABASE_URL not set. Set via --database-url or the DATABASE_URL environment variable");
        }

        Ok(ServerConfig {
            bind_addr: self.bind,
            cors_permissive: self.cors_permissive,
            database_url: self.database_url,
            max_connections: self.max_connections,
            host_database: self.host_database,
        })
    }
}

/// Run the HTTP server until shutdown
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.into_config()?;

    tracing::info!(
        bind = %config.bind_addr,
        host_database = %config.host_database,
        max_connections = config.max_connections,
        "starting tenancy server"
    );

    tenancy_server::serve(config)
        .await
        .context("Server error")?;

    Ok(())
}
