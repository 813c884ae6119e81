//! Connection manager
//!
//! Owns the single process-wide `PgPool`. `select` resolves a logical
//! database name to a handle on that pool without touching the network.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::names::DatabaseName;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Shared database client.
///
/// Cloning is cheap and shares the underlying pool.
#[derive(Clone, Debug)]
pub struct DbClient {
    pool: PgPool,
}

impl DbClient {
    /// Connect to PostgreSQL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or the server is unreachable.
    /// Callers treat this as fatal at startup; there are no retries here.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = DbClient::connect("postgres://localhost/tenancy", 10).await?;
    /// ```
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        tracing::info!(max_connections, "database pool connected");
        Ok(Self { pool })
    }

    /// Wrap an existing pool (tests, lazily-connected pools).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Select a logical database. Idempotent, no I/O.
    pub fn select(&self, name: &DatabaseName) -> Database {
        Database {
            pool: self.pool.clone(),
            name: name.clone(),
        }
    }

    /// Close every pooled connection. Call once at shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database pool closed");
    }

    #[cfg(test)]
    pub(crate) fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

/// Handle to one logical database on the shared pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
    name: DatabaseName,
}

impl Database {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn name(&self) -> &DatabaseName {
        &self.name
    }

    /// Fully-qualified table identifier, e.g. `"tenant_ab12"."todos"`.
    pub fn table(&self, table: &str) -> String {
        format!("{}.\"{}\"", self.name.quoted(), table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TenantId;

    fn lazy_client() -> DbClient {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .expect("lazy pool");
        DbClient::from_pool(pool)
    }

    #[tokio::test]
    async fn select_is_idempotent() {
        let client = lazy_client();
        let name = DatabaseName::for_tenant(TenantId::new_v4());

        let a = client.select(&name);
        let b = client.select(&name);
        assert_eq!(a.name(), b.name());
        assert_eq!(a.table("todos"), b.table("todos"));
        // lazy pool never opened a connection
        assert_eq!(client.pool.size(), 0);
    }

    #[tokio::test]
    async fn table_is_schema_qualified() {
        let db = lazy_client().select(&DatabaseName::host());
        assert_eq!(db.table("users"), "\"app_db\".\"users\"");
    }

    #[tokio::test]
    async fn close_marks_pool_closed() {
        let client = lazy_client();
        client.close().await;
        assert!(client.is_closed());
    }

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p tenancy-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn connect_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let client = DbClient::connect(&url, 2).await.expect("connect failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(client.select(&DatabaseName::host()).pool())
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
        client.close().await;
    }

    #[tokio::test]
    async fn connect_rejects_empty_url() {
        assert!(DbClient::connect("", 1).await.is_err());
    }
}
