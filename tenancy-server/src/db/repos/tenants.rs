//! Tenant registry repository
//!
//! Only ever used against the host database.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbError;
use crate::db::Database;
use crate::models::{TenantId, TenantName};

/// Tenant record from database
#[derive(Debug, Clone, FromRow)]
pub struct TenantRecord {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tenant repository
pub struct TenantRepo<'a> {
    db: &'a Database,
}

impl<'a> TenantRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List all tenants, oldest first.
    pub async fn list(&self) -> Result<Vec<TenantRecord>, DbError> {
        let sql = format!(
            "SELECT id, name, created_at, updated_at FROM {} ORDER BY created_at, id",
            self.db.table("tenants")
        );

        Ok(sqlx::query_as(&sql).fetch_all(self.db.pool()).await?)
    }

    /// Register a tenant. Fails with `Conflict` if the name is taken.
    pub async fn create(&self, name: TenantName) -> Result<TenantRecord, DbError> {
        let sql = format!(
            r#"
            INSERT INTO {} (id, tenant_id, name, created_at, updated_at)
            VALUES ($1, NULL, $2, $3, $3)
            RETURNING id, name, created_at, updated_at
            "#,
            self.db.table("tenants")
        );

        sqlx::query_as(&sql)
            .bind(TenantId::new_v4().as_uuid())
            .bind(name.as_str())
            .bind(Utc::now())
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| DbError::unique(e, "tenant", "name"))
    }

    pub async fn get(&self, id: TenantId) -> Result<TenantRecord, DbError> {
        let sql = format!(
            "SELECT id, name, created_at, updated_at FROM {} WHERE id = $1",
            self.db.table("tenants")
        );

        sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| DbError::not_found("tenant", id))
    }

    /// Remove a tenant from the registry.
    ///
    /// The tenant's own database is left in place.
    pub async fn delete(&self, id: TenantId) -> Result<(), DbError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.db.table("tenants"));

        let result = sqlx::query(&sql)
            .bind(id.as_uuid())
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("tenant", id));
        }
        Ok(())
    }
}
