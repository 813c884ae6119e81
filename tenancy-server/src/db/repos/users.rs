//! User repository
//!
//! Email is unique per database via `users_email_key`.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbError;
use crate::db::Database;
use crate::models::{Email, TenantId, Username};

/// User record from database
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const COLUMNS: &str = "id, tenant_id, username, email, created_at, updated_at";

/// User repository
pub struct UserRepo<'a> {
    db: &'a Database,
}

impl<'a> UserRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<UserRecord>, DbError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY created_at, id",
            COLUMNS,
            self.db.table("users")
        );

        Ok(sqlx::query_as(&sql).fetch_all(self.db.pool()).await?)
    }

    /// Create a user stamped with the caller's tenant (None in host context).
    pub async fn create(
        &self,
        tenant_id: Option<TenantId>,
        username: Username,
        email: Email,
    ) -> Result<UserRecord, DbError> {
        let sql = format!(
            r#"
            INSERT INTO {} (id, tenant_id, username, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING {}
            "#,
            self.db.table("users"),
            COLUMNS
        );

        sqlx::query_as(&sql)
            .bind(Uuid::new_v4())
            .bind(tenant_id.map(|t| t.as_uuid()))
            .bind(username.as_str())
            .bind(email.as_str())
            .bind(Utc::now())
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| DbError::unique(e, "user", "email"))
    }

    pub async fn get(&self, id: Uuid) -> Result<UserRecord, DbError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            COLUMNS,
            self.db.table("users")
        );

        sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| DbError::not_found("user", id))
    }

    /// Replace the mutable fields of a user.
    pub async fn update(
        &self,
        id: Uuid,
        username: Username,
        email: Email,
    ) -> Result<UserRecord, DbError> {
        let sql = format!(
            r#"
            UPDATE {}
            SET username = $2,
                email = $3,
                updated_at = GREATEST(created_at, $4)
            WHERE id = $1
            RETURNING {}
            "#,
            self.db.table("users"),
            COLUMNS
        );

        sqlx::query_as(&sql)
            .bind(id)
            .bind(username.as_str())
            .bind(email.as_str())
            .bind(Utc::now())
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| DbError::unique(e, "user", "email"))?
            .ok_or_else(|| DbError::not_found("user", id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.db.table("users"));

        let result = sqlx::query(&sql).bind(id).execute(self.db.pool()).await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("user", id));
        }
        Ok(())
    }
}
