//! Todo repository

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbError;
use crate::db::Database;
use crate::models::{TenantId, TodoDescription, TodoTitle};

/// Todo record from database
#[derive(Debug, Clone, FromRow)]
pub struct TodoRecord {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const COLUMNS: &str = "id, tenant_id, title, description, completed, created_at, updated_at";

/// Todo repository
pub struct TodoRepo<'a> {
    db: &'a Database,
}

impl<'a> TodoRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List todos in creation order.
    pub async fn list(&self) -> Result<Vec<TodoRecord>, DbError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY created_at, id",
            COLUMNS,
            self.db.table("todos")
        );

        Ok(sqlx::query_as(&sql).fetch_all(self.db.pool()).await?)
    }

    /// Create an open todo stamped with the caller's tenant.
    pub async fn create(
        &self,
        tenant_id: Option<TenantId>,
        title: TodoTitle,
        description: TodoDescription,
    ) -> Result<TodoRecord, DbError> {
        let sql = format!(
            r#"
            INSERT INTO {} (id, tenant_id, title, description, completed, created_at, updated_at)
            VALUES ($1, $2, $3, $4, FALSE, $5, $5)
            RETURNING {}
            "#,
            self.db.table("todos"),
            COLUMNS
        );

        Ok(sqlx::query_as(&sql)
            .bind(Uuid::new_v4())
            .bind(tenant_id.map(|t| t.as_uuid()))
            .bind(title.as_str())
            .bind(description.as_str())
            .bind(Utc::now())
            .fetch_one(self.db.pool())
            .await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<TodoRecord, DbError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            COLUMNS,
            self.db.table("todos")
        );

        sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| DbError::not_found("todo", id))
    }

    /// Replace title, description and completed flag.
    pub async fn update(
        &self,
        id: Uuid,
        title: TodoTitle,
        description: TodoDescription,
        completed: bool,
    ) -> Result<TodoRecord, DbError> {
        let sql = format!(
            r#"
            UPDATE {}
            SET title = $2,
                description = $3,
                completed = $4,
                updated_at = GREATEST(created_at, $5)
            WHERE id = $1
            RETURNING {}
            "#,
            self.db.table("todos"),
            COLUMNS
        );

        sqlx::query_as(&sql)
            .bind(id)
            .bind(title.as_str())
            .bind(description.as_str())
            .bind(completed)
            .bind(Utc::now())
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| DbError::not_found("todo", id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.db.table("todos"));

        let result = sqlx::query(&sql).bind(id).execute(self.db.pool()).await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("todo", id));
        }
        Ok(())
    }
}
