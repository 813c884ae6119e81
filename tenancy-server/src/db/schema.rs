//! Schema registrar
//!
//! Ensures the tables and indexes for a set of entity definitions exist in
//! a logical database. Host databases include the tenant registry; tenant
//! databases never do.
//!
//! Every ensure runs in one transaction holding a per-database advisory
//! lock, so concurrent ensures of the same database serialize instead of
//! racing on the Postgres catalog.

use std::collections::HashSet;

use tokio::sync::RwLock;

use super::client::Database;
use super::names::DatabaseName;
use super::repos::DbError;

/// One index on an entity's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDefinition {
    /// Index name, unique within the database
    pub name: &'static str,
    /// Column list as it appears inside `(...)`, e.g. `tenant_id, created_at DESC`
    pub columns: &'static str,
    pub unique: bool,
}

/// Shape and indexes for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDefinition {
    /// Backing table name
    pub table: &'static str,
    /// True for tenant-registry entities that only live in the host database
    pub registry: bool,
    /// Column definitions inside `CREATE TABLE (...)`
    pub columns: &'static str,
    pub indexes: &'static [IndexDefinition],
}

pub const TENANTS: EntityDefinition = EntityDefinition {
    table: "tenants",
    registry: true,
    columns: "id UUID PRIMARY KEY, \
              tenant_id UUID, \
              name TEXT NOT NULL, \
              created_at TIMESTAMPTZ NOT NULL, \
              updated_at TIMESTAMPTZ NOT NULL",
    indexes: &[
        IndexDefinition { name: "tenants_tenant_id_idx", columns: "tenant_id", unique: false },
        IndexDefinition {
            name: "tenants_tenant_id_created_at_idx",
            columns: "tenant_id, created_at DESC",
            unique: false,
        },
        IndexDefinition { name: "tenants_name_key", columns: "name", unique: true },
    ],
};

pub const USERS: EntityDefinition = EntityDefinition {
    table: "users",
    registry: false,
    columns: "id UUID PRIMARY KEY, \
              tenant_id UUID, \
              username TEXT NOT NULL, \
              email TEXT NOT NULL, \
              created_at TIMESTAMPTZ NOT NULL, \
              updated_at TIMESTAMPTZ NOT NULL",
    indexes: &[
        IndexDefinition { name: "users_tenant_id_idx", columns: "tenant_id", unique: false },
        IndexDefinition {
            name: "users_tenant_id_created_at_idx",
            columns: "tenant_id, created_at DESC",
            unique: false,
        },
        IndexDefinition { name: "users_email_key", columns: "email", unique: true },
    ],
};

pub const TODOS: EntityDefinition = EntityDefinition {
    table: "todos",
    registry: false,
    columns: "id UUID PRIMARY KEY, \
              tenant_id UUID, \
              title TEXT NOT NULL, \
              description TEXT NOT NULL, \
              completed BOOLEAN NOT NULL DEFAULT FALSE, \
              created_at TIMESTAMPTZ NOT NULL, \
              updated_at TIMESTAMPTZ NOT NULL",
    indexes: &[
        IndexDefinition { name: "todos_tenant_id_idx", columns: "tenant_id", unique: false },
        IndexDefinition {
            name: "todos_tenant_id_created_at_idx",
            columns: "tenant_id, created_at DESC",
            unique: false,
        },
    ],
};

/// Every entity known to the service.
pub const ENTITIES: &[EntityDefinition] = &[USERS, TODOS, TENANTS];

/// Entities to register for a database.
pub fn select_entities(
    entities: &[EntityDefinition],
    include_registry: bool,
) -> Vec<EntityDefinition> {
    entities
        .iter()
        .filter(|e| include_registry || !e.registry)
        .copied()
        .collect()
}

/// DDL statements that bring `db` up to the given entity set.
///
/// All statements are `IF NOT EXISTS`, so replaying them is a no-op.
pub fn schema_statements(
    db: &Database,
    entities: &[EntityDefinition],
    include_registry: bool,
) -> Vec<String> {
    let mut statements = vec![format!(
        "CREATE SCHEMA IF NOT EXISTS {}",
        db.name().quoted()
    )];

    for entity in select_entities(entities, include_registry) {
        let table = db.table(entity.table);
        statements.push(format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            table, entity.columns
        ));

        for index in entity.indexes {
            statements.push(format!(
                "CREATE {}INDEX IF NOT EXISTS \"{}\" ON {} ({})",
                if index.unique { "UNIQUE " } else { "" },
                index.name,
                table,
                index.columns
            ));
        }
    }

    statements
}

/// Ensure tables and indexes exist for `entities` in `db`.
///
/// Idempotent and safe to call concurrently for the same database.
pub async fn ensure_schema(
    db: &Database,
    entities: &[EntityDefinition],
    include_registry: bool,
) -> Result<(), DbError> {
    let statements = schema_statements(db, entities, include_registry);

    let mut tx = db.pool().begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(db.name().as_str())
        .execute(&mut *tx)
        .await?;

    for statement in &statements {
        sqlx::query(statement).execute(&mut *tx).await?;
    }

    tx.commit().await?;

    tracing::debug!(
        database = %db.name(),
        include_registry,
        statements = statements.len(),
        "schema ensured"
    );
    Ok(())
}

/// Names of databases already ensured in this process.
///
/// An optimization only: a cold cache re-runs the idempotent ensure.
/// The lock is never held across I/O.
#[derive(Debug, Default)]
pub struct SchemaCache {
    ensured: RwLock<HashSet<DatabaseName>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, name: &DatabaseName) -> bool {
        self.ensured.read().await.contains(name)
    }

    /// Record a database as ensured. Returns false if it already was.
    pub async fn insert(&self, name: DatabaseName) -> bool {
        self.ensured.write().await.insert(name)
    }

    #[cfg(test)]
    pub(crate) async fn remove(&self, name: &DatabaseName) -> bool {
        self.ensured.write().await.remove(name)
    }

    pub async fn len(&self) -> usize {
        self.ensured.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.ensured.read().await.is_empty()
    }
}
