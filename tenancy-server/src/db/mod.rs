//! Database layer - connection manager, schema registrar, repositories
//!
//! # Design Principles
//!
//! - One shared `PgPool` for the whole process
//! - A logical "database" is a Postgres schema; selecting one does no I/O
//! - Every statement qualifies tables with the selected schema
//! - Rely on DB constraints, handle conflicts - no check-then-insert

pub mod client;
pub mod names;
pub mod schema;
pub mod repos;

pub use client::{Database, DbClient};
pub use names::{DatabaseName, HOST_DATABASE};
pub use schema::{ensure_schema, EntityDefinition, IndexDefinition, SchemaCache, ENTITIES};
pub use repos::*;
