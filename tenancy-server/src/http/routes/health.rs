//! Liveness endpoint
//!
//! Never touches the database; reports the host database name and how many
//! databases this process has already prepared.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub host_database: String,
    pub ensured_databases: usize,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let resolver = state.resolver();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        host_database: resolver.host().name().to_string(),
        ensured_databases: resolver.schemas().len().await,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DatabaseName, DbClient};
    use crate::models::TenantId;
    use crate::tenancy::TenantResolver;
    use sqlx::postgres::PgPoolOptions;

    fn offline_state() -> AppState {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .expect("lazy pool");
        AppState::new(TenantResolver::new(
            DbClient::from_pool(pool),
            DatabaseName::host(),
        ))
    }

    #[tokio::test]
    async fn reports_version_and_host() {
        let Json(body) = health(State(offline_state())).await;

        assert_eq!(body.status, "ok");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(body.host_database, "app_db");
        assert_eq!(body.ensured_databases, 0);
    }

    #[tokio::test]
    async fn counts_prepared_databases() {
        let state = offline_state();
        state
            .resolver()
            .schemas()
            .insert(DatabaseName::for_tenant(TenantId::new_v4()))
            .await;

        let Json(body) = health(State(state)).await;
        assert_eq!(body.ensured_databases, 1);
    }
}
