//! Tenant registry endpoints
//!
//! Always served from the host database; `X-Tenant-ID` is ignored here.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{TenantRecord, TenantRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ValidUuid};
use crate::models::{TenantId, TenantName};
use crate::state::AppState;

/// Create tenant request
#[derive(Deserialize)]
pub struct CreateTenantRequest {
    pub name: String,
}

/// Tenant response
#[derive(Debug, Serialize, Deserialize)]
pub struct TenantResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TenantRecord> for TenantResponse {
    fn from(t: TenantRecord) -> Self {
        Self {
            id: t.id,
            name: t.name,
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}

/// GET /api/v1/tenants
async fn list_tenants(State(state): State<AppState>) -> Result<Json<Vec<TenantResponse>>, ApiError> {
    let tenants = TenantRepo::new(state.host()).list().await?;
    Ok(Json(tenants.into_iter().map(TenantResponse::from).collect()))
}

/// POST /api/v1/tenants
async fn create_tenant(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateTenantRequest>,
) -> Result<(StatusCode, Json<TenantResponse>), ApiError> {
    let name = TenantName::new(&req.name)?;
    let tenant = TenantRepo::new(state.host()).create(name).await?;

    tracing::info!(tenant_id = %tenant.id, name = %tenant.name, "tenant registered");
    Ok((StatusCode::CREATED, Json(TenantResponse::from(tenant))))
}

/// GET /api/v1/tenants/{id}
async fn get_tenant(
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<TenantResponse>, ApiError> {
    let tenant = TenantRepo::new(state.host()).get(TenantId::from(id)).await?;
    Ok(Json(TenantResponse::from(tenant)))
}

/// DELETE /api/v1/tenants/{id}
async fn delete_tenant(
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
) -> Result<StatusCode, ApiError> {
    TenantRepo::new(state.host()).delete(TenantId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Tenant routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/tenants", get(list_tenants).post(create_tenant))
        .route("/api/v1/tenants/{id}", get(get_tenant).delete(delete_tenant))
}
