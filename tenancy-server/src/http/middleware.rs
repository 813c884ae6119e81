//! Tenant resolution middleware
//!
//! Runs before every tenant-scoped handler: reads `X-Tenant-ID`, resolves
//! the request's database and stores the `TenantScope` in the request
//! extensions, where only this request can see it.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::error::ApiError;
use crate::models::ValidationError;
use crate::state::AppState;
use crate::tenancy::TENANT_HEADER;

pub async fn resolve_tenant(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(TENANT_HEADER)
        .map(|value| {
            value.to_str().map(str::to_owned).map_err(|_| {
                ValidationError::InvalidFormat {
                    field: "tenant id",
                    reason: "header is not valid ASCII",
                }
            })
        })
        .transpose()?;

    let scope = state.resolver().resolve(header.as_deref()).await?;
    req.extensions_mut().insert(scope);

    Ok(next.run(req).await)
}
