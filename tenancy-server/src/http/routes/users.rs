//! User endpoints (tenant-scoped)

use axum::{http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{UserRecord, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, Scoped, ValidUuid};
use crate::models::{Email, Username};
use crate::state::AppState;

/// Create/replace user request
#[derive(Deserialize)]
pub struct UserRequest {
    pub username: String,
    pub email: String,
}

/// User response
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub tenant_id: Option<Uuid>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(u: UserRecord) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            tenant_id: u.tenant_id,
            created_at: u.created_at.to_rfc3339(),
            updated_at: u.updated_at.to_rfc3339(),
        }
    }
}

/// GET /api/v1/users
async fn list_users(Scoped(scope): Scoped) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = UserRepo::new(&scope.database).list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/v1/users
async fn create_user(
    Scoped(scope): Scoped,
    ApiJson(req): ApiJson<UserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let username = Username::new(&req.username)?;
    let email = Email::new(&req.email)?;

    let user = UserRepo::new(&scope.database)
        .create(scope.tenant_id, username, email)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /api/v1/users/{id}
async fn get_user(
    Scoped(scope): Scoped,
    ValidUuid(id): ValidUuid,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepo::new(&scope.database).get(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// PUT /api/v1/users/{id}
async fn update_user(
    Scoped(scope): Scoped,
    ValidUuid(id): ValidUuid,
    ApiJson(req): ApiJson<UserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let username = Username::new(&req.username)?;
    let email = Email::new(&req.email)?;

    let user = UserRepo::new(&scope.database)
        .update(id, username, email)
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// DELETE /api/v1/users/{id}
async fn delete_user(
    Scoped(scope): Scoped,
    ValidUuid(id): ValidUuid,
) -> Result<StatusCode, ApiError> {
    UserRepo::new(&scope.database).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// User routes; mount behind `resolve_tenant`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users", get(list_users).post(create_user))
        .route(
            "/api/v1/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
