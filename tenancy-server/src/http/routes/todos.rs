//! Todo endpoints (tenant-scoped)

use axum::{http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{TodoRecord, TodoRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, Scoped, ValidUuid};
use crate::models::{TodoDescription, TodoTitle};
use crate::state::AppState;

/// Create todo request
#[derive(Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    pub description: String,
}

/// Full replace of a todo's mutable fields
#[derive(Deserialize)]
pub struct UpdateTodoRequest {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Todo response
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub tenant_id: Option<Uuid>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TodoRecord> for TodoResponse {
    fn from(t: TodoRecord) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            completed: t.completed,
            tenant_id: t.tenant_id,
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}

/// GET /api/v1/todos
async fn list_todos(Scoped(scope): Scoped) -> Result<Json<Vec<TodoResponse>>, ApiError> {
    let todos = TodoRepo::new(&scope.database).list().await?;
    Ok(Json(todos.into_iter().map(TodoResponse::from).collect()))
}

/// POST /api/v1/todos
async fn create_todo(
    Scoped(scope): Scoped,
    ApiJson(req): ApiJson<CreateTodoRequest>,
) -> Result<(StatusCode, Json<TodoResponse>), ApiError> {
    let title = TodoTitle::new(&req.title)?;
    let description = TodoDescription::new(&req.description)?;

    let todo = TodoRepo::new(&scope.database)
        .create(scope.tenant_id, title, description)
        .await?;

    Ok((StatusCode::CREATED, Json(TodoResponse::from(todo))))
}

/// GET /api/v1/todos/{id}
async fn get_todo(
    Scoped(scope): Scoped,
    ValidUuid(id): ValidUuid,
) -> Result<Json<TodoResponse>, ApiError> {
    let todo = TodoRepo::new(&scope.database).get(id).await?;
    Ok(Json(TodoResponse::from(todo)))
}

/// PUT /api/v1/todos/{id}
async fn update_todo(
    Scoped(scope): Scoped,
    ValidUuid(id): ValidUuid,
    ApiJson(req): ApiJson<UpdateTodoRequest>,
) -> Result<Json<TodoResponse>, ApiError> {
    let title = TodoTitle::new(&req.title)?;
    let description = TodoDescription::new(&req.description)?;

    let todo = TodoRepo::new(&scope.database)
        .update(id, title, description, req.completed)
        .await?;

    Ok(Json(TodoResponse::from(todo)))
}

/// DELETE /api/v1/todos/{id}
async fn delete_todo(
    Scoped(scope): Scoped,
    ValidUuid(id): ValidUuid,
) -> Result<StatusCode, ApiError> {
    TodoRepo::new(&scope.database).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Todo routes; mount behind `resolve_tenant`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/todos", get(list_todos).post(create_todo))
        .route(
            "/api/v1/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
}
