//! Axum server setup
//!
//! Server skeleton with:
//! - Tenant resolver on `/api/v1/users` and `/api/v1/todos`
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::{middleware, routes};
use crate::db::client::DEFAULT_MAX_CONNECTIONS;
use crate::db::{DbError, HOST_DATABASE};
use crate::models::ValidationError;

pub use crate::state::AppState;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:3030)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    ///
    /// WARNING: Setting this to true allows any origin.
    pub cors_permissive: bool,

    /// PostgreSQL connection string. Empty fails at startup.
    pub database_url: String,

    /// Maximum pooled connections
    pub max_connections: u32,

    /// Name of the host database (schema holding the tenant registry)
    pub host_database: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3030)),
            cors_permissive: false,
            database_url: std::env::var("DATABASE_URL").unwrap_or_default(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            host_database: HOST_DATABASE.to_string(),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState, cors_permissive: bool) -> Router {
    // CORS configuration
    let cors = if cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        // Localhost only
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://localhost:3030"),
                HeaderValue::from_static("http://127.0.0.1:3000"),
                HeaderValue::from_static("http://127.0.0.1:3030"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Tenant-scoped resources: resolver runs before the handler
    let scoped = Router::new()
        .merge(routes::users::router())
        .merge(routes::todos::router())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::resolve_tenant,
        ));

    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::tenants::router())
        .merge(scoped)
        .layer(layers)
        .with_state(state)
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let state = AppState::new(resolver);
/// run_server(state, ServerConfig::default()).await?;
/// ```
pub async fn run_server(state: AppState, config: &ServerConfig) -> Result<(), ServerError> {
    let app = build_router(state, config.cors_permissive);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to connect to database: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("failed to initialize host schema: {0}")]
    Schema(#[from] DbError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DatabaseName, DbClient};
    use crate::tenancy::TenantResolver;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    /// Router over a pool that never connects; only paths that stop
    /// before the first query can succeed.
    fn offline_app() -> (Router, TenantResolver) {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .expect("lazy pool");
        let resolver = TenantResolver::new(DbClient::from_pool(pool), DatabaseName::host());
        let app = build_router(AppState::new(resolver.clone()), false);
        (app, resolver)
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (app, _) = offline_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["host_database"], "app_db");
    }

    #[tokio::test]
    async fn malformed_tenant_header_is_rejected_before_selection() {
        let (app, resolver) = offline_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/todos")
                    .header("X-Tenant-ID", "not-an-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "tenant id: invalid UUID format");
        assert!(resolver.schemas().is_empty().await);
    }

    #[tokio::test]
    async fn braced_tenant_header_is_rejected() {
        let (app, resolver) = offline_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/todos")
                    .header("X-Tenant-ID", "{67e55044-10b1-426f-9247-bb680e5fe0c8}")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(resolver.schemas().is_empty().await);
    }

    #[tokio::test]
    async fn preflight_passes_cors_layer() {
        let (app, _) = offline_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/v1/todos")
                    .header("Origin", "http://localhost:3000")
                    .header("Access-Control-Request-Method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn malformed_tenant_header_rejected_on_users() {
        let (app, _) = offline_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/users")
                    .header("X-Tenant-ID", "1234")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"username":"ada","email":"ada@example.com"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn tenant_routes_ignore_tenant_header() {
        let (app, resolver) = offline_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/tenants")
                    .header("X-Tenant-ID", "not-an-id")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"  "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        // rejected by name validation, not by the resolver
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["message"], "name cannot be empty");
        assert!(resolver.schemas().is_empty().await);
    }

    #[tokio::test]
    async fn malformed_path_id_is_422() {
        let (app, _) = offline_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/todos/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["message"], "id: invalid UUID format");
    }

    #[tokio::test]
    async fn malformed_body_is_422() {
        let (app, _) = offline_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/todos")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"title": 5}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn invalid_email_is_422() {
        let (app, _) = offline_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/users")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"username":"ada","email":"nope"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["message"], "email: must be a valid email address");
    }

    #[tokio::test]
    async fn unknown_route_does_not_resolve_tenant() {
        let (app, resolver) = offline_app();
        let tenant = crate::models::TenantId::new_v4();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/unknown")
                    .header("X-Tenant-ID", tenant.to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(resolver.schemas().is_empty().await);
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3030);
        assert!(!config.cors_permissive);
        assert_eq!(config.host_database, "app_db");
        assert_eq!(config.max_connections, 10);
    }
}
