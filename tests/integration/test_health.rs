//! Liveness and readiness endpoints

use async_trait::async_trait;
use axum::http::StatusCode;
use products_adder::{
    AppError, Result,
    app::{self, AppState},
    config::{CorsConfig, ServerConfig},
    services::{
        document_store::DocumentStore,
        memory::{MemoryDocumentStore, MemoryObjectStorage},
        submission_service::SubmissionService,
    },
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Stands in for a database that stopped answering.
struct UnreachableDocuments;

#[async_trait]
impl DocumentStore for UnreachableDocuments {
    async fn add_document(&self, _collection: &str, _id: &str, _document: Value) -> Result<()> {
        Err(AppError::PersistenceError("connection refused".to_string()))
    }

    async fn check_health(&self) -> Result<()> {
        Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut))
    }
}

fn server() -> axum_test::TestServer {
    server_with(Arc::new(MemoryDocumentStore::new()))
}

fn server_with(documents: Arc<dyn DocumentStore>) -> axum_test::TestServer {
    let state = AppState {
        submissions: SubmissionService::new(
            Arc::new(MemoryObjectStorage::new("http://cdn.test")),
            documents,
            "products-staging",
        ),
        jwt_secret: "test-secret".to_string(),
        assets: None,
    };
    let server_config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_body_size: 1024 * 1024,
    };
    let cors = CorsConfig {
        allowed_origins: vec!["http://localhost:4200".to_string()],
    };

    axum_test::TestServer::new(app::router(state, &server_config, &cors).unwrap()).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let response = server().get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_readiness_check() {
    let response = server().get("/health/ready").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "status": "ready", "database": "connected" })
    );
}

#[tokio::test]
async fn test_readiness_reports_unavailable_store() {
    let response = server_with(Arc::new(UnreachableDocuments))
        .get("/health/ready")
        .await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.json::<Value>(),
        json!({ "status": "unavailable", "database": "disconnected" })
    );
}

#[tokio::test]
async fn test_assets_are_not_served_without_memory_backend() {
    let response = server().get("/assets/products-staging/images/a.jpg").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[test]
fn test_invalid_cors_origin_is_config_error() {
    let state = AppState {
        submissions: SubmissionService::new(
            Arc::new(MemoryObjectStorage::new("http://cdn.test")),
            Arc::new(MemoryDocumentStore::new()),
            "products-staging",
        ),
        jwt_secret: "test-secret".to_string(),
        assets: None,
    };
    let server_config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_body_size: 1024,
    };
    let cors = CorsConfig {
        allowed_origins: vec!["bad\norigin".to_string()],
    };

    assert!(matches!(
        app::router(state, &server_config, &cors),
        Err(products_adder::AppError::ConfigError(_))
    ));
}
