use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::{AppConfig, BackendConfig, CorsConfig, ServerConfig, load_s3_client},
    database,
    error::{AppError, Result},
    routes,
    services::{
        document_store::{DocumentStore, PgDocumentStore},
        memory::{MemoryDocumentStore, MemoryObjectStorage},
        object_storage::{ObjectStorage, S3ObjectStorage},
        submission_service::SubmissionService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub submissions: SubmissionService,
    pub jwt_secret: String,
    /// Set for the memory backend, whose photos this service serves itself.
    pub assets: Option<Arc<MemoryObjectStorage>>,
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let state = build_state(config).await?;
    router(state, &config.server, &config.cors)
}

pub async fn build_state(config: &AppConfig) -> Result<AppState> {
    let mut assets = None;
    let (storage, documents): (Arc<dyn ObjectStorage>, Arc<dyn DocumentStore>) =
        match &config.backend {
            BackendConfig::Cloud {
                database: db_config,
                s3,
            } => {
                let pool = database::create_pool(db_config).await?;
                let client = load_s3_client(s3).await;
                (
                    Arc::new(S3ObjectStorage::new(client, &s3.bucket, &s3.assets_url)),
                    Arc::new(PgDocumentStore::new(pool)),
                )
            }
            BackendConfig::Memory { assets_url } => {
                tracing::warn!("Using in-memory storage, products are lost on restart");
                let storage = Arc::new(MemoryObjectStorage::new(assets_url));
                assets = Some(storage.clone());
                (storage, Arc::new(MemoryDocumentStore::new()))
            }
        };

    Ok(AppState {
        submissions: SubmissionService::new(storage, documents, config.environment.key_prefix()),
        jwt_secret: config.auth.jwt_secret.clone(),
        assets,
    })
}

pub fn router(state: AppState, server: &ServerConfig, cors: &CorsConfig) -> Result<Router> {
    let allowed_origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| AppError::ConfigError(format!("Invalid CORS origin: {}", origin)))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_origin(allowed_origins);

    let app = routes::create_router(&state)
        .layer(DefaultBodyLimit::max(server.max_body_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}
