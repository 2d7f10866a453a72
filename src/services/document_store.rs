use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::{
    database,
    error::{AppError, Result},
    queries::document_queries,
};

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Adds a new document; an existing `(collection, id)` pair is an error.
    async fn add_document(&self, collection: &str, id: &str, document: Value) -> Result<()>;

    async fn check_health(&self) -> Result<()>;
}

pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn add_document(&self, collection: &str, id: &str, document: Value) -> Result<()> {
        document_queries::insert_document(&self.pool, collection, id, &document)
            .await
            .map_err(|e| match e {
                AppError::DatabaseError(err) => AppError::PersistenceError(err.to_string()),
                other => other,
            })
    }

    async fn check_health(&self) -> Result<()> {
        database::check_health(&self.pool).await
    }
}
