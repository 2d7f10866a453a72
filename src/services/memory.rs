use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, Result},
    services::{
        document_store::DocumentStore,
        object_storage::{ObjectStorage, StoredObject},
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryObject {
    pub data: Bytes,
    pub content_type: String,
}

/// Process-local object storage. Nothing survives a restart.
pub struct MemoryObjectStorage {
    base_url: String,
    objects: RwLock<HashMap<String, MemoryObject>>,
}

impl MemoryObjectStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &str) -> Option<MemoryObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<StoredObject> {
        self.objects.write().await.insert(
            key.to_string(),
            MemoryObject {
                data,
                content_type: content_type.to_string(),
            },
        );

        Ok(StoredObject {
            key: key.to_string(),
        })
    }

    async fn public_url(&self, object: &StoredObject) -> Result<String> {
        if !self.objects.read().await.contains_key(&object.key) {
            return Err(AppError::UploadError(format!(
                "Object {} does not exist",
                object.key
            )));
        }

        Ok(format!("{}/{}", self.base_url, object.key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.objects.write().await.remove(key);
        Ok(())
    }
}

/// Process-local document store, grouped by collection in insertion order.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<(String, Value)>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn documents(&self, collection: &str) -> Vec<Value> {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn add_document(&self, collection: &str, id: &str, document: Value) -> Result<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if docs.iter().any(|(existing, _)| existing == id) {
            return Err(AppError::PersistenceError(format!(
                "Document {} already exists in {}",
                id, collection
            )));
        }

        docs.push((id.to_string(), document));
        Ok(())
    }

    async fn check_health(&self) -> Result<()> {
        Ok(())
    }
}
