use bytes::Bytes;
use futures::future::join_all;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{FormEvent, FormState, PRODUCTS_COLLECTION, Product, SubmissionPhase, SubmissionTracker},
    services::{
        document_store::DocumentStore,
        image_encoder::{JPEG_CONTENT_TYPE, encode_all_blocking},
        object_storage::ObjectStorage,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub key: String,
    pub url: String,
}

/// Result of one submission together with the form state that follows it:
/// cleared after a success, untouched after a failure so it can be retried.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub form: FormState,
    pub tracker: SubmissionTracker,
    pub result: Result<Product>,
}

struct UploadAttempt {
    key: String,
    stored: bool,
    url: Result<String>,
}

/// Validates a form, uploads its photos and writes the product document.
///
/// Any failing photo fails the submission. Photos already stored by then are
/// deleted again, and the same happens when the document write fails, so a
/// failed submission leaves nothing behind.
#[derive(Clone)]
pub struct SubmissionService {
    storage: Arc<dyn ObjectStorage>,
    documents: Arc<dyn DocumentStore>,
    key_prefix: String,
}

impl SubmissionService {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        documents: Arc<dyn DocumentStore>,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            documents,
            key_prefix: key_prefix.into(),
        }
    }

    pub fn documents(&self) -> &Arc<dyn DocumentStore> {
        &self.documents
    }

    pub async fn submit(&self, form: FormState) -> SubmissionOutcome {
        let mut tracker = SubmissionTracker::default();
        let result = self.run(&form, &mut tracker).await;

        let form = match &result {
            Ok(product) => {
                tracing::info!(
                    product_id = %product.id,
                    images = product.image_urls.len(),
                    "Product added successfully"
                );
                form.apply(FormEvent::Reset)
            }
            Err(e) => {
                tracker.fail();
                tracing::warn!(phase = %tracker.phase(), error = %e, "Product submission failed");
                form
            }
        };

        SubmissionOutcome {
            form,
            tracker,
            result,
        }
    }

    async fn run(&self, form: &FormState, tracker: &mut SubmissionTracker) -> Result<Product> {
        tracker.advance(SubmissionPhase::Validating)?;
        let draft = form.validate()?;

        tracker.advance(SubmissionPhase::Uploading)?;
        tracing::info!(images = form.images.len(), "Uploading product images");
        let encoded = encode_all_blocking(form.images.clone()).await?;
        let uploaded = self.upload_all(encoded).await?;

        tracker.advance(SubmissionPhase::Persisting)?;
        let (keys, urls): (Vec<String>, Vec<String>) =
            uploaded.into_iter().map(|image| (image.key, image.url)).unzip();
        let product = draft.into_product(Uuid::new_v4().to_string(), urls);

        if let Err(e) = self.persist(&product).await {
            self.discard(&keys).await;
            return Err(e);
        }

        tracker.advance(SubmissionPhase::Succeeded)?;
        Ok(product)
    }

    async fn persist(&self, product: &Product) -> Result<()> {
        let document = serde_json::to_value(product)?;
        self.documents
            .add_document(PRODUCTS_COLLECTION, &product.id, document)
            .await
    }

    /// Uploads every buffer concurrently and waits for all of them.
    ///
    /// URLs come back in input order, callers should not rely on it.
    pub async fn upload_all(&self, images: Vec<Bytes>) -> Result<Vec<UploadedImage>> {
        let attempts = join_all(images.into_iter().map(|data| self.upload_one(data))).await;

        let mut uploaded = Vec::with_capacity(attempts.len());
        let mut orphaned = Vec::new();
        let mut first_error = None;

        for attempt in attempts {
            match attempt.url {
                Ok(url) => uploaded.push(UploadedImage {
                    key: attempt.key,
                    url,
                }),
                Err(e) => {
                    if attempt.stored {
                        orphaned.push(attempt.key);
                    }
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            orphaned.extend(uploaded.into_iter().map(|image| image.key));
            self.discard(&orphaned).await;
            return Err(e);
        }

        Ok(uploaded)
    }

    async fn upload_one(&self, data: Bytes) -> UploadAttempt {
        let key = format!("{}/images/{}.jpg", self.key_prefix, Uuid::new_v4());

        match self.storage.put(&key, data, JPEG_CONTENT_TYPE).await {
            Ok(object) => {
                let url = self.storage.public_url(&object).await;
                UploadAttempt {
                    key,
                    stored: true,
                    url,
                }
            }
            Err(e) => UploadAttempt {
                key,
                stored: false,
                url: Err(e),
            },
        }
    }

    async fn discard(&self, keys: &[String]) {
        if keys.is_empty() {
            return;
        }

        let results = join_all(keys.iter().map(|key| self.storage.delete(key))).await;
        for (key, result) in keys.iter().zip(results) {
            if let Err(e) = result {
                tracing::warn!(key = %key, error = %e, "Failed to delete orphaned image");
            }
        }
        tracing::info!(count = keys.len(), "Discarded images of failed submission");
    }
}
