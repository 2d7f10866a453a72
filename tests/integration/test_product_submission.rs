//! Product submission over HTTP, against in-memory stores

use async_trait::async_trait;
use axum::http::{StatusCode, header};
use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, RgbImage};
use products_adder::{
    AppError, Result,
    app::{self, AppState},
    config::{CorsConfig, ServerConfig},
    models::PRODUCTS_COLLECTION,
    services::{
        memory::{MemoryDocumentStore, MemoryObjectStorage},
        object_storage::{ObjectStorage, StoredObject},
        submission_service::SubmissionService,
    },
    utils::jwt,
};
use serde_json::Value;
use std::{io::Cursor, sync::Arc};

const SECRET: &str = "test-secret";
const ASSETS_URL: &str = "http://cdn.test";

struct Harness {
    server: TestServer,
    storage: Arc<MemoryObjectStorage>,
    documents: Arc<MemoryDocumentStore>,
}

/// Stores the first photo, refuses every later one.
struct SecondPhotoRefused {
    inner: Arc<MemoryObjectStorage>,
    calls: tokio::sync::Mutex<usize>,
}

#[async_trait]
impl ObjectStorage for SecondPhotoRefused {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<StoredObject> {
        let mut calls = self.calls.lock().await;
        *calls += 1;
        if *calls > 1 {
            return Err(AppError::UploadError("bucket unavailable".to_string()));
        }
        self.inner.put(key, data, content_type).await
    }

    async fn public_url(&self, object: &StoredObject) -> Result<String> {
        self.inner.public_url(object).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.delete(key).await
    }
}

fn harness_with(storage: Arc<dyn ObjectStorage>, inner: Arc<MemoryObjectStorage>) -> Harness {
    let documents = Arc::new(MemoryDocumentStore::new());
    let state = AppState {
        submissions: SubmissionService::new(storage, documents.clone(), "products-staging"),
        jwt_secret: SECRET.to_string(),
        assets: Some(inner.clone()),
    };
    let server_config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_body_size: 10 * 1024 * 1024,
    };
    let cors = CorsConfig {
        allowed_origins: vec!["http://localhost:4200".to_string()],
    };

    Harness {
        server: TestServer::new(app::router(state, &server_config, &cors).unwrap()).unwrap(),
        storage: inner,
        documents,
    }
}

fn harness() -> Harness {
    let storage = Arc::new(MemoryObjectStorage::new(ASSETS_URL));
    harness_with(storage.clone(), storage)
}

fn token() -> String {
    jwt::generate_token(SECRET, "operator-1", "op@example.com", chrono::Duration::hours(1))
        .unwrap()
}

fn png_part(name: &str) -> Part {
    let mut data = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::new(3, 2))
        .write_to(&mut data, ImageFormat::Png)
        .unwrap();

    Part::bytes(data.into_inner())
        .file_name(name.to_string())
        .mime_type("image/png")
}

fn shirt_form() -> MultipartForm {
    MultipartForm::new()
        .add_text("name", "Shirt")
        .add_text("category", "Clothes")
        .add_text("price", "19.99")
        .add_part("images", png_part("front.png"))
}

#[tokio::test]
async fn test_minimal_product_is_created() {
    let h = harness();

    let response = h
        .server
        .post("/admin/products")
        .authorization_bearer(token())
        .multipart(shirt_form())
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Product added successfully");

    let product = &body["product"];
    assert_eq!(product["name"], "Shirt");
    assert_eq!(product["category"], "Clothes");
    assert!((product["price"].as_f64().unwrap() - 19.99).abs() < 1e-9);
    for absent in ["colors", "sizes", "description", "discountPercentage"] {
        assert!(product.get(absent).is_none(), "{} should be absent", absent);
    }

    let urls = product["imageUrls"].as_array().unwrap();
    assert_eq!(urls.len(), 1);
    let keys = h.storage.keys().await;
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("products-staging/images/"));
    assert_eq!(urls[0], format!("{}/{}", ASSETS_URL, keys[0]));

    let stored = h.documents.documents(PRODUCTS_COLLECTION).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["id"], product["id"]);
    assert_eq!(stored[0]["imageUrls"], product["imageUrls"]);
}

#[tokio::test]
async fn test_optional_fields_are_recorded() {
    let h = harness();
    let form = shirt_form()
        .add_text("description", "Cotton tee")
        .add_text("offer_percentage", "10")
        .add_text("sizes", "S, M ,L")
        .add_text("color", "#FFFF0000")
        .add_text("color", "0xFF00FF00")
        .add_part("images", png_part("back.png"));

    let response = h
        .server
        .post("/admin/products")
        .authorization_bearer(token())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let product = &response.json::<Value>()["product"];
    assert_eq!(product["description"], "Cotton tee");
    assert_eq!(product["discountPercentage"].as_f64(), Some(10.0));
    assert_eq!(product["sizes"], serde_json::json!(["S", "M", "L"]));
    assert_eq!(
        product["colors"],
        serde_json::json!([0xFFFF0000u32, 0xFF00FF00u32])
    );
    assert_eq!(product["imageUrls"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let h = harness();

    let response = h.server.post("/admin/products").multipart(shirt_form()).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert!(h.storage.keys().await.is_empty());
}

#[tokio::test]
async fn test_foreign_token_is_rejected() {
    let h = harness();
    let foreign =
        jwt::generate_token("other-secret", "x", "x@example.com", chrono::Duration::hours(1))
            .unwrap();

    let response = h
        .server
        .post("/admin/products")
        .authorization_bearer(foreign)
        .multipart(shirt_form())
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_required_fields_upload_nothing() {
    let h = harness();
    let form = MultipartForm::new()
        .add_text("name", "Shirt")
        .add_text("price", "19.99");

    let response = h
        .server
        .post("/admin/products")
        .authorization_bearer(token())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let message = response.json::<Value>()["message"].as_str().unwrap().to_string();
    assert!(message.contains("category"));
    assert!(message.contains("images"));
    assert!(h.storage.keys().await.is_empty());
    assert!(h.documents.documents(PRODUCTS_COLLECTION).await.is_empty());
}

#[tokio::test]
async fn test_invalid_color_is_rejected() {
    let h = harness();

    let response = h
        .server
        .post("/admin/products")
        .authorization_bearer(token())
        .multipart(shirt_form().add_text("color", "blue"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signed_int_color_is_accepted() {
    let h = harness();

    let response = h
        .server
        .post("/admin/products")
        .authorization_bearer(token())
        .multipart(shirt_form().add_text("color", "-16711936"))
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(
        response.json::<Value>()["product"]["colors"],
        serde_json::json!([0xFF00FF00u32])
    );
}

#[tokio::test]
async fn test_undecodable_photo_is_unprocessable() {
    let h = harness();
    let form = shirt_form().add_part(
        "images",
        Part::bytes(b"definitely not an image".to_vec())
            .file_name("notes.png")
            .mime_type("image/png"),
    );

    let response = h
        .server
        .post("/admin/products")
        .authorization_bearer(token())
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(h.storage.keys().await.is_empty());
}

#[tokio::test]
async fn test_partial_upload_failure_persists_nothing() {
    let inner = Arc::new(MemoryObjectStorage::new(ASSETS_URL));
    let storage = Arc::new(SecondPhotoRefused {
        inner: inner.clone(),
        calls: tokio::sync::Mutex::new(0),
    });
    let h = harness_with(storage, inner);

    let response = h
        .server
        .post("/admin/products")
        .authorization_bearer(token())
        .multipart(shirt_form().add_part("images", png_part("back.png")))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    assert_eq!(response.json::<Value>()["message"], "bucket unavailable");
    assert!(h.documents.documents(PRODUCTS_COLLECTION).await.is_empty());
    assert!(h.storage.keys().await.is_empty());
}

#[tokio::test]
async fn test_stored_photo_is_served_as_jpeg() {
    let h = harness();

    let response = h
        .server
        .post("/admin/products")
        .authorization_bearer(token())
        .multipart(shirt_form())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let url = response.json::<Value>()["product"]["imageUrls"][0]
        .as_str()
        .unwrap()
        .to_string();
    let key = url.strip_prefix(&format!("{}/", ASSETS_URL)).unwrap();

    let asset = h.server.get(&format!("/assets/{}", key)).await;

    assert_eq!(asset.status_code(), StatusCode::OK);
    assert_eq!(asset.header(header::CONTENT_TYPE), "image/jpeg");
    assert!(asset.as_bytes().starts_with(&[0xFF, 0xD8]));
}

#[tokio::test]
async fn test_unknown_asset_is_not_found() {
    let h = harness();

    let response = h
        .server
        .get("/assets/products-staging/images/missing.jpg")
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
