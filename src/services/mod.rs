pub mod document_store;
pub mod image_encoder;
pub mod input_helpers;
pub mod memory;
pub mod object_storage;
pub mod submission_service;
