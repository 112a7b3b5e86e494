//! Storage module for uploaded images
//!
//! Provides a MinIO/S3-compatible client used by the files feature.

mod minio_client;

pub use minio_client::{MinIOClient, StoredObject};
