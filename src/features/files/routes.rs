use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::dtos::MAX_FILE_SIZE;
use crate::features::files::handlers::{delete_file_by_url, get_file_content, upload_file};
use crate::features::files::services::FileService;

/// Public upload and content routes
pub fn routes(file_service: Arc<FileService>) -> Router {
    Router::new()
        .route(
            "/api/files/upload",
            // Allow body size up to MAX_FILE_SIZE + buffer for multipart overhead
            post(upload_file).layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 1024 * 1024)),
        )
        .route("/api/files/{id}/content", get(get_file_content))
        .with_state(file_service)
}

/// Routes nested under the admin mount
pub fn admin_routes(file_service: Arc<FileService>) -> Router {
    Router::new()
        .route("/files", delete(delete_file_by_url))
        .with_state(file_service)
}
