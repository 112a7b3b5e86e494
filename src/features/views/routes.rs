use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::views::handlers::{create_view, delete_view, get_view, post_view_event};
use crate::features::views::services::ViewService;

pub fn routes(service: Arc<ViewService>) -> Router {
    Router::new()
        .route("/api/views", post(create_view))
        .route("/api/views/{id}", get(get_view).delete(delete_view))
        .route("/api/views/{id}/events", post(post_view_event))
        .with_state(service)
}
