use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::products::handlers::{
    create_submission, get_product, get_product_graph, get_submission_options,
};
use crate::features::products::services::{ProductService, SubmissionService};

pub fn routes(
    product_service: Arc<ProductService>,
    submission_service: Arc<SubmissionService>,
) -> Router {
    let read_routes = Router::new()
        .route("/api/products/graph", get(get_product_graph))
        .route("/api/products/{id}", get(get_product))
        .route("/api/submissions/options", get(get_submission_options))
        .with_state(product_service);

    let write_routes = Router::new()
        .route("/api/submissions", post(create_submission))
        .with_state(submission_service);

    read_routes.merge(write_routes)
}
