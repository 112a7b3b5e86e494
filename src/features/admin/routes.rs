use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::admin::handlers;
use crate::features::admin::services::{AdminService, SeedService};

/// Content management routes, relative to the admin mount path
pub fn routes(admin_service: Arc<AdminService>, seed_service: Arc<SeedService>) -> Router {
    let content = Router::new()
        .route(
            "/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/categories/{id}",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .route(
            "/subcategories",
            get(handlers::list_subcategories).post(handlers::create_subcategory),
        )
        .route(
            "/subcategories/{id}",
            put(handlers::update_subcategory).delete(handlers::delete_subcategory),
        )
        .route(
            "/concepts",
            get(handlers::list_concepts).post(handlers::create_concept),
        )
        .route(
            "/concepts/{id}",
            get(handlers::get_concept)
                .put(handlers::update_concept)
                .delete(handlers::delete_concept),
        )
        .route("/submissions", get(handlers::list_submissions))
        .route("/submissions/stats", get(handlers::get_submission_stats))
        .route(
            "/submissions/{id}",
            get(handlers::get_submission)
                .put(handlers::update_submission)
                .delete(handlers::delete_submission),
        )
        .route(
            "/submissions/{id}/status",
            put(handlers::set_submission_status),
        )
        .with_state(admin_service);

    let seed = Router::new()
        .route("/seed", post(handlers::seed_catalog))
        .with_state(seed_service);

    content.merge(seed)
}
