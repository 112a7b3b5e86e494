use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::skill_map::handlers::{
    get_concept, get_skill_map, get_skill_map_nodes, list_skill_categories,
};
use crate::features::skill_map::services::SkillMapService;

pub fn routes(service: Arc<SkillMapService>) -> Router {
    Router::new()
        .route("/api/skill-map", get(get_skill_map))
        .route("/api/skill-map/nodes", get(get_skill_map_nodes))
        .route("/api/skill-map/categories", get(list_skill_categories))
        .route("/api/concepts/{id}", get(get_concept))
        .with_state(service)
}
