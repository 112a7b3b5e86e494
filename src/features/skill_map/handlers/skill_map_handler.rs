use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::catalog::engine::CatalogNode;
use crate::features::skill_map::dtos::{
    CatalogQueryParams, CategoryOptionDto, ConceptDetailDto, SkillMapResponseDto,
};
use crate::features::skill_map::services::SkillMapService;
use crate::shared::types::{ApiResponse, Meta};

/// Skill map tree filtered by text query and category
#[utoipa::path(
    get,
    path = "/api/skill-map",
    params(CatalogQueryParams),
    responses(
        (status = 200, description = "Filtered skill map", body = ApiResponse<SkillMapResponseDto>),
        (status = 400, description = "Query too long or malformed")
    ),
    tag = "skill-map"
)]
pub async fn get_skill_map(
    State(service): State<Arc<SkillMapService>>,
    AppQuery(params): AppQuery<CatalogQueryParams>,
) -> Result<Json<ApiResponse<SkillMapResponseDto>>> {
    let skill_map = service.get_skill_map(params).await?;
    Ok(Json(ApiResponse::success(Some(skill_map), None, None)))
}

/// Flat node list of the whole skill map, each node flagged with
/// `matches_filter`
#[utoipa::path(
    get,
    path = "/api/skill-map/nodes",
    params(CatalogQueryParams),
    responses(
        (status = 200, description = "Annotated nodes in depth-first order", body = ApiResponse<Vec<CatalogNode>>),
        (status = 400, description = "Query too long or malformed")
    ),
    tag = "skill-map"
)]
pub async fn get_skill_map_nodes(
    State(service): State<Arc<SkillMapService>>,
    AppQuery(params): AppQuery<CatalogQueryParams>,
) -> Result<Json<ApiResponse<Vec<CatalogNode>>>> {
    let nodes = service.get_annotated_nodes(params).await?;
    let matching = nodes.iter().filter(|n| n.matches_filter).count() as i64;
    Ok(Json(ApiResponse::success(
        Some(nodes),
        None,
        Some(Meta { total: matching }),
    )))
}

/// Categories for the category selector
#[utoipa::path(
    get,
    path = "/api/skill-map/categories",
    responses(
        (status = 200, description = "Categories in display order", body = ApiResponse<Vec<CategoryOptionDto>>)
    ),
    tag = "skill-map"
)]
pub async fn list_skill_categories(
    State(service): State<Arc<SkillMapService>>,
) -> Result<Json<ApiResponse<Vec<CategoryOptionDto>>>> {
    let categories = service.list_categories().await?;
    let total = categories.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(categories),
        None,
        Some(Meta { total }),
    )))
}

/// Concept detail page
#[utoipa::path(
    get,
    path = "/api/concepts/{id}",
    params(
        ("id" = Uuid, Path, description = "Concept ID")
    ),
    responses(
        (status = 200, description = "Concept found", body = ApiResponse<ConceptDetailDto>),
        (status = 404, description = "Concept not found")
    ),
    tag = "skill-map"
)]
pub async fn get_concept(
    State(service): State<Arc<SkillMapService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ConceptDetailDto>>> {
    let concept = service.get_concept(id).await?;
    Ok(Json(ApiResponse::success(Some(concept), None, None)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;
    use std::sync::Arc;

    use crate::features::catalog::engine::GraphProjector;
    use crate::features::catalog::models::Concept;
    use crate::features::catalog::CatalogService;
    use crate::features::skill_map::routes::routes;
    use crate::features::skill_map::services::SkillMapService;
    use crate::shared::test_helpers::{category, concept, subcategory, MemoryCatalogSource};

    fn server(source: MemoryCatalogSource) -> TestServer {
        let catalog = Arc::new(CatalogService::new(
            Arc::new(source),
            GraphProjector::default(),
        ));
        TestServer::new(routes(Arc::new(SkillMapService::new(catalog)))).unwrap()
    }

    fn seeded() -> (MemoryCatalogSource, Concept) {
        let frameworks = category("Frameworks", 1);
        let tools = category("Tools", 0);
        let diagramming = subcategory(&tools, "Diagramming", 0);
        let strategy = subcategory(&frameworks, "Strategy", 0);
        let figma = concept(&diagramming, "Figma", "collaborative design tool");
        let swot = concept(&strategy, "SWOT Analysis", "strengths and weaknesses");
        let source = MemoryCatalogSource::new()
            .with_categories(vec![frameworks, tools])
            .with_subcategories(vec![diagramming, strategy])
            .with_concepts(vec![figma.clone(), swot]);
        (source, figma)
    }

    #[tokio::test]
    async fn test_skill_map_filters_by_query() {
        let (source, _) = seeded();
        let response = server(source)
            .get("/api/skill-map")
            .add_query_param("q", "  FIGMA ")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["query"], "figma");
        assert_eq!(body["data"]["shown_categories"], 1);
        assert_eq!(body["data"]["categories"][0]["name"], "Tools");
        assert_eq!(
            body["data"]["categories"][0]["subcategories"][0]["concepts"][0]["name"],
            "Figma"
        );
    }

    #[tokio::test]
    async fn test_skill_map_category_selection() {
        let (source, _) = seeded();
        let response = server(source)
            .get("/api/skill-map")
            .add_query_param("category", "Frameworks")
            .await;

        let body: Value = response.json();
        assert_eq!(body["data"]["selected_category"], "Frameworks");
        assert_eq!(body["data"]["total_concepts"], 1);
        assert_eq!(body["data"]["no_results"], false);
    }

    #[tokio::test]
    async fn test_skill_map_source_failure_degrades_to_empty() {
        let (source, _) = seeded();
        let response = server(source.failing()).get("/api/skill-map").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["no_results"], true);
    }

    #[tokio::test]
    async fn test_nodes_flag_matches_without_pruning() {
        let (source, _) = seeded();
        let response = server(source)
            .get("/api/skill-map/nodes")
            .add_query_param("q", "figma")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        let nodes = body["data"].as_array().expect("node list");
        assert_eq!(nodes.len(), 6);
        assert_eq!(body["meta"]["total"], 3);

        let swot = nodes
            .iter()
            .find(|n| n["label"] == "SWOT Analysis")
            .expect("swot node");
        assert_eq!(swot["matches_filter"], false);
        assert_eq!(swot["level"], "leaf");
    }

    #[tokio::test]
    async fn test_categories_in_display_order() {
        let (source, _) = seeded();
        let response = server(source).get("/api/skill-map/categories").await;

        let body: Value = response.json();
        assert_eq!(body["data"][0]["name"], "Tools");
        assert_eq!(body["data"][1]["name"], "Frameworks");
        assert_eq!(body["meta"]["total"], 2);
    }

    #[tokio::test]
    async fn test_concept_detail_and_missing() {
        let (source, figma) = seeded();
        let server = server(source);

        let response = server.get(&format!("/api/concepts/{}", figma.id)).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["subcategory_name"], "Diagramming");
        assert_eq!(body["data"]["category_name"], "Tools");

        let response = server
            .get(&format!("/api/concepts/{}", uuid::Uuid::new_v4()))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
