use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::products::dtos::{
    CategoryOptionsDto, CreateSubmissionDto, ProductDetailDto, ProductGraphResponseDto,
    SubmissionCreatedDto,
};
use crate::features::products::services::{ProductService, SubmissionService};
use crate::features::skill_map::dtos::CatalogQueryParams;
use crate::shared::types::ApiResponse;

/// Positioned graph of approved products
#[utoipa::path(
    get,
    path = "/api/products/graph",
    params(CatalogQueryParams),
    responses(
        (status = 200, description = "Product graph", body = ApiResponse<ProductGraphResponseDto>),
        (status = 400, description = "Query too long or malformed")
    ),
    tag = "products"
)]
pub async fn get_product_graph(
    State(service): State<Arc<ProductService>>,
    AppQuery(params): AppQuery<CatalogQueryParams>,
) -> Result<Json<ApiResponse<ProductGraphResponseDto>>> {
    let graph = service.get_graph(params).await?;
    Ok(Json(ApiResponse::success(Some(graph), None, None)))
}

/// Approved product detail
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ApiResponse<ProductDetailDto>),
        (status = 404, description = "Product not found or not yet approved")
    ),
    tag = "products"
)]
pub async fn get_product(
    State(service): State<Arc<ProductService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProductDetailDto>>> {
    let product = service.get_product(id).await?;
    Ok(Json(ApiResponse::success(Some(product), None, None)))
}

/// Category and subcategory choices for the submission form
#[utoipa::path(
    get,
    path = "/api/submissions/options",
    responses(
        (status = 200, description = "Form options", body = ApiResponse<Vec<CategoryOptionsDto>>)
    ),
    tag = "products"
)]
pub async fn get_submission_options(
    State(service): State<Arc<ProductService>>,
) -> Result<Json<ApiResponse<Vec<CategoryOptionsDto>>>> {
    let options = service.get_form_options().await?;
    Ok(Json(ApiResponse::success(Some(options), None, None)))
}

/// Submit a product for moderation
#[utoipa::path(
    post,
    path = "/api/submissions",
    request_body = CreateSubmissionDto,
    responses(
        (status = 201, description = "Submission received", body = ApiResponse<SubmissionCreatedDto>),
        (status = 400, description = "Validation error or unknown subcategory")
    ),
    tag = "products"
)]
pub async fn create_submission(
    State(service): State<Arc<SubmissionService>>,
    AppJson(dto): AppJson<CreateSubmissionDto>,
) -> Result<(StatusCode, Json<ApiResponse<SubmissionCreatedDto>>)> {
    let dto = dto.normalized();
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let submission = service.create(dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(SubmissionCreatedDto::from(submission)),
            Some("Submission received and awaiting review".to_string()),
            None,
        )),
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::{routing::get, Router};
    use axum_test::TestServer;
    use serde_json::Value;
    use std::sync::Arc;

    use super::*;
    use crate::features::catalog::engine::GraphProjector;
    use crate::features::catalog::models::SubmissionStatus;
    use crate::features::catalog::CatalogService;
    use crate::shared::test_helpers::{category, subcategory, submission, MemoryCatalogSource};

    fn server() -> (TestServer, Uuid) {
        let tools = category("Tools", 0);
        let diagramming = subcategory(&tools, "Diagramming", 0);
        let flowly = submission(Some(&diagramming), "Flowly", SubmissionStatus::Approved);
        let source = MemoryCatalogSource::new()
            .with_categories(vec![tools])
            .with_subcategories(vec![diagramming])
            .with_submissions(vec![flowly.clone()]);
        let catalog = Arc::new(CatalogService::new(
            Arc::new(source),
            GraphProjector::default(),
        ));
        let app = Router::new()
            .route("/api/products/graph", get(get_product_graph))
            .route("/api/products/{id}", get(get_product))
            .route("/api/submissions/options", get(get_submission_options))
            .with_state(Arc::new(ProductService::new(catalog)));
        (TestServer::new(app).unwrap(), flowly.id)
    }

    #[tokio::test]
    async fn test_graph_endpoint() {
        let (server, flowly) = server();
        let response = server.get("/api/products/graph").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["total_products"], 1);
        assert_eq!(body["data"]["graph"]["nodes"][0]["id"], "root");
        let leaf_id = format!("leaf-{}", flowly);
        assert!(body["data"]["graph"]["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .any(|n| n["id"] == leaf_id.as_str()));
    }

    #[tokio::test]
    async fn test_graph_rejects_long_query() {
        let (server, _) = server();
        let response = server
            .get("/api/products/graph")
            .add_query_param("q", "x".repeat(300))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_product_detail() {
        let (server, flowly) = server();
        let response = server.get(&format!("/api/products/{}", flowly)).await;

        let body: Value = response.json();
        assert_eq!(body["data"]["title"], "Flowly");
        assert_eq!(body["data"]["description"], "Flowly description");
    }

    #[tokio::test]
    async fn test_bad_product_id_is_rejected() {
        let (server, _) = server();
        let response = server.get("/api/products/not-a-uuid").await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_submission_options() {
        let (server, _) = server();
        let body: Value = server.get("/api/submissions/options").await.json();

        assert_eq!(body["data"][0]["name"], "Tools");
        assert_eq!(body["data"][0]["subcategories"][0]["name"], "Diagramming");
    }
}
