use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::admin::dtos::*;
use crate::features::admin::services::{AdminService, SeedService};
use crate::shared::types::{ApiResponse, Meta};

fn validated<T: Validate>(dto: T) -> Result<T> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(dto)
}

fn deleted(id: Uuid, message: &str) -> Json<ApiResponse<DeletedDto>> {
    Json(ApiResponse::success(
        Some(DeletedDto { id, deleted: true }),
        Some(message.to_string()),
        None,
    ))
}

// =============================================================================
// CATEGORIES
// =============================================================================

/// List categories with subcategory and concept counts (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/categories",
    params(CategoryQueryParams),
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<AdminCategoryDto>>),
        (status = 401, description = "Missing or invalid admin credentials")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn list_categories(
    State(service): State<Arc<AdminService>>,
    AppQuery(params): AppQuery<CategoryQueryParams>,
) -> Result<Json<ApiResponse<Vec<AdminCategoryDto>>>> {
    let (items, total) = service.list_categories(&params).await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CategoryInputDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<AdminCategoryDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Category name already exists")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn create_category(
    State(service): State<Arc<AdminService>>,
    AppJson(dto): AppJson<CategoryInputDto>,
) -> Result<(StatusCode, Json<ApiResponse<AdminCategoryDto>>)> {
    let dto = validated(dto.normalized())?;
    let category = service.create_category(dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(category),
            Some("Category created".to_string()),
            None,
        )),
    ))
}

/// Replace every field of a category
#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = CategoryInputDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<AdminCategoryDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category name already exists")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn update_category(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<CategoryInputDto>,
) -> Result<Json<ApiResponse<AdminCategoryDto>>> {
    let dto = validated(dto.normalized())?;
    let category = service.update_category(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

/// Delete a category together with its subcategories and concepts
#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<DeletedDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn delete_category(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedDto>>> {
    service.delete_category(id).await?;
    Ok(deleted(id, "Category deleted"))
}

// =============================================================================
// SUBCATEGORIES
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/admin/subcategories",
    params(SubcategoryQueryParams),
    responses(
        (status = 200, description = "List of subcategories", body = ApiResponse<Vec<AdminSubcategoryDto>>),
        (status = 401, description = "Missing or invalid admin credentials")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn list_subcategories(
    State(service): State<Arc<AdminService>>,
    AppQuery(params): AppQuery<SubcategoryQueryParams>,
) -> Result<Json<ApiResponse<Vec<AdminSubcategoryDto>>>> {
    let (items, total) = service.list_subcategories(&params).await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/subcategories",
    request_body = SubcategoryInputDto,
    responses(
        (status = 201, description = "Subcategory created", body = ApiResponse<AdminSubcategoryDto>),
        (status = 400, description = "Validation error or unknown category"),
        (status = 409, description = "Name already used in this category")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn create_subcategory(
    State(service): State<Arc<AdminService>>,
    AppJson(dto): AppJson<SubcategoryInputDto>,
) -> Result<(StatusCode, Json<ApiResponse<AdminSubcategoryDto>>)> {
    let dto = validated(dto.normalized())?;
    let subcategory = service.create_subcategory(dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(subcategory),
            Some("Subcategory created".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/subcategories/{id}",
    params(("id" = Uuid, Path, description = "Subcategory ID")),
    request_body = SubcategoryInputDto,
    responses(
        (status = 200, description = "Subcategory updated", body = ApiResponse<AdminSubcategoryDto>),
        (status = 400, description = "Validation error or unknown category"),
        (status = 404, description = "Subcategory not found")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn update_subcategory(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SubcategoryInputDto>,
) -> Result<Json<ApiResponse<AdminSubcategoryDto>>> {
    let dto = validated(dto.normalized())?;
    let subcategory = service.update_subcategory(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(subcategory), None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/subcategories/{id}",
    params(("id" = Uuid, Path, description = "Subcategory ID")),
    responses(
        (status = 200, description = "Subcategory deleted", body = ApiResponse<DeletedDto>),
        (status = 404, description = "Subcategory not found")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn delete_subcategory(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedDto>>> {
    service.delete_subcategory(id).await?;
    Ok(deleted(id, "Subcategory deleted"))
}

// =============================================================================
// CONCEPTS
// =============================================================================

#[utoipa::path(
    get,
    path = "/api/admin/concepts",
    params(ConceptQueryParams),
    responses(
        (status = 200, description = "List of concepts", body = ApiResponse<Vec<AdminConceptDto>>),
        (status = 401, description = "Missing or invalid admin credentials")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn list_concepts(
    State(service): State<Arc<AdminService>>,
    AppQuery(params): AppQuery<ConceptQueryParams>,
) -> Result<Json<ApiResponse<Vec<AdminConceptDto>>>> {
    let (items, total) = service.list_concepts(&params).await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/concepts/{id}",
    operation_id = "admin_get_concept",
    params(("id" = Uuid, Path, description = "Concept ID")),
    responses(
        (status = 200, description = "Concept with every field", body = ApiResponse<AdminConceptDetailDto>),
        (status = 404, description = "Concept not found")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn get_concept(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AdminConceptDetailDto>>> {
    let concept = service.get_concept(id).await?;
    Ok(Json(ApiResponse::success(Some(concept), None, None)))
}

#[utoipa::path(
    post,
    path = "/api/admin/concepts",
    request_body = ConceptInputDto,
    responses(
        (status = 201, description = "Concept created", body = ApiResponse<AdminConceptDetailDto>),
        (status = 400, description = "Validation error or unknown subcategory")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn create_concept(
    State(service): State<Arc<AdminService>>,
    AppJson(dto): AppJson<ConceptInputDto>,
) -> Result<(StatusCode, Json<ApiResponse<AdminConceptDetailDto>>)> {
    let dto = validated(dto.normalized())?;
    let concept = service.create_concept(dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(concept),
            Some("Concept created".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/admin/concepts/{id}",
    params(("id" = Uuid, Path, description = "Concept ID")),
    request_body = ConceptInputDto,
    responses(
        (status = 200, description = "Concept updated", body = ApiResponse<AdminConceptDetailDto>),
        (status = 400, description = "Validation error or unknown subcategory"),
        (status = 404, description = "Concept not found")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn update_concept(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<ConceptInputDto>,
) -> Result<Json<ApiResponse<AdminConceptDetailDto>>> {
    let dto = validated(dto.normalized())?;
    let concept = service.update_concept(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(concept), None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/concepts/{id}",
    params(("id" = Uuid, Path, description = "Concept ID")),
    responses(
        (status = 200, description = "Concept deleted", body = ApiResponse<DeletedDto>),
        (status = 404, description = "Concept not found")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn delete_concept(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedDto>>> {
    service.delete_concept(id).await?;
    Ok(deleted(id, "Concept deleted"))
}

// =============================================================================
// SUBMISSIONS
// =============================================================================

/// List submissions, newest first (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/submissions",
    params(SubmissionQueryParams),
    responses(
        (status = 200, description = "List of submissions", body = ApiResponse<Vec<AdminSubmissionDto>>),
        (status = 401, description = "Missing or invalid admin credentials")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn list_submissions(
    State(service): State<Arc<AdminService>>,
    AppQuery(params): AppQuery<SubmissionQueryParams>,
) -> Result<Json<ApiResponse<Vec<AdminSubmissionDto>>>> {
    let (items, total) = service.list_submissions(&params).await?;

    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/submissions/stats",
    responses(
        (status = 200, description = "Submission counts by status", body = ApiResponse<SubmissionStatsDto>)
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn get_submission_stats(
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<SubmissionStatsDto>>> {
    let stats = service.submission_stats().await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}

#[utoipa::path(
    get,
    path = "/api/admin/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission of any status", body = ApiResponse<AdminSubmissionDto>),
        (status = 404, description = "Submission not found")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn get_submission(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AdminSubmissionDto>>> {
    let submission = service.get_submission(id).await?;
    Ok(Json(ApiResponse::success(Some(submission), None, None)))
}

#[utoipa::path(
    put,
    path = "/api/admin/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    request_body = SubmissionUpdateDto,
    responses(
        (status = 200, description = "Submission updated", body = ApiResponse<AdminSubmissionDto>),
        (status = 400, description = "Validation error or unknown subcategory"),
        (status = 404, description = "Submission not found")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn update_submission(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SubmissionUpdateDto>,
) -> Result<Json<ApiResponse<AdminSubmissionDto>>> {
    let dto = validated(dto.normalized())?;
    let submission = service.update_submission(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(submission), None, None)))
}

/// Approve a submission or send it back to the queue
#[utoipa::path(
    put,
    path = "/api/admin/submissions/{id}/status",
    params(("id" = Uuid, Path, description = "Submission ID")),
    request_body = SetSubmissionStatusDto,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<AdminSubmissionDto>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Submission not found")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn set_submission_status(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SetSubmissionStatusDto>,
) -> Result<Json<ApiResponse<AdminSubmissionDto>>> {
    let submission = service.set_submission_status(id, dto.status).await?;
    Ok(Json(ApiResponse::success(
        Some(submission),
        Some(format!("Submission marked as {}", dto.status)),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/admin/submissions/{id}",
    params(("id" = Uuid, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission deleted", body = ApiResponse<DeletedDto>),
        (status = 404, description = "Submission not found")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn delete_submission(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedDto>>> {
    service.delete_submission(id).await?;
    Ok(deleted(id, "Submission deleted"))
}

// =============================================================================
// SEED
// =============================================================================

/// Populate the default business analysis catalog
///
/// With `force=true` the existing catalog is deleted first. Submissions are
/// kept but detached from their subcategory, so approved products disappear
/// from the product graph until they are reassigned; the response reports
/// how many were detached.
#[utoipa::path(
    post,
    path = "/api/admin/seed",
    params(SeedQueryParams),
    responses(
        (status = 201, description = "Catalog seeded", body = ApiResponse<SeedSummaryDto>),
        (status = 409, description = "Catalog not empty and force not set")
    ),
    tag = "admin",
    security(("basic_auth" = []))
)]
pub async fn seed_catalog(
    State(service): State<Arc<SeedService>>,
    AppQuery(params): AppQuery<SeedQueryParams>,
) -> Result<(StatusCode, Json<ApiResponse<SeedSummaryDto>>)> {
    let summary = service.seed(params.force).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(summary),
            Some("Default catalog populated".to_string()),
            None,
        )),
    ))
}
