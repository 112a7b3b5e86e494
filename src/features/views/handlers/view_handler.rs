use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::views::dtos::{
    CreateViewDto, DeleteViewResponseDto, ViewEventDto, ViewResponseDto,
};
use crate::features::views::services::ViewService;
use crate::shared::types::ApiResponse;

/// Open an interactive view session
#[utoipa::path(
    post,
    path = "/api/views",
    request_body = CreateViewDto,
    responses(
        (status = 201, description = "View opened", body = ApiResponse<ViewResponseDto>),
        (status = 400, description = "Unknown view kind")
    ),
    tag = "views"
)]
pub async fn create_view(
    State(service): State<Arc<ViewService>>,
    AppJson(dto): AppJson<CreateViewDto>,
) -> Result<(StatusCode, Json<ApiResponse<ViewResponseDto>>)> {
    let view = service.create(dto.kind).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(view), None, None)),
    ))
}

/// Render a view session against the current catalog
#[utoipa::path(
    get,
    path = "/api/views/{id}",
    params(
        ("id" = Uuid, Path, description = "View ID")
    ),
    responses(
        (status = 200, description = "Rendered view", body = ApiResponse<ViewResponseDto>),
        (status = 404, description = "View not found or expired")
    ),
    tag = "views"
)]
pub async fn get_view(
    State(service): State<Arc<ViewService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ViewResponseDto>>> {
    let view = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(view), None, None)))
}

/// Apply a user intent to a view session
#[utoipa::path(
    post,
    path = "/api/views/{id}/events",
    params(
        ("id" = Uuid, Path, description = "View ID")
    ),
    request_body = ViewEventDto,
    responses(
        (status = 200, description = "Rendered view after the event", body = ApiResponse<ViewResponseDto>),
        (status = 400, description = "Malformed or invalid event"),
        (status = 404, description = "View not found or expired")
    ),
    tag = "views"
)]
pub async fn post_view_event(
    State(service): State<Arc<ViewService>>,
    Path(id): Path<Uuid>,
    AppJson(event): AppJson<ViewEventDto>,
) -> Result<Json<ApiResponse<ViewResponseDto>>> {
    let view = service.apply_event(id, event).await?;
    Ok(Json(ApiResponse::success(Some(view), None, None)))
}

/// Close a view session
#[utoipa::path(
    delete,
    path = "/api/views/{id}",
    params(
        ("id" = Uuid, Path, description = "View ID")
    ),
    responses(
        (status = 200, description = "View closed", body = ApiResponse<DeleteViewResponseDto>),
        (status = 404, description = "View not found or expired")
    ),
    tag = "views"
)]
pub async fn delete_view(
    State(service): State<Arc<ViewService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeleteViewResponseDto>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        Some(DeleteViewResponseDto { deleted: true }),
        None,
        None,
    )))
}
