use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::catalog::{engine, models as catalog_models};
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::products::{dtos as products_dtos, handlers as products_handlers};
use crate::features::skill_map::{dtos as skill_map_dtos, handlers as skill_map_handlers};
use crate::features::views::{
    dtos as views_dtos, handlers as views_handlers, models as views_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Skill map
        skill_map_handlers::get_skill_map,
        skill_map_handlers::get_skill_map_nodes,
        skill_map_handlers::list_skill_categories,
        skill_map_handlers::get_concept,
        // Products
        products_handlers::get_product_graph,
        products_handlers::get_product,
        products_handlers::get_submission_options,
        products_handlers::create_submission,
        // Views
        views_handlers::create_view,
        views_handlers::get_view,
        views_handlers::post_view_event,
        views_handlers::delete_view,
        // Files
        files_handlers::upload_file,
        files_handlers::get_file_content,
        files_handlers::delete_file_by_url,
        // Admin
        admin_handlers::list_categories,
        admin_handlers::create_category,
        admin_handlers::update_category,
        admin_handlers::delete_category,
        admin_handlers::list_subcategories,
        admin_handlers::create_subcategory,
        admin_handlers::update_subcategory,
        admin_handlers::delete_subcategory,
        admin_handlers::list_concepts,
        admin_handlers::get_concept,
        admin_handlers::create_concept,
        admin_handlers::update_concept,
        admin_handlers::delete_concept,
        admin_handlers::list_submissions,
        admin_handlers::get_submission_stats,
        admin_handlers::get_submission,
        admin_handlers::update_submission,
        admin_handlers::set_submission_status,
        admin_handlers::delete_submission,
        admin_handlers::seed_catalog,
    ),
    components(
        schemas(
            Meta,
            catalog_models::SubmissionStatus,
            engine::NodeLevel,
            engine::CatalogNode,
            engine::GraphNodeLevel,
            engine::GraphNode,
            engine::GraphEdge,
            engine::CatalogGraph,
            // Skill map
            skill_map_dtos::ConceptSummaryDto,
            skill_map_dtos::SkillSubcategoryDto,
            skill_map_dtos::SkillCategoryDto,
            skill_map_dtos::SkillMapResponseDto,
            skill_map_dtos::CategoryOptionDto,
            skill_map_dtos::ConceptDetailDto,
            ApiResponse<skill_map_dtos::SkillMapResponseDto>,
            ApiResponse<Vec<engine::CatalogNode>>,
            ApiResponse<Vec<skill_map_dtos::CategoryOptionDto>>,
            ApiResponse<skill_map_dtos::ConceptDetailDto>,
            // Products
            products_dtos::ProductGraphResponseDto,
            products_dtos::ProductDetailDto,
            products_dtos::SubcategoryOptionDto,
            products_dtos::CategoryOptionsDto,
            products_dtos::CreateSubmissionDto,
            products_dtos::SubmissionCreatedDto,
            ApiResponse<products_dtos::ProductGraphResponseDto>,
            ApiResponse<products_dtos::ProductDetailDto>,
            ApiResponse<Vec<products_dtos::CategoryOptionsDto>>,
            ApiResponse<products_dtos::SubmissionCreatedDto>,
            // Views
            views_models::ViewKind,
            views_dtos::CreateViewDto,
            views_dtos::QueryChangeDto,
            views_dtos::ViewEventDto,
            views_dtos::ViewContentDto,
            views_dtos::ViewResponseDto,
            views_dtos::DeleteViewResponseDto,
            ApiResponse<views_dtos::ViewResponseDto>,
            ApiResponse<views_dtos::DeleteViewResponseDto>,
            // Files
            files_dtos::ImagePurpose,
            files_dtos::UploadFileDto,
            files_dtos::FileResponseDto,
            files_dtos::DeleteFileByUrlDto,
            files_dtos::DeleteFileResponseDto,
            ApiResponse<files_dtos::FileResponseDto>,
            ApiResponse<files_dtos::DeleteFileResponseDto>,
            // Admin
            admin_dtos::AdminCategoryDto,
            admin_dtos::CategoryInputDto,
            admin_dtos::AdminSubcategoryDto,
            admin_dtos::SubcategoryInputDto,
            admin_dtos::AdminConceptDto,
            admin_dtos::AdminConceptDetailDto,
            admin_dtos::ConceptInputDto,
            admin_dtos::AdminSubmissionDto,
            admin_dtos::SubmissionUpdateDto,
            admin_dtos::SetSubmissionStatusDto,
            admin_dtos::SubmissionStatsDto,
            admin_dtos::SeedSummaryDto,
            admin_dtos::DeletedDto,
            ApiResponse<Vec<admin_dtos::AdminCategoryDto>>,
            ApiResponse<admin_dtos::AdminCategoryDto>,
            ApiResponse<Vec<admin_dtos::AdminSubcategoryDto>>,
            ApiResponse<admin_dtos::AdminSubcategoryDto>,
            ApiResponse<Vec<admin_dtos::AdminConceptDto>>,
            ApiResponse<admin_dtos::AdminConceptDetailDto>,
            ApiResponse<Vec<admin_dtos::AdminSubmissionDto>>,
            ApiResponse<admin_dtos::AdminSubmissionDto>,
            ApiResponse<admin_dtos::SubmissionStatsDto>,
            ApiResponse<admin_dtos::SeedSummaryDto>,
            ApiResponse<admin_dtos::DeletedDto>,
        )
    ),
    tags(
        (name = "skill-map", description = "Business analysis skill catalog (public)"),
        (name = "products", description = "Product directory and submissions (public)"),
        (name = "views", description = "Interactive tree views with server-held expansion state"),
        (name = "files", description = "Image upload and delivery"),
        (name = "admin", description = "Catalog management (basic auth)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Skill Map API",
        version = "0.1.0",
        description = "API documentation for the business analysis skill map",
    )
)]
pub struct ApiDoc;

/// Adds the admin basic auth scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
