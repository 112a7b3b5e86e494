use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::catalog::engine::{
    CatalogFilter, CatalogTree, GraphProjector, ViewExpansion,
};
use crate::features::catalog::models::Submission;
use crate::features::catalog::CatalogService;
use crate::features::products::dtos::{
    CategoryOptionsDto, ProductDetailDto, ProductGraphResponseDto,
};
use crate::features::skill_map::dtos::CatalogQueryParams;

/// Read side of the product directory
pub struct ProductService {
    catalog: Arc<CatalogService>,
}

impl ProductService {
    pub fn new(catalog: Arc<CatalogService>) -> Self {
        Self { catalog }
    }

    /// Graph of approved products with every node open
    pub async fn get_graph(&self, params: CatalogQueryParams) -> Result<ProductGraphResponseDto> {
        params
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let tree = self.catalog.load_product_tree().await.tree;
        let filter = CatalogFilter::new(params.q.unwrap_or_default(), params.category);
        let expansion = ViewExpansion::all_open(&tree);

        Ok(render_product_graph(
            self.catalog.projector(),
            &tree,
            &filter,
            &expansion,
        ))
    }

    pub async fn get_product(&self, id: Uuid) -> Result<ProductDetailDto> {
        let submission = self.catalog.get_approved_submission(id).await?;
        Ok(ProductDetailDto::from(submission))
    }

    pub async fn get_form_options(&self) -> Result<Vec<CategoryOptionsDto>> {
        let tree = self.catalog.load_form_options().await;
        Ok(CategoryOptionsDto::from_tree(&tree))
    }
}

/// Project `tree` under `filter` into positioned nodes and edges
pub fn render_product_graph(
    projector: &GraphProjector,
    tree: &CatalogTree<Submission>,
    filter: &CatalogFilter,
    expansion: &ViewExpansion,
) -> ProductGraphResponseDto {
    let visible = filter.apply(tree);

    ProductGraphResponseDto {
        query: filter.query().to_string(),
        selected_category: filter.category().map(str::to_string),
        total_products: visible.leaf_count(),
        no_results: visible.leaf_count() == 0,
        graph: projector.project(&visible, expansion),
    }
}
