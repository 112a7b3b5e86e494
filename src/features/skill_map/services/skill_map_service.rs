use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::catalog::engine::{CatalogFilter, CatalogNode, CatalogTree, ViewExpansion};
use crate::features::catalog::models::Concept;
use crate::features::catalog::CatalogService;
use crate::features::skill_map::dtos::{
    CatalogQueryParams, CategoryOptionDto, ConceptDetailDto, ConceptSummaryDto, SkillCategoryDto,
    SkillMapResponseDto, SkillSubcategoryDto,
};

/// Read side of the skill map
pub struct SkillMapService {
    catalog: Arc<CatalogService>,
}

impl SkillMapService {
    pub fn new(catalog: Arc<CatalogService>) -> Self {
        Self { catalog }
    }

    /// Filtered skill map with everything expanded
    pub async fn get_skill_map(&self, params: CatalogQueryParams) -> Result<SkillMapResponseDto> {
        params
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let tree = self.catalog.load_skill_tree().await.tree;
        let filter = CatalogFilter::new(params.q.unwrap_or_default(), params.category);
        let expansion = ViewExpansion::all_open(&tree);

        Ok(render_skill_map(&tree, &filter, &expansion))
    }

    /// Every node of the unfiltered tree, flagged with whether it passes the filter
    pub async fn get_annotated_nodes(&self, params: CatalogQueryParams) -> Result<Vec<CatalogNode>> {
        params
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let tree = self.catalog.load_skill_tree().await.tree;
        let filter = CatalogFilter::new(params.q.unwrap_or_default(), params.category);
        Ok(filter.annotate(&tree))
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryOptionDto>> {
        let categories = self.catalog.list_categories().await?;
        Ok(categories.into_iter().map(CategoryOptionDto::from).collect())
    }

    pub async fn get_concept(&self, id: Uuid) -> Result<ConceptDetailDto> {
        let context = self.catalog.get_concept(id).await?;
        Ok(ConceptDetailDto::from(context))
    }
}

/// Render `tree` under `filter`, omitting the children of collapsed nodes.
///
/// Counts always describe the filtered tree, whether or not a node is open.
pub fn render_skill_map(
    tree: &CatalogTree<Concept>,
    filter: &CatalogFilter,
    expansion: &ViewExpansion,
) -> SkillMapResponseDto {
    let visible = filter.apply(tree);

    let categories: Vec<SkillCategoryDto> = visible
        .categories
        .iter()
        .map(|branch| {
            let expanded = expansion.is_category_open(branch.category.id);

            let subcategories = if expanded {
                branch
                    .subcategories
                    .iter()
                    .map(|sub| {
                        let sub_expanded = expansion.is_subcategory_open(sub.subcategory.id);
                        SkillSubcategoryDto {
                            id: sub.subcategory.id,
                            name: sub.subcategory.name.clone(),
                            description: sub.subcategory.description.clone(),
                            concept_count: sub.leaves.len(),
                            expanded: sub_expanded,
                            concepts: if sub_expanded {
                                sub.leaves.iter().map(ConceptSummaryDto::from).collect()
                            } else {
                                Vec::new()
                            },
                        }
                    })
                    .collect()
            } else {
                Vec::new()
            };

            SkillCategoryDto {
                id: branch.category.id,
                name: branch.category.name.clone(),
                description: branch.category.description.clone(),
                icon: branch.category.icon.clone(),
                concept_count: branch.leaf_count(),
                subcategory_count: branch.subcategories.len(),
                expanded,
                subcategories,
            }
        })
        .collect();

    SkillMapResponseDto {
        query: filter.query().to_string(),
        selected_category: filter.category().map(str::to_string),
        shown_categories: categories.len(),
        total_concepts: visible.leaf_count(),
        no_results: visible.is_empty(),
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::catalog::engine::{GraphProjector, NodeLevel};
    use crate::features::catalog::models::{Category, Subcategory};
    use crate::shared::test_helpers::{category, concept, subcategory, MemoryCatalogSource};

    struct Fixture {
        tools: Category,
        diagramming: Subcategory,
        tree: CatalogTree<Concept>,
    }

    fn fixture() -> Fixture {
        let tools = category("Tools", 0);
        let frameworks = category("Frameworks", 1);
        let diagramming = subcategory(&tools, "Diagramming", 0);
        let strategy = subcategory(&frameworks, "Strategy", 0);
        let concepts = vec![
            concept(&diagramming, "Figma", "collaborative design tool"),
            concept(&diagramming, "Lucidchart", "diagram tool"),
            concept(&strategy, "SWOT Analysis", "strengths and weaknesses"),
        ];
        let tree = CatalogTree::build(
            &[tools.clone(), frameworks],
            &[diagramming.clone(), strategy],
            &concepts,
        );
        Fixture {
            tools,
            diagramming,
            tree,
        }
    }

    #[test]
    fn test_render_all_open() {
        let f = fixture();
        let dto = render_skill_map(
            &f.tree,
            &CatalogFilter::default(),
            &ViewExpansion::all_open(&f.tree),
        );

        assert_eq!(dto.shown_categories, 2);
        assert_eq!(dto.total_concepts, 3);
        assert!(!dto.no_results);
        assert_eq!(dto.categories[0].name, "Tools");
        assert_eq!(dto.categories[0].subcategories[0].concepts.len(), 2);
    }

    #[test]
    fn test_render_filtered_counts() {
        let f = fixture();
        let dto = render_skill_map(
            &f.tree,
            &CatalogFilter::new("diagram", None),
            &ViewExpansion::all_open(&f.tree),
        );

        assert_eq!(dto.query, "diagram");
        assert_eq!(dto.shown_categories, 1);
        // subcategory name matches, so both of its concepts stay
        assert_eq!(dto.total_concepts, 2);
    }

    #[test]
    fn test_render_collapsed_nodes_keep_counts() {
        let f = fixture();
        let mut expansion = ViewExpansion::all_open(&f.tree);
        expansion.toggle(NodeLevel::Subcategory, f.diagramming.id);

        let dto = render_skill_map(&f.tree, &CatalogFilter::default(), &expansion);
        let sub = &dto.categories[0].subcategories[0];
        assert!(!sub.expanded);
        assert_eq!(sub.concept_count, 2);
        assert!(sub.concepts.is_empty());

        expansion.toggle(NodeLevel::Category, f.tools.id);
        let dto = render_skill_map(&f.tree, &CatalogFilter::default(), &expansion);
        assert!(!dto.categories[0].expanded);
        assert_eq!(dto.categories[0].subcategory_count, 1);
        assert!(dto.categories[0].subcategories.is_empty());
    }

    #[test]
    fn test_render_no_results() {
        let f = fixture();
        let dto = render_skill_map(
            &f.tree,
            &CatalogFilter::new("zzz-nothing", None),
            &ViewExpansion::all_open(&f.tree),
        );

        assert!(dto.no_results);
        assert_eq!(dto.shown_categories, 0);
        assert!(dto.categories.is_empty());
    }

    #[tokio::test]
    async fn test_get_skill_map_rejects_long_query() {
        let catalog = CatalogService::new(
            Arc::new(MemoryCatalogSource::new()),
            GraphProjector::default(),
        );
        let service = SkillMapService::new(Arc::new(catalog));
        let params = CatalogQueryParams {
            q: Some("x".repeat(500)),
            category: None,
        };

        tokio_test::assert_err!(service.get_skill_map(params).await);
    }
}
