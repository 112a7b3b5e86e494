use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::catalog::engine::{CatalogTree, GraphProjector};
use crate::features::catalog::models::{
    Category, Concept, Subcategory, Submission, SubmissionStatus,
};
use crate::features::catalog::services::CatalogSource;

/// Concept together with the names of its ancestors
#[derive(Debug, Clone)]
pub struct ConceptContext {
    pub concept: Concept,
    pub subcategory: Option<Subcategory>,
    pub category: Option<Category>,
}

/// A loaded tree. `complete` is false when at least one collection failed to
/// fetch and was replaced by an empty one.
pub struct TreeLoad<L> {
    pub tree: CatalogTree<L>,
    pub complete: bool,
}

/// Loads catalog trees from a `CatalogSource`.
///
/// A failing fetch never fails the tree: the collection is treated as empty
/// so the views degrade to "no results".
pub struct CatalogService {
    source: Arc<dyn CatalogSource>,
    projector: GraphProjector,
}

impl CatalogService {
    pub fn new(source: Arc<dyn CatalogSource>, projector: GraphProjector) -> Self {
        Self { source, projector }
    }

    pub fn projector(&self) -> &GraphProjector {
        &self.projector
    }

    fn degrade<T>(result: Result<Vec<T>>, what: &str, complete: &mut bool) -> Vec<T> {
        result.unwrap_or_else(|e| {
            tracing::warn!("Treating {} as empty after fetch failure: {}", what, e);
            *complete = false;
            Vec::new()
        })
    }

    /// Categories -> subcategories -> concepts
    pub async fn load_skill_tree(&self) -> TreeLoad<Concept> {
        let (categories, subcategories, concepts) = tokio::join!(
            self.source.fetch_categories(),
            self.source.fetch_subcategories(),
            self.source.fetch_concepts(),
        );

        let mut complete = true;
        let tree = CatalogTree::build(
            &Self::degrade(categories, "categories", &mut complete),
            &Self::degrade(subcategories, "subcategories", &mut complete),
            &Self::degrade(concepts, "concepts", &mut complete),
        );
        TreeLoad { tree, complete }
    }

    /// Categories -> subcategories -> approved submissions
    pub async fn load_product_tree(&self) -> TreeLoad<Submission> {
        let (categories, subcategories, submissions) = tokio::join!(
            self.source.fetch_categories(),
            self.source.fetch_subcategories(),
            self.source
                .fetch_submissions(Some(SubmissionStatus::Approved)),
        );

        let mut complete = true;
        let tree = CatalogTree::build(
            &Self::degrade(categories, "categories", &mut complete),
            &Self::degrade(subcategories, "subcategories", &mut complete),
            &Self::degrade(submissions, "submissions", &mut complete),
        );
        TreeLoad { tree, complete }
    }

    /// Category/subcategory skeleton for pickers (no leaves)
    pub async fn load_form_options(&self) -> CatalogTree<Submission> {
        let (categories, subcategories) = tokio::join!(
            self.source.fetch_categories(),
            self.source.fetch_subcategories(),
        );

        let mut complete = true;
        CatalogTree::build(
            &Self::degrade(categories, "categories", &mut complete),
            &Self::degrade(subcategories, "subcategories", &mut complete),
            &[],
        )
    }

    /// Categories in display order (category selector)
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let mut categories = self.source.fetch_categories().await?;
        categories.sort_by_key(|c| c.display_order);
        Ok(categories)
    }

    pub async fn get_concept(&self, id: Uuid) -> Result<ConceptContext> {
        let concept = self
            .source
            .find_concept(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Concept with id {} not found", id)))?;

        let (categories, subcategories) = tokio::join!(
            self.source.fetch_categories(),
            self.source.fetch_subcategories(),
        );
        let mut complete = true;
        let subcategory = Self::degrade(subcategories, "subcategories", &mut complete)
            .into_iter()
            .find(|s| s.id == concept.subcategory_id);
        let category = subcategory.as_ref().and_then(|sub| {
            Self::degrade(categories, "categories", &mut complete)
                .into_iter()
                .find(|c| c.id == sub.category_id)
        });

        Ok(ConceptContext {
            concept,
            subcategory,
            category,
        })
    }

    /// Approved submission by id. Unmoderated submissions are not public.
    pub async fn get_approved_submission(&self, id: Uuid) -> Result<Submission> {
        self.source
            .find_submission(id)
            .await?
            .filter(|s| s.status == SubmissionStatus::Approved)
            .ok_or_else(|| AppError::NotFound(format!("Product with id {} not found", id)))
    }
}
