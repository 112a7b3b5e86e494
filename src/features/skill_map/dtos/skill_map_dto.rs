use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::catalog::models::{Category, Concept};
use crate::features::catalog::services::ConceptContext;

/// Search and category selection shared by the tree endpoints
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogQueryParams {
    /// Case-insensitive text matched against names and descriptions
    #[validate(length(max = 200, message = "q must be at most 200 characters"))]
    pub q: Option<String>,
    /// Exact category name to restrict the view to
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConceptSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub short_description: Option<String>,
    pub tags: Vec<String>,
}

impl From<&Concept> for ConceptSummaryDto {
    fn from(concept: &Concept) -> Self {
        Self {
            id: concept.id,
            name: concept.name.clone(),
            short_description: concept.short_description.clone(),
            tags: concept.tags.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SkillSubcategoryDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub concept_count: usize,
    pub expanded: bool,
    /// Empty when the subcategory is collapsed
    pub concepts: Vec<ConceptSummaryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SkillCategoryDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub concept_count: usize,
    pub subcategory_count: usize,
    pub expanded: bool,
    /// Empty when the category is collapsed
    pub subcategories: Vec<SkillSubcategoryDto>,
}

/// Rendered skill map under the active filter
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SkillMapResponseDto {
    pub query: String,
    pub selected_category: Option<String>,
    /// Number of categories left after filtering
    pub shown_categories: usize,
    pub total_concepts: usize,
    pub no_results: bool,
    pub categories: Vec<SkillCategoryDto>,
}

/// Entry of the category selector
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryOptionDto {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
}

impl From<Category> for CategoryOptionDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            icon: category.icon,
        }
    }
}

/// Full concept page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConceptDetailDto {
    pub id: Uuid,
    pub name: String,
    pub subcategory_id: Uuid,
    pub subcategory_name: Option<String>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub short_description: Option<String>,
    pub detailed_description: Option<String>,
    pub how_to_perform: Option<String>,
    pub when_to_use: Option<String>,
    pub why_to_use: Option<String>,
    pub best_practices: Option<String>,
    pub real_world_examples: Option<String>,
    pub job_roles: Option<String>,
    pub pros_and_cons: Option<String>,
    pub learning_resources: Option<String>,
    pub useful_links: Option<String>,
    pub related_concepts: Option<String>,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<ConceptContext> for ConceptDetailDto {
    fn from(context: ConceptContext) -> Self {
        let ConceptContext {
            concept,
            subcategory,
            category,
        } = context;

        Self {
            id: concept.id,
            name: concept.name,
            subcategory_id: concept.subcategory_id,
            subcategory_name: subcategory.map(|s| s.name),
            category_id: category.as_ref().map(|c| c.id),
            category_name: category.map(|c| c.name),
            short_description: concept.short_description,
            detailed_description: concept.detailed_description,
            how_to_perform: concept.how_to_perform,
            when_to_use: concept.when_to_use,
            why_to_use: concept.why_to_use,
            best_practices: concept.best_practices,
            real_world_examples: concept.real_world_examples,
            job_roles: concept.job_roles,
            pros_and_cons: concept.pros_and_cons,
            learning_resources: concept.learning_resources,
            useful_links: concept.useful_links,
            related_concepts: concept.related_concepts,
            tags: concept.tags,
            images: concept.images,
            updated_at: concept.updated_at,
        }
    }
}
