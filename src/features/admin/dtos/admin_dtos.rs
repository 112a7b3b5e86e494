use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::catalog::models::SubmissionStatus;
use crate::shared::types::{default_page, default_page_size, PaginationQuery};
use crate::shared::validation::{normalize_optional, validate_image_urls, validate_tags};

fn check_length(value: &str, max: usize, code: &'static str) -> Result<(), ValidationError> {
    let length = value.trim().chars().count();
    if length == 0 || length > max {
        let mut err = ValidationError::new(code);
        err.message = Some(format!("Must be between 1 and {} characters", max).into());
        return Err(err);
    }
    Ok(())
}

fn validate_group_name(name: &str) -> Result<(), ValidationError> {
    check_length(name, 100, "name_length")
}

fn validate_concept_name(name: &str) -> Result<(), ValidationError> {
    check_length(name, 200, "name_length")
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    check_length(title, 200, "title_length")
}

// =============================================================================
// CATEGORY DTOs
// =============================================================================

/// Query params for listing categories
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct CategoryQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// Search in name or description
    pub search: Option<String>,
}

impl CategoryQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.page_size)
    }
}

/// Admin view of a category with its child counts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AdminCategoryDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub display_order: i32,
    pub subcategory_count: i64,
    pub concept_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Create or fully replace a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CategoryInputDto {
    #[validate(custom(function = "validate_group_name"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(max = 16, message = "icon must be at most 16 characters"))]
    pub icon: Option<String>,
    #[serde(default)]
    pub display_order: i32,
}

impl CategoryInputDto {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: normalize_optional(self.description),
            icon: normalize_optional(self.icon),
            display_order: self.display_order,
        }
    }
}

// =============================================================================
// SUBCATEGORY DTOs
// =============================================================================

/// Query params for listing subcategories
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SubcategoryQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// Search in name, description or parent category name
    pub search: Option<String>,
    /// Only subcategories of this category
    pub category_id: Option<Uuid>,
}

impl SubcategoryQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.page_size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AdminSubcategoryDto {
    pub id: Uuid,
    pub category_id: Uuid,
    pub category_name: String,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub concept_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Create or fully replace a subcategory
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubcategoryInputDto {
    pub category_id: Uuid,
    #[validate(custom(function = "validate_group_name"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: i32,
}

impl SubcategoryInputDto {
    pub fn normalized(self) -> Self {
        Self {
            category_id: self.category_id,
            name: self.name.trim().to_string(),
            description: normalize_optional(self.description),
            display_order: self.display_order,
        }
    }
}

// =============================================================================
// CONCEPT DTOs
// =============================================================================

/// Query params for listing concepts
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ConceptQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// Search in name, short description or tags
    pub search: Option<String>,
    /// Only concepts under this category
    pub category_id: Option<Uuid>,
    /// Only concepts of this subcategory (takes precedence over category_id)
    pub subcategory_id: Option<Uuid>,
}

impl ConceptQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.page_size)
    }

    /// Category filter, ignored when a subcategory is selected
    pub fn effective_category_id(&self) -> Option<Uuid> {
        match self.subcategory_id {
            Some(_) => None,
            None => self.category_id,
        }
    }
}

/// Admin list row for a concept
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AdminConceptDto {
    pub id: Uuid,
    pub subcategory_id: Uuid,
    pub subcategory_name: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub name: String,
    pub short_description: Option<String>,
    pub tags: Vec<String>,
    pub image_count: i32,
    pub updated_at: DateTime<Utc>,
}

/// Full concept record as edited in the admin form
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AdminConceptDetailDto {
    pub id: Uuid,
    pub subcategory_id: Uuid,
    pub subcategory_name: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub name: String,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create or fully replace a concept
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ConceptInputDto {
    pub subcategory_id: Uuid,
    #[validate(custom(function = "validate_concept_name"))]
    pub name: String,
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
    #[serde(default)]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_image_urls"))]
    pub images: Vec<String>,
}

impl ConceptInputDto {
    /// Trim text, blank optionals to `None`, drop empty and duplicate tags
    pub fn normalized(self) -> Self {
        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in self.tags {
            let tag = tag.trim().to_string();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        Self {
            subcategory_id: self.subcategory_id,
            name: self.name.trim().to_string(),
            short_description: normalize_optional(self.short_description),
            detailed_description: normalize_optional(self.detailed_description),
            how_to_perform: normalize_optional(self.how_to_perform),
            when_to_use: normalize_optional(self.when_to_use),
            why_to_use: normalize_optional(self.why_to_use),
            best_practices: normalize_optional(self.best_practices),
            real_world_examples: normalize_optional(self.real_world_examples),
            job_roles: normalize_optional(self.job_roles),
            pros_and_cons: normalize_optional(self.pros_and_cons),
            learning_resources: normalize_optional(self.learning_resources),
            useful_links: normalize_optional(self.useful_links),
            related_concepts: normalize_optional(self.related_concepts),
            tags,
            images: self
                .images
                .into_iter()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .collect(),
        }
    }
}

// =============================================================================
// SUBMISSION DTOs
// =============================================================================

/// Query params for listing submissions
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SubmissionQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// Filter by moderation status
    pub status: Option<SubmissionStatus>,
    /// Filter by subcategory
    pub subcategory_id: Option<Uuid>,
    /// Search in title or description
    pub search: Option<String>,
}

impl SubmissionQueryParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.page_size)
    }
}

/// Admin view of a submission with its placement names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AdminSubmissionDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub usecase: Option<String>,
    pub app_link: Option<String>,
    pub web_link: Option<String>,
    pub github_link: Option<String>,
    pub image_url: Option<String>,
    pub subcategory_id: Option<Uuid>,
    pub subcategory_name: Option<String>,
    pub category_name: Option<String>,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fully replace the editable fields of a submission
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmissionUpdateDto {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    pub description: Option<String>,
    pub usecase: Option<String>,
    #[validate(url(message = "app_link must be a valid URL"))]
    pub app_link: Option<String>,
    #[validate(url(message = "web_link must be a valid URL"))]
    pub web_link: Option<String>,
    #[validate(url(message = "github_link must be a valid URL"))]
    pub github_link: Option<String>,
    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,
    /// Null detaches the submission from the product tree
    pub subcategory_id: Option<Uuid>,
}

impl SubmissionUpdateDto {
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: normalize_optional(self.description),
            usecase: normalize_optional(self.usecase),
            app_link: normalize_optional(self.app_link),
            web_link: normalize_optional(self.web_link),
            github_link: normalize_optional(self.github_link),
            image_url: normalize_optional(self.image_url),
            subcategory_id: self.subcategory_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetSubmissionStatusDto {
    pub status: SubmissionStatus,
}

/// Moderation queue counters
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SubmissionStatsDto {
    pub total: i64,
    pub requested: i64,
    pub approved: i64,
}

// =============================================================================
// SEED / SHARED
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SeedQueryParams {
    /// Replace an existing catalog instead of refusing
    #[serde(default)]
    pub force: bool,
}

/// Rows written by a seeding run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SeedSummaryDto {
    pub categories: usize,
    pub subcategories: usize,
    pub concepts: usize,
    /// Submissions that lost their subcategory when a forced run replaced
    /// the catalog
    pub detached_submissions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedDto {
    pub id: Uuid,
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept_input() -> ConceptInputDto {
        ConceptInputDto {
            subcategory_id: Uuid::new_v4(),
            name: "  SWOT Analysis ".to_string(),
            short_description: Some(" Strengths and weaknesses ".to_string()),
            detailed_description: Some("".to_string()),
            how_to_perform: None,
            when_to_use: None,
            why_to_use: None,
            best_practices: None,
            real_world_examples: None,
            job_roles: None,
            pros_and_cons: None,
            learning_resources: None,
            useful_links: None,
            related_concepts: None,
            tags: vec![
                " Strategy ".to_string(),
                "".to_string(),
                "Strategy".to_string(),
                "Framework".to_string(),
            ],
            images: vec![" https://cdn.example.com/swot.png ".to_string(), " ".to_string()],
        }
    }

    #[test]
    fn test_concept_normalized() {
        let dto = concept_input().normalized();

        assert_eq!(dto.name, "SWOT Analysis");
        assert_eq!(dto.short_description.as_deref(), Some("Strengths and weaknesses"));
        assert_eq!(dto.detailed_description, None);
        assert_eq!(dto.tags, vec!["Strategy", "Framework"]);
        assert_eq!(dto.images, vec!["https://cdn.example.com/swot.png"]);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_concept_rejects_bad_tags_and_images() {
        let dto = ConceptInputDto {
            tags: vec!["a,b".to_string()],
            ..concept_input()
        }
        .normalized();
        assert!(dto.validate().is_err());

        let dto = ConceptInputDto {
            images: vec!["not a url".to_string()],
            ..concept_input()
        }
        .normalized();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_category_name_bounds() {
        let blank = CategoryInputDto {
            name: "   ".to_string(),
            description: None,
            icon: None,
            display_order: 0,
        }
        .normalized();
        assert!(blank.validate().is_err());

        let long = CategoryInputDto {
            name: "x".repeat(101),
            ..blank.clone()
        };
        assert!(long.validate().is_err());

        let ok = CategoryInputDto {
            name: " Tools ".to_string(),
            icon: Some(" 🛠️ ".to_string()),
            ..blank
        }
        .normalized();
        assert!(ok.validate().is_ok());
        assert_eq!(ok.name, "Tools");
        assert_eq!(ok.icon.as_deref(), Some("🛠️"));
    }

    #[test]
    fn test_subcategory_wins_over_category() {
        let category_id = Uuid::new_v4();
        let mut params = ConceptQueryParams {
            page: 1,
            page_size: 10,
            search: None,
            category_id: Some(category_id),
            subcategory_id: None,
        };
        assert_eq!(params.effective_category_id(), Some(category_id));

        params.subcategory_id = Some(Uuid::new_v4());
        assert_eq!(params.effective_category_id(), None);
    }

    #[test]
    fn test_submission_update_validates_links() {
        let dto = SubmissionUpdateDto {
            title: "Flowly".to_string(),
            description: None,
            usecase: None,
            app_link: None,
            web_link: Some("flowly dot com".to_string()),
            github_link: None,
            image_url: None,
            subcategory_id: None,
        };
        assert!(dto.clone().normalized().validate().is_err());

        let fixed = SubmissionUpdateDto {
            web_link: Some(" ".to_string()),
            ..dto
        }
        .normalized();
        assert!(fixed.validate().is_ok());
        assert_eq!(fixed.web_link, None);
    }

    #[test]
    fn test_query_defaults() {
        let params: SubmissionQueryParams =
            serde_json::from_value(serde_json::json!({"status": "approved"})).unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.status, Some(SubmissionStatus::Approved));
        assert_eq!(params.pagination().offset(), 0);

        let seed: SeedQueryParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(!seed.force);
    }
}
