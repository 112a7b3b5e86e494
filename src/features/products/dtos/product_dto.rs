use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::catalog::engine::{CatalogGraph, CatalogTree};
use crate::features::catalog::models::{Submission, SubmissionStatus};
use crate::shared::validation::normalize_optional;

/// Positioned product graph under the active filter
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductGraphResponseDto {
    pub query: String,
    pub selected_category: Option<String>,
    /// Approved products left after filtering
    pub total_products: usize,
    pub no_results: bool,
    pub graph: CatalogGraph,
}

/// Public product page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductDetailDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub usecase: Option<String>,
    pub app_link: Option<String>,
    pub web_link: Option<String>,
    pub github_link: Option<String>,
    pub image_url: Option<String>,
    pub subcategory_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Submission> for ProductDetailDto {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            title: s.title,
            description: s.description,
            usecase: s.usecase,
            app_link: s.app_link,
            web_link: s.web_link,
            github_link: s.github_link,
            image_url: s.image_url,
            subcategory_id: s.subcategory_id,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubcategoryOptionDto {
    pub id: Uuid,
    pub name: String,
}

/// Category with its subcategories, for the submission form pickers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryOptionsDto {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub subcategories: Vec<SubcategoryOptionDto>,
}

impl CategoryOptionsDto {
    pub fn from_tree(tree: &CatalogTree<Submission>) -> Vec<Self> {
        tree.categories
            .iter()
            .map(|branch| Self {
                id: branch.category.id,
                name: branch.category.name.clone(),
                icon: branch.category.icon.clone(),
                subcategories: branch
                    .subcategories
                    .iter()
                    .map(|sub| SubcategoryOptionDto {
                        id: sub.subcategory.id,
                        name: sub.subcategory.name.clone(),
                    })
                    .collect(),
            })
            .collect()
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let length = title.trim().chars().count();
    if length == 0 || length > 200 {
        let mut err = ValidationError::new("title_length");
        err.message = Some("Title must be between 1 and 200 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Public product submission form
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSubmissionDto {
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
    #[validate(required(message = "subcategory_id is required"))]
    pub subcategory_id: Option<Uuid>,
}

impl CreateSubmissionDto {
    /// Trim every text field and turn blank optionals into `None`
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

/// Acknowledgement returned to the submitter
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmissionCreatedDto {
    pub id: Uuid,
    pub title: String,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionCreatedDto {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            title: s.title,
            status: s.status,
            created_at: s.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CreateSubmissionDto {
        CreateSubmissionDto {
            title: "  Flowly  ".to_string(),
            description: Some("   ".to_string()),
            usecase: Some(" Process maps ".to_string()),
            app_link: None,
            web_link: Some("https://flowly.example.com".to_string()),
            github_link: Some("".to_string()),
            image_url: None,
            subcategory_id: Some(Uuid::new_v4()),
        }
    }

    #[test]
    fn test_normalized_trims_and_blanks() {
        let dto = form().normalized();
        assert_eq!(dto.title, "Flowly");
        assert_eq!(dto.description, None);
        assert_eq!(dto.usecase.as_deref(), Some("Process maps"));
        assert_eq!(dto.github_link, None);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        let dto = CreateSubmissionDto {
            title: "   ".to_string(),
            ..form()
        }
        .normalized();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_long_title_rejected() {
        let dto = CreateSubmissionDto {
            title: "a".repeat(201),
            ..form()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_bad_link_rejected() {
        let dto = CreateSubmissionDto {
            web_link: Some("not a url".to_string()),
            ..form()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("web_link"));
    }

    #[test]
    fn test_missing_subcategory_rejected() {
        let dto = CreateSubmissionDto {
            subcategory_id: None,
            ..form()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("subcategory_id"));
    }
}
