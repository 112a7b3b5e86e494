use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::catalog::engine::CatalogLeaf;

/// Moderation status of a user submission, matching the database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "submission_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Requested,
    Approved,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Requested => write!(f, "requested"),
            SubmissionStatus::Approved => write!(f, "approved"),
        }
    }
}

/// Database model for a user-submitted product or project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Submission {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub usecase: Option<String>,
    pub app_link: Option<String>,
    pub web_link: Option<String>,
    pub github_link: Option<String>,
    pub image_url: Option<String>,
    /// Nullable in storage: deleting a subcategory detaches its submissions
    pub subcategory_id: Option<Uuid>,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogLeaf for Submission {
    fn leaf_id(&self) -> Uuid {
        self.id
    }

    fn subcategory_id(&self) -> Option<Uuid> {
        self.subcategory_id
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn summary(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
