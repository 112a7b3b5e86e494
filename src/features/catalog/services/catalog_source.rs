use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::catalog::models::{
    Category, Concept, Subcategory, Submission, SubmissionStatus,
};

/// Read side of the catalog storage.
///
/// Collections come back ordered (categories and subcategories by display
/// order, concepts by name, submissions newest first), but callers must not
/// rely on it: the tree builder sorts again.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_categories(&self) -> Result<Vec<Category>>;
    async fn fetch_subcategories(&self) -> Result<Vec<Subcategory>>;
    async fn fetch_concepts(&self) -> Result<Vec<Concept>>;

    /// Submissions, optionally restricted to one moderation status
    async fn fetch_submissions(&self, status: Option<SubmissionStatus>)
        -> Result<Vec<Submission>>;

    async fn find_concept(&self, id: Uuid) -> Result<Option<Concept>>;
    async fn find_submission(&self, id: Uuid) -> Result<Option<Submission>>;
}
