//! Fixtures and an in-memory catalog source for unit and handler tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::catalog::models::{
    Category, Concept, Subcategory, Submission, SubmissionStatus,
};
use crate::features::catalog::CatalogSource;

pub fn category(name: &str, display_order: i32) -> Category {
    Category {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        icon: None,
        display_order,
        created_at: Utc::now(),
    }
}

pub fn subcategory(parent: &Category, name: &str, display_order: i32) -> Subcategory {
    Subcategory {
        id: Uuid::new_v4(),
        category_id: parent.id,
        name: name.to_string(),
        description: None,
        display_order,
        created_at: Utc::now(),
    }
}

pub fn concept(parent: &Subcategory, name: &str, short_description: &str) -> Concept {
    let now = Utc::now();
    Concept {
        id: Uuid::new_v4(),
        subcategory_id: parent.id,
        name: name.to_string(),
        short_description: Some(short_description.to_string()).filter(|s| !s.is_empty()),
        detailed_description: None,
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
        tags: vec![],
        images: vec![],
        created_at: now,
        updated_at: now,
    }
}

pub fn submission(
    parent: Option<&Subcategory>,
    title: &str,
    status: SubmissionStatus,
) -> Submission {
    let now = Utc::now();
    Submission {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: Some(format!("{} description", title)),
        usecase: None,
        app_link: None,
        web_link: None,
        github_link: None,
        image_url: None,
        subcategory_id: parent.map(|p| p.id),
        status,
        created_at: now,
        updated_at: now,
    }
}

/// Catalog source over plain vectors. `failing()` makes every collection
/// fetch return an error; `outage_switch()` toggles that at runtime.
#[derive(Default, Clone)]
pub struct MemoryCatalogSource {
    categories: Vec<Category>,
    subcategories: Vec<Subcategory>,
    concepts: Vec<Concept>,
    submissions: Vec<Submission>,
    outage: Arc<AtomicBool>,
}

impl MemoryCatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_subcategories(mut self, subcategories: Vec<Subcategory>) -> Self {
        self.subcategories = subcategories;
        self
    }

    pub fn with_concepts(mut self, concepts: Vec<Concept>) -> Self {
        self.concepts = concepts;
        self
    }

    pub fn with_submissions(mut self, submissions: Vec<Submission>) -> Self {
        self.submissions = submissions;
        self
    }

    pub fn failing(self) -> Self {
        self.outage.store(true, Ordering::SeqCst);
        self
    }

    /// Shared flag: while set, collection fetches fail
    pub fn outage_switch(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.outage)
    }

    fn check(&self) -> Result<()> {
        if self.outage.load(Ordering::SeqCst) {
            return Err(AppError::Internal("catalog source unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for MemoryCatalogSource {
    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        self.check()?;
        Ok(self.categories.clone())
    }

    async fn fetch_subcategories(&self) -> Result<Vec<Subcategory>> {
        self.check()?;
        Ok(self.subcategories.clone())
    }

    async fn fetch_concepts(&self) -> Result<Vec<Concept>> {
        self.check()?;
        Ok(self.concepts.clone())
    }

    async fn fetch_submissions(
        &self,
        status: Option<SubmissionStatus>,
    ) -> Result<Vec<Submission>> {
        self.check()?;
        Ok(self
            .submissions
            .iter()
            .filter(|s| status.map_or(true, |wanted| s.status == wanted))
            .cloned()
            .collect())
    }

    async fn find_concept(&self, id: Uuid) -> Result<Option<Concept>> {
        Ok(self.concepts.iter().find(|c| c.id == id).cloned())
    }

    async fn find_submission(&self, id: Uuid) -> Result<Option<Submission>> {
        Ok(self.submissions.iter().find(|s| s.id == id).cloned())
    }
}
