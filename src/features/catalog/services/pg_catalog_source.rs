use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::catalog::models::{
    Category, Concept, Subcategory, Submission, SubmissionStatus,
};
use crate::features::catalog::services::CatalogSource;

pub const CONCEPT_COLUMNS: &str = r#"
    id, subcategory_id, name, short_description, detailed_description,
    how_to_perform, when_to_use, why_to_use, best_practices, real_world_examples,
    job_roles, pros_and_cons, learning_resources, useful_links, related_concepts,
    tags, images, created_at, updated_at
"#;

pub const SUBMISSION_COLUMNS: &str = r#"
    id, title, description, usecase, app_link, web_link, github_link, image_url,
    subcategory_id, status, created_at, updated_at
"#;

/// PostgreSQL-backed catalog source
pub struct PgCatalogSource {
    pool: PgPool,
}

impl PgCatalogSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogSource for PgCatalogSource {
    async fn fetch_categories(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, icon, display_order, created_at
            FROM categories
            ORDER BY display_order, name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch categories: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn fetch_subcategories(&self) -> Result<Vec<Subcategory>> {
        sqlx::query_as::<_, Subcategory>(
            r#"
            SELECT id, category_id, name, description, display_order, created_at
            FROM subcategories
            ORDER BY display_order, name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch subcategories: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn fetch_concepts(&self) -> Result<Vec<Concept>> {
        let sql = format!("SELECT {} FROM concepts ORDER BY name", CONCEPT_COLUMNS);
        sqlx::query_as::<_, Concept>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch concepts: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn fetch_submissions(
        &self,
        status: Option<SubmissionStatus>,
    ) -> Result<Vec<Submission>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM submissions
            WHERE ($1::submission_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
            SUBMISSION_COLUMNS
        );
        sqlx::query_as::<_, Submission>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch submissions: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_concept(&self, id: Uuid) -> Result<Option<Concept>> {
        let sql = format!("SELECT {} FROM concepts WHERE id = $1", CONCEPT_COLUMNS);
        sqlx::query_as::<_, Concept>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get concept {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn find_submission(&self, id: Uuid) -> Result<Option<Submission>> {
        let sql = format!(
            "SELECT {} FROM submissions WHERE id = $1",
            SUBMISSION_COLUMNS
        );
        sqlx::query_as::<_, Submission>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get submission {}: {:?}", id, e);
                AppError::Database(e)
            })
    }
}
