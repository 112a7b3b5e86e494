use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::core::error::{map_db_error, AppError, Result};
use crate::features::admin::dtos::SeedSummaryDto;
use crate::features::admin::seed::{ContentRenderer, SeedCatalog, SeedCategory};

/// Populates the catalog tables with the default business analysis content
pub struct SeedService {
    pool: PgPool,
    catalog: SeedCatalog,
    renderer: ContentRenderer,
}

impl SeedService {
    pub fn new(pool: PgPool) -> Result<Self> {
        let catalog = SeedCatalog::load_default()?;
        tracing::debug!(
            "Seed catalog loaded: {} categories, {} subcategories, {} concepts",
            catalog.categories.len(),
            catalog.subcategory_count(),
            catalog.concept_count()
        );

        Ok(Self {
            pool,
            catalog,
            renderer: ContentRenderer::new()?,
        })
    }

    pub async fn catalog_is_empty(&self) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM categories)")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check catalog contents: {:?}", e);
                AppError::Database(e)
            })?;
        Ok(!exists)
    }

    /// Seed in one transaction.
    ///
    /// Without `force` an existing catalog is a conflict; with `force` every
    /// category (and by cascade every subcategory and concept) is replaced.
    pub async fn seed(&self, force: bool) -> Result<SeedSummaryDto> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin seed transaction: {:?}", e);
            AppError::Database(e)
        })?;

        // Serialize concurrent seeding runs
        sqlx::query("LOCK TABLE categories IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to lock categories: {:?}", e);
                AppError::Database(e)
            })?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM categories)")
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check catalog contents: {:?}", e);
                AppError::Database(e)
            })?;

        let mut detached_submissions = 0;
        if exists {
            if !force {
                return Err(AppError::Conflict(
                    "Catalog already has content; use force=true to replace it".to_string(),
                ));
            }

            // Submissions survive the cascade with their subcategory nulled
            detached_submissions = sqlx::query(
                "UPDATE submissions SET subcategory_id = NULL, updated_at = NOW() \
                 WHERE subcategory_id IS NOT NULL",
            )
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, "submission"))?
            .rows_affected();
            if detached_submissions > 0 {
                tracing::warn!(
                    "Forced reseed detaches {} submissions from their subcategories; \
                     they leave the product graph until reassigned",
                    detached_submissions
                );
            }

            let removed = sqlx::query("DELETE FROM categories")
                .execute(&mut *tx)
                .await
                .map_err(|e| map_db_error(e, "category"))?
                .rows_affected();
            info!("Removed {} existing categories before seeding", removed);
        }

        let mut summary = SeedSummaryDto {
            categories: 0,
            subcategories: 0,
            concepts: 0,
            detached_submissions,
        };

        for (position, category) in self.catalog.categories.iter().enumerate() {
            self.insert_category(&mut tx, category, position as i32, &mut summary)
                .await?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit seed transaction: {:?}", e);
            AppError::Database(e)
        })?;

        info!(
            "Catalog seeded: {} categories, {} subcategories, {} concepts",
            summary.categories, summary.subcategories, summary.concepts
        );
        Ok(summary)
    }

    /// Seed only when the catalog has no categories yet
    pub async fn seed_if_empty(&self) -> Result<Option<SeedSummaryDto>> {
        if !self.catalog_is_empty().await? {
            tracing::debug!("Catalog already populated, skipping seed");
            return Ok(None);
        }

        match self.seed(false).await {
            Ok(summary) => Ok(Some(summary)),
            // Another instance seeded between the check and the lock
            Err(AppError::Conflict(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn insert_category(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        category: &SeedCategory,
        display_order: i32,
        summary: &mut SeedSummaryDto,
    ) -> Result<()> {
        let category_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO categories (name, description, icon, display_order)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.icon)
        .bind(display_order)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| map_db_error(e, "category"))?;
        summary.categories += 1;

        for (position, sub) in category.subcategories.iter().enumerate() {
            let subcategory_id: Uuid = sqlx::query_scalar(
                r#"
                INSERT INTO subcategories (category_id, name, description, display_order)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(category_id)
            .bind(&sub.name)
            .bind(&sub.description)
            .bind(position as i32)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| map_db_error(e, "subcategory"))?;
            summary.subcategories += 1;

            for concept in &sub.concepts {
                let content = self
                    .renderer
                    .render_concept(&category.name, &sub.name, concept)?;

                sqlx::query(
                    r#"
                    INSERT INTO concepts
                        (subcategory_id, name, short_description, detailed_description,
                         how_to_perform, best_practices, real_world_examples, job_roles,
                         pros_and_cons, related_concepts, tags)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                    "#,
                )
                .bind(subcategory_id)
                .bind(&concept.name)
                .bind(&concept.short_description)
                .bind(&content.detailed_description)
                .bind(&content.how_to_perform)
                .bind(&content.best_practices)
                .bind(&content.real_world_examples)
                .bind(&content.job_roles)
                .bind(&content.pros_and_cons)
                .bind(&content.related_concepts)
                .bind(&content.tags)
                .execute(&mut **tx)
                .await
                .map_err(|e| map_db_error(e, "concept"))?;
                summary.concepts += 1;
            }
        }

        Ok(())
    }
}
