use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::core::error::{map_db_error, AppError, Result};
use crate::features::admin::dtos::*;
use crate::features::catalog::models::SubmissionStatus;

const CATEGORY_SELECT: &str = r#"
    SELECT c.id, c.name, c.description, c.icon, c.display_order, c.created_at,
        (SELECT COUNT(*) FROM subcategories s WHERE s.category_id = c.id) AS subcategory_count,
        (SELECT COUNT(*) FROM concepts k
            JOIN subcategories s ON s.id = k.subcategory_id
            WHERE s.category_id = c.id) AS concept_count
    FROM categories c
"#;

const CATEGORY_FILTER: &str = r#"
    ($1::text IS NULL OR c.name ILIKE $1 OR c.description ILIKE $1)
"#;

const SUBCATEGORY_SELECT: &str = r#"
    SELECT s.id, s.category_id, c.name AS category_name, s.name, s.description,
        s.display_order, s.created_at,
        (SELECT COUNT(*) FROM concepts k WHERE k.subcategory_id = s.id) AS concept_count
    FROM subcategories s
    JOIN categories c ON c.id = s.category_id
"#;

const SUBCATEGORY_FILTER: &str = r#"
    ($1::text IS NULL OR s.name ILIKE $1 OR s.description ILIKE $1 OR c.name ILIKE $1)
    AND ($2::uuid IS NULL OR s.category_id = $2)
"#;

const CONCEPT_FROM: &str = r#"
    FROM concepts k
    JOIN subcategories s ON s.id = k.subcategory_id
    JOIN categories c ON c.id = s.category_id
"#;

const CONCEPT_FILTER: &str = r#"
    ($1::text IS NULL OR k.name ILIKE $1 OR k.short_description ILIKE $1
        OR array_to_string(k.tags, ' ') ILIKE $1)
    AND ($2::uuid IS NULL OR k.subcategory_id = $2)
    AND ($3::uuid IS NULL OR s.category_id = $3)
"#;

const CONCEPT_DETAIL_COLUMNS: &str = r#"
    k.id, k.subcategory_id, s.name AS subcategory_name, s.category_id, c.name AS category_name,
    k.name, k.short_description, k.detailed_description, k.how_to_perform, k.when_to_use,
    k.why_to_use, k.best_practices, k.real_world_examples, k.job_roles, k.pros_and_cons,
    k.learning_resources, k.useful_links, k.related_concepts, k.tags, k.images,
    k.created_at, k.updated_at
"#;

const SUBMISSION_SELECT: &str = r#"
    SELECT x.id, x.title, x.description, x.usecase, x.app_link, x.web_link, x.github_link,
        x.image_url, x.subcategory_id, s.name AS subcategory_name, c.name AS category_name,
        x.status, x.created_at, x.updated_at
    FROM submissions x
    LEFT JOIN subcategories s ON s.id = x.subcategory_id
    LEFT JOIN categories c ON c.id = s.category_id
"#;

const SUBMISSION_FILTER: &str = r#"
    ($1::submission_status IS NULL OR x.status = $1)
    AND ($2::uuid IS NULL OR x.subcategory_id = $2)
    AND ($3::text IS NULL OR x.title ILIKE $3 OR x.description ILIKE $3)
"#;

/// Build an ILIKE pattern from free-text search, escaping wildcards.
///
/// Blank input means "no filter".
pub fn search_pattern(search: Option<&str>) -> Option<String> {
    let term = search.map(str::trim).filter(|s| !s.is_empty())?;
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    Some(escaped)
}

/// Content management over the catalog tables
pub struct AdminService {
    pool: PgPool,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn not_found(entity: &str, id: Uuid) -> AppError {
        AppError::NotFound(format!("{} {} not found", entity, id))
    }

    // =========================================================================
    // CATEGORIES
    // =========================================================================

    pub async fn list_categories(
        &self,
        params: &CategoryQueryParams,
    ) -> Result<(Vec<AdminCategoryDto>, i64)> {
        let pattern = search_pattern(params.search.as_deref());
        let page = params.pagination();

        let count_sql = format!(
            "SELECT COUNT(*) FROM categories c WHERE {}",
            CATEGORY_FILTER
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count categories: {:?}", e);
                AppError::Database(e)
            })?;

        let sql = format!(
            "{} WHERE {} ORDER BY c.display_order, c.name OFFSET $2 LIMIT $3",
            CATEGORY_SELECT, CATEGORY_FILTER
        );
        let items = sqlx::query_as::<_, AdminCategoryDto>(&sql)
            .bind(&pattern)
            .bind(page.offset())
            .bind(page.limit())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((items, total))
    }

    pub async fn get_category(&self, id: Uuid) -> Result<AdminCategoryDto> {
        let sql = format!("{} WHERE c.id = $1", CATEGORY_SELECT);
        sqlx::query_as::<_, AdminCategoryDto>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch category {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| Self::not_found("Category", id))
    }

    pub async fn create_category(&self, dto: CategoryInputDto) -> Result<AdminCategoryDto> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO categories (name, description, icon, display_order)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(&dto.icon)
        .bind(dto.display_order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "category"))?;

        info!("Category created: id={}, name={}", id, dto.name);
        self.get_category(id).await
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        dto: CategoryInputDto,
    ) -> Result<AdminCategoryDto> {
        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = $2, description = $3, icon = $4, display_order = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(&dto.icon)
        .bind(dto.display_order)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "category"))?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found("Category", id));
        }

        info!("Category updated: id={}", id);
        self.get_category(id).await
    }

    /// Delete a category with its subcategories and concepts
    pub async fn delete_category(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "category"))?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found("Category", id));
        }

        info!("Category deleted: id={}", id);
        Ok(())
    }

    // =========================================================================
    // SUBCATEGORIES
    // =========================================================================

    pub async fn list_subcategories(
        &self,
        params: &SubcategoryQueryParams,
    ) -> Result<(Vec<AdminSubcategoryDto>, i64)> {
        let pattern = search_pattern(params.search.as_deref());
        let page = params.pagination();

        let count_sql = format!(
            r#"
            SELECT COUNT(*) FROM subcategories s
            JOIN categories c ON c.id = s.category_id
            WHERE {}
            "#,
            SUBCATEGORY_FILTER
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&pattern)
            .bind(params.category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count subcategories: {:?}", e);
                AppError::Database(e)
            })?;

        let sql = format!(
            r#"
            {} WHERE {}
            ORDER BY c.display_order, c.name, s.display_order, s.name
            OFFSET $3 LIMIT $4
            "#,
            SUBCATEGORY_SELECT, SUBCATEGORY_FILTER
        );
        let items = sqlx::query_as::<_, AdminSubcategoryDto>(&sql)
            .bind(&pattern)
            .bind(params.category_id)
            .bind(page.offset())
            .bind(page.limit())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list subcategories: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((items, total))
    }

    pub async fn get_subcategory(&self, id: Uuid) -> Result<AdminSubcategoryDto> {
        let sql = format!("{} WHERE s.id = $1", SUBCATEGORY_SELECT);
        sqlx::query_as::<_, AdminSubcategoryDto>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch subcategory {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| Self::not_found("Subcategory", id))
    }

    pub async fn create_subcategory(
        &self,
        dto: SubcategoryInputDto,
    ) -> Result<AdminSubcategoryDto> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO subcategories (category_id, name, description, display_order)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(dto.category_id)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.display_order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "subcategory"))?;

        info!(
            "Subcategory created: id={}, category={}",
            id, dto.category_id
        );
        self.get_subcategory(id).await
    }

    pub async fn update_subcategory(
        &self,
        id: Uuid,
        dto: SubcategoryInputDto,
    ) -> Result<AdminSubcategoryDto> {
        let result = sqlx::query(
            r#"
            UPDATE subcategories
            SET category_id = $2, name = $3, description = $4, display_order = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(dto.category_id)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.display_order)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "subcategory"))?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found("Subcategory", id));
        }

        info!("Subcategory updated: id={}", id);
        self.get_subcategory(id).await
    }

    /// Delete a subcategory with its concepts; its submissions are detached
    pub async fn delete_subcategory(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM subcategories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "subcategory"))?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found("Subcategory", id));
        }

        info!("Subcategory deleted: id={}", id);
        Ok(())
    }

    // =========================================================================
    // CONCEPTS
    // =========================================================================

    pub async fn list_concepts(
        &self,
        params: &ConceptQueryParams,
    ) -> Result<(Vec<AdminConceptDto>, i64)> {
        let pattern = search_pattern(params.search.as_deref());
        let category_id = params.effective_category_id();
        let page = params.pagination();

        let count_sql = format!("SELECT COUNT(*) {} WHERE {}", CONCEPT_FROM, CONCEPT_FILTER);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&pattern)
            .bind(params.subcategory_id)
            .bind(category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count concepts: {:?}", e);
                AppError::Database(e)
            })?;

        let sql = format!(
            r#"
            SELECT k.id, k.subcategory_id, s.name AS subcategory_name,
                s.category_id, c.name AS category_name, k.name, k.short_description,
                k.tags, COALESCE(cardinality(k.images), 0) AS image_count, k.updated_at
            {} WHERE {}
            ORDER BY c.display_order, s.display_order, k.name
            OFFSET $4 LIMIT $5
            "#,
            CONCEPT_FROM, CONCEPT_FILTER
        );
        let items = sqlx::query_as::<_, AdminConceptDto>(&sql)
            .bind(&pattern)
            .bind(params.subcategory_id)
            .bind(category_id)
            .bind(page.offset())
            .bind(page.limit())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list concepts: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((items, total))
    }

    pub async fn get_concept(&self, id: Uuid) -> Result<AdminConceptDetailDto> {
        let sql = format!(
            "SELECT {} {} WHERE k.id = $1",
            CONCEPT_DETAIL_COLUMNS, CONCEPT_FROM
        );
        sqlx::query_as::<_, AdminConceptDetailDto>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch concept {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| Self::not_found("Concept", id))
    }

    pub async fn create_concept(&self, dto: ConceptInputDto) -> Result<AdminConceptDetailDto> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO concepts
                (subcategory_id, name, short_description, detailed_description,
                 how_to_perform, when_to_use, why_to_use, best_practices,
                 real_world_examples, job_roles, pros_and_cons, learning_resources,
                 useful_links, related_concepts, tags, images)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING id
            "#,
        )
        .bind(dto.subcategory_id)
        .bind(&dto.name)
        .bind(&dto.short_description)
        .bind(&dto.detailed_description)
        .bind(&dto.how_to_perform)
        .bind(&dto.when_to_use)
        .bind(&dto.why_to_use)
        .bind(&dto.best_practices)
        .bind(&dto.real_world_examples)
        .bind(&dto.job_roles)
        .bind(&dto.pros_and_cons)
        .bind(&dto.learning_resources)
        .bind(&dto.useful_links)
        .bind(&dto.related_concepts)
        .bind(&dto.tags)
        .bind(&dto.images)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "concept"))?;

        info!(
            "Concept created: id={}, subcategory={}",
            id, dto.subcategory_id
        );
        self.get_concept(id).await
    }

    pub async fn update_concept(
        &self,
        id: Uuid,
        dto: ConceptInputDto,
    ) -> Result<AdminConceptDetailDto> {
        let result = sqlx::query(
            r#"
            UPDATE concepts
            SET subcategory_id = $2, name = $3, short_description = $4,
                detailed_description = $5, how_to_perform = $6, when_to_use = $7,
                why_to_use = $8, best_practices = $9, real_world_examples = $10,
                job_roles = $11, pros_and_cons = $12, learning_resources = $13,
                useful_links = $14, related_concepts = $15, tags = $16, images = $17,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(dto.subcategory_id)
        .bind(&dto.name)
        .bind(&dto.short_description)
        .bind(&dto.detailed_description)
        .bind(&dto.how_to_perform)
        .bind(&dto.when_to_use)
        .bind(&dto.why_to_use)
        .bind(&dto.best_practices)
        .bind(&dto.real_world_examples)
        .bind(&dto.job_roles)
        .bind(&dto.pros_and_cons)
        .bind(&dto.learning_resources)
        .bind(&dto.useful_links)
        .bind(&dto.related_concepts)
        .bind(&dto.tags)
        .bind(&dto.images)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "concept"))?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found("Concept", id));
        }

        info!("Concept updated: id={}", id);
        self.get_concept(id).await
    }

    pub async fn delete_concept(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM concepts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "concept"))?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found("Concept", id));
        }

        info!("Concept deleted: id={}", id);
        Ok(())
    }

    // =========================================================================
    // SUBMISSIONS
    // =========================================================================

    /// List submissions, newest first
    pub async fn list_submissions(
        &self,
        params: &SubmissionQueryParams,
    ) -> Result<(Vec<AdminSubmissionDto>, i64)> {
        let pattern = search_pattern(params.search.as_deref());
        let page = params.pagination();

        let count_sql = format!(
            "SELECT COUNT(*) FROM submissions x WHERE {}",
            SUBMISSION_FILTER
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(params.status)
            .bind(params.subcategory_id)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count submissions: {:?}", e);
                AppError::Database(e)
            })?;

        let sql = format!(
            "{} WHERE {} ORDER BY x.created_at DESC OFFSET $4 LIMIT $5",
            SUBMISSION_SELECT, SUBMISSION_FILTER
        );
        let items = sqlx::query_as::<_, AdminSubmissionDto>(&sql)
            .bind(params.status)
            .bind(params.subcategory_id)
            .bind(&pattern)
            .bind(page.offset())
            .bind(page.limit())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list submissions: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((items, total))
    }

    pub async fn submission_stats(&self) -> Result<SubmissionStatsDto> {
        sqlx::query_as::<_, SubmissionStatsDto>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'requested') AS requested,
                COUNT(*) FILTER (WHERE status = 'approved') AS approved
            FROM submissions
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute submission stats: {:?}", e);
            AppError::Database(e)
        })
    }

    pub async fn get_submission(&self, id: Uuid) -> Result<AdminSubmissionDto> {
        let sql = format!("{} WHERE x.id = $1", SUBMISSION_SELECT);
        sqlx::query_as::<_, AdminSubmissionDto>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch submission {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| Self::not_found("Submission", id))
    }

    pub async fn update_submission(
        &self,
        id: Uuid,
        dto: SubmissionUpdateDto,
    ) -> Result<AdminSubmissionDto> {
        let result = sqlx::query(
            r#"
            UPDATE submissions
            SET title = $2, description = $3, usecase = $4, app_link = $5,
                web_link = $6, github_link = $7, image_url = $8, subcategory_id = $9,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(&dto.usecase)
        .bind(&dto.app_link)
        .bind(&dto.web_link)
        .bind(&dto.github_link)
        .bind(&dto.image_url)
        .bind(dto.subcategory_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "submission"))?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found("Submission", id));
        }

        info!("Submission updated: id={}", id);
        self.get_submission(id).await
    }

    /// Approve or return a submission to the moderation queue
    pub async fn set_submission_status(
        &self,
        id: Uuid,
        status: SubmissionStatus,
    ) -> Result<AdminSubmissionDto> {
        let result = sqlx::query(
            "UPDATE submissions SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error(e, "submission"))?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found("Submission", id));
        }

        info!("Submission {} set to {}", id, status);
        self.get_submission(id).await
    }

    pub async fn delete_submission(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "submission"))?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found("Submission", id));
        }

        info!("Submission deleted: id={}", id);
        Ok(())
    }
}
