use sqlx::PgPool;
use tracing::info;

use crate::core::error::{map_db_error, AppError, Result};
use crate::features::catalog::models::{Submission, SubmissionStatus};
use crate::features::catalog::services::SUBMISSION_COLUMNS;
use crate::features::products::dtos::CreateSubmissionDto;

/// Write side of the public submission form
pub struct SubmissionService {
    pool: PgPool,
}

impl SubmissionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a normalized, validated submission awaiting moderation
    pub async fn create(&self, dto: CreateSubmissionDto) -> Result<Submission> {
        let subcategory_id = dto
            .subcategory_id
            .ok_or_else(|| AppError::Validation("subcategory_id is required".to_string()))?;

        let sql = format!(
            r#"
            INSERT INTO submissions
                (title, description, usecase, app_link, web_link, github_link, image_url,
                 subcategory_id, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            SUBMISSION_COLUMNS
        );

        let submission = sqlx::query_as::<_, Submission>(&sql)
            .bind(&dto.title)
            .bind(&dto.description)
            .bind(&dto.usecase)
            .bind(&dto.app_link)
            .bind(&dto.web_link)
            .bind(&dto.github_link)
            .bind(&dto.image_url)
            .bind(subcategory_id)
            .bind(SubmissionStatus::Requested)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_db_error(e, "submission"))?;

        info!(
            "Submission created: id={}, subcategory={}",
            submission.id, subcategory_id
        );

        Ok(submission)
    }
}
