use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{
    get_extension_from_content_type, FileResponseDto, ImagePurpose,
};
use crate::features::files::models::File;
use crate::modules::storage::MinIOClient;

const FILE_COLUMNS: &str = "id, file_key, original_filename, content_type, file_size, url, \
                            purpose, is_active, created_at, updated_at";

/// Image bytes ready to be sent back to a client
pub struct FileContent {
    pub data: Vec<u8>,
    pub content_type: String,
    pub original_filename: String,
}

/// Service for image uploads
pub struct FileService {
    pool: PgPool,
    minio_client: Arc<MinIOClient>,
    public_base_url: String,
}

impl FileService {
    pub fn new(pool: PgPool, minio_client: Arc<MinIOClient>, public_base_url: String) -> Self {
        Self {
            pool,
            minio_client,
            public_base_url,
        }
    }

    /// Upload an image and record its metadata
    ///
    /// The object lands at `{prefix}/{purpose}/{file_id}.{extension}` and is
    /// served back through `content_url(file_id)`.
    pub async fn upload_file(
        &self,
        data: Vec<u8>,
        original_filename: &str,
        content_type: &str,
        purpose: ImagePurpose,
    ) -> Result<FileResponseDto> {
        let file_size = data.len() as i64;

        let file_id = Uuid::new_v4();
        let extension = get_extension_from_content_type(content_type)
            .ok_or_else(|| AppError::BadRequest(format!("Unsupported type '{}'", content_type)))?;

        let file_key = self
            .minio_client
            .generate_key(purpose.as_str(), &format!("{}.{}", file_id, extension));

        self.minio_client
            .upload(&file_key, data, content_type)
            .await?;

        debug!("File uploaded to MinIO: {}", file_key);

        let url = content_url(&self.public_base_url, file_id);

        let sql = format!(
            r#"
            INSERT INTO files (id, file_key, original_filename, content_type, file_size, url, purpose)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            FILE_COLUMNS
        );

        let file = sqlx::query_as::<_, File>(&sql)
            .bind(file_id)
            .bind(&file_key)
            .bind(original_filename)
            .bind(content_type)
            .bind(file_size)
            .bind(&url)
            .bind(purpose.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to save file metadata: {:?}", e);
                AppError::Database(e)
            })?;

        info!(
            "File metadata saved: id={}, key={}, purpose={}, size={}",
            file.id, file.file_key, file.purpose, file.file_size
        );

        Ok(FileResponseDto::from(file))
    }

    /// Load an active image's bytes
    pub async fn get_content(&self, file_id: Uuid) -> Result<FileContent> {
        let sql = format!(
            "SELECT {} FROM files WHERE id = $1 AND is_active = TRUE",
            FILE_COLUMNS
        );

        let file = sqlx::query_as::<_, File>(&sql)
            .bind(file_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch file {}: {:?}", file_id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        let object = self.minio_client.download(&file.file_key).await?;

        Ok(FileContent {
            data: object.data,
            content_type: object.content_type.unwrap_or(file.content_type),
            original_filename: file.original_filename,
        })
    }

    /// Remove the object behind a URL returned by `upload_file`
    pub async fn delete_by_url(&self, url: &str) -> Result<()> {
        let sql = format!(
            "SELECT {} FROM files WHERE url = $1 AND is_active = TRUE",
            FILE_COLUMNS
        );

        let file = sqlx::query_as::<_, File>(&sql)
            .bind(url)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up file by url: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        self.minio_client.delete(&file.file_key).await?;

        debug!("File deleted from MinIO: {}", file.file_key);

        // Soft delete in database
        sqlx::query("UPDATE files SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(file.id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to soft delete file {}: {:?}", file.id, e);
                AppError::Database(e)
            })?;

        info!("File soft deleted: id={}, key={}", file.id, file.file_key);

        Ok(())
    }
}

/// Public URL an uploaded image is served from
pub fn content_url(public_base_url: &str, file_id: Uuid) -> String {
    format!(
        "{}/api/files/{}/content",
        public_base_url.trim_end_matches('/'),
        file_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_url() {
        let id = Uuid::nil();
        assert_eq!(
            content_url("https://skills.example.com/", id),
            "https://skills.example.com/api/files/00000000-0000-0000-0000-000000000000/content"
        );
    }
}
