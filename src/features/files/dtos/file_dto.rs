use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::files::models::File;
use crate::shared::constants::{PURPOSE_AD_IMAGES, PURPOSE_CONCEPT_IMAGES};

/// Storage folder an image belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ImagePurpose {
    /// Product submission images
    AdImages,
    /// Concept illustrations
    ConceptImages,
}

impl ImagePurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImagePurpose::AdImages => PURPOSE_AD_IMAGES,
            ImagePurpose::ConceptImages => PURPOSE_CONCEPT_IMAGES,
        }
    }
}

impl fmt::Display for ImagePurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImagePurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            PURPOSE_AD_IMAGES => Ok(ImagePurpose::AdImages),
            PURPOSE_CONCEPT_IMAGES => Ok(ImagePurpose::ConceptImages),
            other => Err(format!(
                "Unknown purpose '{}'. Expected '{}' or '{}'",
                other, PURPOSE_AD_IMAGES, PURPOSE_CONCEPT_IMAGES
            )),
        }
    }
}

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The image to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
    /// Storage folder: "ad-images" or "concept-images"
    #[schema(example = "concept-images")]
    pub purpose: String,
}

/// Response DTO for file operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileResponseDto {
    pub id: Uuid,
    /// Original filename as uploaded
    pub original_filename: String,
    pub content_type: String,
    /// Size of the file in bytes
    pub file_size: i64,
    /// Absolute URL the image is served from
    pub url: String,
    pub purpose: String,
    pub created_at: DateTime<Utc>,
}

impl From<File> for FileResponseDto {
    fn from(file: File) -> Self {
        Self {
            id: file.id,
            original_filename: file.original_filename,
            content_type: file.content_type,
            file_size: file.file_size,
            url: file.url,
            purpose: file.purpose,
            created_at: file.created_at,
        }
    }
}

/// Request DTO for deleting a file by URL
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DeleteFileByUrlDto {
    /// The URL returned by the upload endpoint
    #[validate(url(message = "Invalid URL format"))]
    #[validate(length(min = 1, message = "url is required"))]
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileResponseDto {
    pub deleted: bool,
}

/// Allowed MIME types for image uploads
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Maximum file size in bytes (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

pub fn is_mime_type_allowed(content_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&content_type)
}

/// Get file extension from content type
pub fn get_extension_from_content_type(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}
