/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// STORAGE PURPOSES
// =============================================================================

/// Images attached to product submissions
pub const PURPOSE_AD_IMAGES: &str = "ad-images";

/// Images attached to concepts
pub const PURPOSE_CONCEPT_IMAGES: &str = "concept-images";
