mod catalog_service;
mod catalog_source;
mod pg_catalog_source;

pub use catalog_service::{CatalogService, ConceptContext, TreeLoad};
pub use catalog_source::CatalogSource;
pub use pg_catalog_source::{PgCatalogSource, CONCEPT_COLUMNS, SUBMISSION_COLUMNS};
