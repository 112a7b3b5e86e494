//! Default business analysis catalog and the templates that fill in
//! each seeded concept's long-text fields.

mod content;
mod data;

pub use content::{ConceptContent, ContentRenderer};
pub use data::{SeedCatalog, SeedCategory, SeedConcept};
