pub mod engine;
pub mod models;
pub mod services;

pub use services::{CatalogService, CatalogSource, PgCatalogSource};
