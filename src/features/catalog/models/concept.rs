use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::catalog::engine::CatalogLeaf;

/// Database model for a concept (the leaf of the skill map)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Concept {
    pub id: Uuid,
    pub subcategory_id: Uuid,
    pub name: String,
    pub short_description: Option<String>,
    pub detailed_description: Option<String>,
    pub how_to_perform: Option<String>,
    pub when_to_use: Option<String>,
    pub why_to_use: Option<String>,
    pub best_practices: Option<String>,
    pub real_world_examples: Option<String>,
    pub job_roles: Option<String>,
    pub pros_and_cons: Option<String>,
    pub learning_resources: Option<String>,
    pub useful_links: Option<String>,
    pub related_concepts: Option<String>,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogLeaf for Concept {
    fn leaf_id(&self) -> Uuid {
        self.id
    }

    fn subcategory_id(&self) -> Option<Uuid> {
        Some(self.subcategory_id)
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> Option<&str> {
        self.short_description.as_deref()
    }
}
