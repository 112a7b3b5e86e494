use serde::Deserialize;

use crate::core::error::{AppError, Result};

const DEFAULT_CATALOG: &str = include_str!("../../../../data/seed/skills.json");

/// The default business analysis catalog shipped with the binary
#[derive(Debug, Clone, Deserialize)]
pub struct SeedCatalog {
    pub categories: Vec<SeedCategory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub subcategories: Vec<SeedSubcategory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedSubcategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub concepts: Vec<SeedConcept>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedConcept {
    pub name: String,
    pub short_description: String,
}

impl SeedCatalog {
    pub fn load_default() -> Result<Self> {
        Self::parse(DEFAULT_CATALOG)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| {
            tracing::error!("Failed to parse seed catalog: {:?}", e);
            AppError::Internal(format!("Invalid seed catalog: {}", e))
        })
    }

    pub fn subcategory_count(&self) -> usize {
        self.categories.iter().map(|c| c.subcategories.len()).sum()
    }

    pub fn concept_count(&self) -> usize {
        self.categories
            .iter()
            .flat_map(|c| &c.subcategories)
            .map(|s| s.concepts.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_catalog_shape() {
        let catalog = SeedCatalog::load_default().unwrap();

        let names: Vec<&str> = catalog.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Frameworks",
                "Tools",
                "Statistics & Mathematics",
                "Product Management",
                "Project Management",
                "Business Process Design",
            ]
        );
        assert_eq!(catalog.concept_count(), 171);
        assert!(catalog.categories.iter().all(|c| c.icon.is_some()));
    }

    #[test]
    fn test_default_catalog_names_are_unique() {
        let catalog = SeedCatalog::load_default().unwrap();

        for category in &catalog.categories {
            let mut seen = HashSet::new();
            for sub in &category.subcategories {
                assert!(seen.insert(&sub.name), "duplicate subcategory {}", sub.name);
                let mut concepts = HashSet::new();
                for concept in &sub.concepts {
                    assert!(concepts.insert(&concept.name));
                    assert!(!concept.short_description.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(SeedCatalog::parse(r#"{"categories": [{"name": 1}]}"#).is_err());

        let minimal = SeedCatalog::parse(
            r#"{"categories": [{"name": "Tools", "subcategories": [
                {"name": "Diagramming", "concepts": [{"name": "Figma", "short_description": "Design"}]}
            ]}]}"#,
        )
        .unwrap();
        assert_eq!(minimal.subcategory_count(), 1);
        assert_eq!(minimal.concept_count(), 1);
        assert_eq!(minimal.categories[0].icon, None);
    }
}
