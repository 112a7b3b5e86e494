//! Three-level catalog tree (category -> subcategory -> leaf).
//!
//! Rows arrive as flat collections joined by foreign key. `CatalogTree::build`
//! groups and orders them; rows pointing at a parent that is not part of the
//! fetched collections are dropped instead of failing the whole view.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::catalog::models::{Category, Subcategory};

/// A record that hangs below a subcategory (concept or submission)
pub trait CatalogLeaf: Clone {
    fn leaf_id(&self) -> Uuid;
    fn subcategory_id(&self) -> Option<Uuid>;
    fn label(&self) -> &str;
    fn summary(&self) -> Option<&str>;
}

/// Tree level of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NodeLevel {
    Category,
    Subcategory,
    Leaf,
}

/// Flattened, annotated view of a single tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogNode {
    pub id: Uuid,
    pub level: NodeLevel,
    pub label: String,
    pub child_ids: Vec<Uuid>,
    pub matches_filter: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubcategoryBranch<L> {
    pub subcategory: Subcategory,
    pub leaves: Vec<L>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBranch<L> {
    pub category: Category,
    pub subcategories: Vec<SubcategoryBranch<L>>,
}

impl<L> CategoryBranch<L> {
    pub fn leaf_count(&self) -> usize {
        self.subcategories.iter().map(|s| s.leaves.len()).sum()
    }
}

/// Fingerprint of the category/subcategory id set a tree was built from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeIdentity(String);

impl std::fmt::Display for TreeIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogTree<L> {
    pub categories: Vec<CategoryBranch<L>>,
}

impl<L> Default for CatalogTree<L> {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
        }
    }
}

impl<L: CatalogLeaf> CatalogTree<L> {
    /// Assemble the tree from three independently fetched collections.
    ///
    /// Categories and subcategories are ordered by `display_order`, ties keep
    /// input order. Leaves keep input order inside their subcategory.
    pub fn build(categories: &[Category], subcategories: &[Subcategory], leaves: &[L]) -> Self {
        let category_ids: HashSet<Uuid> = categories.iter().map(|c| c.id).collect();

        let mut subs_by_category: HashMap<Uuid, Vec<&Subcategory>> = HashMap::new();
        let mut known_subcategories: HashSet<Uuid> = HashSet::new();
        for sub in subcategories {
            if !category_ids.contains(&sub.category_id) {
                tracing::debug!(
                    "Dropping orphan subcategory {} (category {} not loaded)",
                    sub.id,
                    sub.category_id
                );
                continue;
            }
            known_subcategories.insert(sub.id);
            subs_by_category.entry(sub.category_id).or_default().push(sub);
        }

        let mut leaves_by_subcategory: HashMap<Uuid, Vec<L>> = HashMap::new();
        for leaf in leaves {
            match leaf.subcategory_id() {
                Some(parent) if known_subcategories.contains(&parent) => {
                    leaves_by_subcategory
                        .entry(parent)
                        .or_default()
                        .push(leaf.clone());
                }
                parent => {
                    tracing::debug!(
                        "Dropping orphan leaf {} (subcategory {:?} not loaded)",
                        leaf.leaf_id(),
                        parent
                    );
                }
            }
        }

        let mut ordered: Vec<&Category> = categories.iter().collect();
        ordered.sort_by_key(|c| c.display_order);

        let categories = ordered
            .into_iter()
            .map(|category| {
                let mut subs = subs_by_category.remove(&category.id).unwrap_or_default();
                subs.sort_by_key(|s| s.display_order);

                let subcategories = subs
                    .into_iter()
                    .map(|sub| SubcategoryBranch {
                        subcategory: sub.clone(),
                        leaves: leaves_by_subcategory.remove(&sub.id).unwrap_or_default(),
                    })
                    .collect();

                CategoryBranch {
                    category: category.clone(),
                    subcategories,
                }
            })
            .collect();

        Self { categories }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.categories.iter().map(|c| c.leaf_count()).sum()
    }

    pub fn category_ids(&self) -> Vec<Uuid> {
        self.categories.iter().map(|c| c.category.id).collect()
    }

    pub fn subcategory_ids(&self) -> Vec<Uuid> {
        self.categories
            .iter()
            .flat_map(|c| c.subcategories.iter().map(|s| s.subcategory.id))
            .collect()
    }

    pub fn leaf_ids(&self) -> Vec<Uuid> {
        self.categories
            .iter()
            .flat_map(|c| c.subcategories.iter())
            .flat_map(|s| s.leaves.iter().map(|l| l.leaf_id()))
            .collect()
    }

    /// Identity of the loaded tree: the set of category ids and the set of
    /// subcategory ids. Ordering changes keep the identity.
    pub fn identity(&self) -> TreeIdentity {
        let mut categories = self.category_ids();
        let mut subcategories = self.subcategory_ids();
        categories.sort();
        subcategories.sort();

        let mut hasher = Sha256::new();
        for id in &categories {
            hasher.update(id.as_bytes());
        }
        hasher.update(b"|");
        for id in &subcategories {
            hasher.update(id.as_bytes());
        }
        TreeIdentity(hex::encode(hasher.finalize()))
    }

    /// Flatten into nodes in depth-first order, every node marked as matching.
    pub fn nodes(&self) -> Vec<CatalogNode> {
        let mut nodes = Vec::new();
        for branch in &self.categories {
            nodes.push(CatalogNode {
                id: branch.category.id,
                level: NodeLevel::Category,
                label: branch.category.name.clone(),
                child_ids: branch
                    .subcategories
                    .iter()
                    .map(|s| s.subcategory.id)
                    .collect(),
                matches_filter: true,
            });
            for sub in &branch.subcategories {
                nodes.push(CatalogNode {
                    id: sub.subcategory.id,
                    level: NodeLevel::Subcategory,
                    label: sub.subcategory.name.clone(),
                    child_ids: sub.leaves.iter().map(|l| l.leaf_id()).collect(),
                    matches_filter: true,
                });
                for leaf in &sub.leaves {
                    nodes.push(CatalogNode {
                        id: leaf.leaf_id(),
                        level: NodeLevel::Leaf,
                        label: leaf.label().to_string(),
                        child_ids: Vec::new(),
                        matches_filter: true,
                    });
                }
            }
        }
        nodes
    }
}
