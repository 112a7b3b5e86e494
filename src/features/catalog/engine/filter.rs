//! Free-text and category-name filter over a `CatalogTree`.
//!
//! Matching propagates bottom-up: a matching leaf keeps its subcategory and
//! category even when their own names do not match. A subcategory or category
//! whose own name matches keeps its full subtree.

use std::collections::HashSet;
use uuid::Uuid;

use super::tree::{CatalogLeaf, CatalogNode, CatalogTree, CategoryBranch, SubcategoryBranch};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Trimmed, lowercased query. Empty matches everything.
    query: String,
    /// Exact (case-sensitive) category name constraint
    category: Option<String>,
}

impl CatalogFilter {
    pub fn new(query: impl AsRef<str>, category: Option<String>) -> Self {
        Self {
            query: query.as_ref().trim().to_lowercase(),
            category: category.filter(|c| !c.trim().is_empty()),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn set_query(&mut self, query: impl AsRef<str>) {
        self.query = query.as_ref().trim().to_lowercase();
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category.filter(|c| !c.trim().is_empty());
    }

    /// True when the filter keeps every node of any tree
    pub fn is_identity(&self) -> bool {
        self.query.is_empty() && self.category.is_none()
    }

    fn text_matches(&self, text: &str) -> bool {
        self.query.is_empty() || text.to_lowercase().contains(&self.query)
    }

    fn leaf_matches<L: CatalogLeaf>(&self, leaf: &L) -> bool {
        self.text_matches(leaf.label()) || leaf.summary().is_some_and(|s| self.text_matches(s))
    }

    fn category_allowed(&self, name: &str) -> bool {
        self.category
            .as_deref()
            .map_or(true, |selected| selected == name)
    }

    /// Return the pruned tree holding only matching nodes and their ancestors.
    pub fn apply<L: CatalogLeaf>(&self, tree: &CatalogTree<L>) -> CatalogTree<L> {
        if self.is_identity() {
            return tree.clone();
        }

        let categories = tree
            .categories
            .iter()
            .filter(|branch| self.category_allowed(&branch.category.name))
            .filter_map(|branch| self.filter_category(branch))
            .collect();

        CatalogTree { categories }
    }

    fn filter_category<L: CatalogLeaf>(
        &self,
        branch: &CategoryBranch<L>,
    ) -> Option<CategoryBranch<L>> {
        if self.text_matches(&branch.category.name) {
            return Some(branch.clone());
        }

        let subcategories: Vec<SubcategoryBranch<L>> = branch
            .subcategories
            .iter()
            .filter_map(|sub| self.filter_subcategory(sub))
            .collect();

        if subcategories.is_empty() {
            return None;
        }

        Some(CategoryBranch {
            category: branch.category.clone(),
            subcategories,
        })
    }

    fn filter_subcategory<L: CatalogLeaf>(
        &self,
        sub: &SubcategoryBranch<L>,
    ) -> Option<SubcategoryBranch<L>> {
        if self.text_matches(&sub.subcategory.name) {
            return Some(sub.clone());
        }

        let leaves: Vec<L> = sub
            .leaves
            .iter()
            .filter(|leaf| self.leaf_matches(*leaf))
            .cloned()
            .collect();

        if leaves.is_empty() {
            return None;
        }

        Some(SubcategoryBranch {
            subcategory: sub.subcategory.clone(),
            leaves,
        })
    }

    /// Same shape as the input tree, each node flagged with whether it
    /// survives `apply`.
    pub fn annotate<L: CatalogLeaf>(&self, tree: &CatalogTree<L>) -> Vec<CatalogNode> {
        let kept = self.apply(tree);
        let kept_ids: HashSet<Uuid> = kept
            .category_ids()
            .into_iter()
            .chain(kept.subcategory_ids())
            .chain(kept.leaf_ids())
            .collect();

        tree.nodes()
            .into_iter()
            .map(|mut node| {
                node.matches_filter = kept_ids.contains(&node.id);
                node
            })
            .collect()
    }
}
