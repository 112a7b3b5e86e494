//! Open/closed tracking for tree views.
//!
//! A view keeps two independent open-sets, one for categories and one for
//! subcategories. Ids that no longer exist in the tree are simply never
//! looked up again.

use std::collections::HashSet;
use uuid::Uuid;

use super::tree::{CatalogLeaf, CatalogTree, NodeLevel, TreeIdentity};

/// Set of node ids currently open
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    open: HashSet<Uuid>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_open(ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            open: ids.into_iter().collect(),
        }
    }

    /// Flip membership of `id`, returning whether it is now open.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        if self.open.remove(&id) {
            false
        } else {
            self.open.insert(id);
            true
        }
    }

    /// Replace the open-set with exactly `ids`.
    pub fn expand_all(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        self.open = ids.into_iter().collect();
    }

    pub fn collapse_all(&mut self) {
        self.open.clear();
    }

    pub fn is_open(&self, id: Uuid) -> bool {
        self.open.contains(&id)
    }

    #[cfg(test)]
    pub fn open_ids(&self) -> &HashSet<Uuid> {
        &self.open
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

/// Which levels start open after a fresh load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionPolicy {
    pub categories_open: bool,
    pub subcategories_open: bool,
}

impl Default for ExpansionPolicy {
    fn default() -> Self {
        Self {
            categories_open: true,
            subcategories_open: true,
        }
    }
}

/// Expansion state of one tree view (skill map or product graph)
#[derive(Debug, Clone, Default)]
pub struct ViewExpansion {
    pub categories: ExpansionState,
    pub subcategories: ExpansionState,
    policy: ExpansionPolicy,
    identity: Option<TreeIdentity>,
}

impl ViewExpansion {
    pub fn new(policy: ExpansionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Everything open, without tracking a tree identity. Used for one-shot
    /// renders that have no session.
    pub fn all_open<L: CatalogLeaf>(tree: &CatalogTree<L>) -> Self {
        let mut expansion = Self::default();
        expansion.sync_with(tree);
        expansion
    }

    /// Reset to the initial policy when `tree` differs from the last tree seen.
    ///
    /// Returns true when a reset happened.
    pub fn sync_with<L: CatalogLeaf>(&mut self, tree: &CatalogTree<L>) -> bool {
        let identity = tree.identity();
        if self.identity.as_ref() == Some(&identity) {
            return false;
        }

        self.categories = if self.policy.categories_open {
            ExpansionState::with_open(tree.category_ids())
        } else {
            ExpansionState::new()
        };
        self.subcategories = if self.policy.subcategories_open {
            ExpansionState::with_open(tree.subcategory_ids())
        } else {
            ExpansionState::new()
        };
        self.identity = Some(identity);
        true
    }

    /// Toggle a node at the given level. Leaves have no open state.
    pub fn toggle(&mut self, level: NodeLevel, id: Uuid) -> Option<bool> {
        match level {
            NodeLevel::Category => Some(self.categories.toggle(id)),
            NodeLevel::Subcategory => Some(self.subcategories.toggle(id)),
            NodeLevel::Leaf => None,
        }
    }

    /// Open exactly the nodes of `visible` (usually the filtered tree).
    pub fn expand_all<L: CatalogLeaf>(&mut self, visible: &CatalogTree<L>) {
        self.categories.expand_all(visible.category_ids());
        self.subcategories.expand_all(visible.subcategory_ids());
    }

    pub fn collapse_all(&mut self) {
        self.categories.collapse_all();
        self.subcategories.collapse_all();
    }

    pub fn is_category_open(&self, id: Uuid) -> bool {
        self.categories.is_open(id)
    }

    pub fn is_subcategory_open(&self, id: Uuid) -> bool {
        self.subcategories.is_open(id)
    }
}
