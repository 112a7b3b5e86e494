//! Hierarchical catalog engine: tree assembly, filtering, expansion state
//! and graph projection. Everything here is synchronous and free of I/O.

mod expansion;
mod filter;
mod graph;
mod tree;

pub use expansion::{ExpansionPolicy, ExpansionState, ViewExpansion};
pub use filter::CatalogFilter;
pub use graph::{
    CatalogGraph, ColorStrategy, GraphEdge, GraphLayout, GraphNode, GraphNodeLevel,
    GraphProjector,
};
pub use tree::{
    CatalogLeaf, CatalogNode, CatalogTree, CategoryBranch, NodeLevel, SubcategoryBranch,
    TreeIdentity,
};
