//! Projection of a filtered catalog tree into a positioned node/edge graph.
//!
//! Layout is a pure function of the tree and the expansion state: the same
//! inputs always produce the same coordinates and colors.

use serde::Serialize;
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use uuid::Uuid;

use super::expansion::ViewExpansion;
use super::tree::{CatalogLeaf, CatalogTree};

pub const ROOT_NODE_ID: &str = "root";
pub const DEFAULT_ROOT_LABEL: &str = "BA Products & Projects";
pub const SUBCATEGORY_NODE_COLOR: &str = "slategray";
pub const NEUTRAL_EDGE_COLOR: &str = "hsl(var(--muted-foreground))";

pub const DEFAULT_PALETTE: &[&str] = &[
    "hsl(var(--primary))",
    "hsl(var(--accent))",
    "hsl(142, 76%, 45%)",
    "hsl(38, 92%, 50%)",
    "hsl(280, 65%, 60%)",
    "hsl(340, 82%, 55%)",
];

/// How category colors are picked from the palette
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorStrategy {
    /// Position in the filtered category list, modulo palette size
    #[default]
    ByRank,
    /// Stable hash of the category id, modulo palette size
    ById,
}

impl std::str::FromStr for ColorStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rank" => Ok(ColorStrategy::ByRank),
            "id" => Ok(ColorStrategy::ById),
            other => Err(format!("unknown color strategy '{}'", other)),
        }
    }
}

/// Fixed column widths and row heights of the diagram
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphLayout {
    pub root_x: f64,
    pub root_y: f64,
    pub category_y: f64,
    pub column_origin_x: f64,
    pub column_width: f64,
    pub leaf_offset_x: f64,
    pub subcategory_band_y: f64,
    pub subcategory_row: f64,
    pub leaf_row: f64,
}

impl Default for GraphLayout {
    fn default() -> Self {
        Self {
            root_x: 400.0,
            root_y: 0.0,
            category_y: 120.0,
            column_origin_x: 150.0,
            column_width: 200.0,
            leaf_offset_x: 200.0,
            subcategory_band_y: 100.0,
            subcategory_row: 80.0,
            leaf_row: 70.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GraphNodeLevel {
    Root,
    Category,
    Subcategory,
    Leaf,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GraphNode {
    pub id: String,
    pub level: GraphNodeLevel,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
    /// Id of the underlying record (absent for the root)
    pub ref_id: Option<Uuid>,
    /// Number of leaves below this node
    pub count: usize,
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct GraphEdge {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct CatalogGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone)]
pub struct GraphProjector {
    layout: GraphLayout,
    palette: Vec<String>,
    strategy: ColorStrategy,
    root_label: String,
}

impl Default for GraphProjector {
    fn default() -> Self {
        Self::new(ColorStrategy::default())
    }
}

impl GraphProjector {
    pub fn new(strategy: ColorStrategy) -> Self {
        Self {
            layout: GraphLayout::default(),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            strategy,
            root_label: DEFAULT_ROOT_LABEL.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_layout(mut self, layout: GraphLayout) -> Self {
        self.layout = layout;
        self
    }

    fn category_color(&self, rank: usize, id: Uuid) -> String {
        if self.palette.is_empty() {
            return NEUTRAL_EDGE_COLOR.to_string();
        }
        let index = match self.strategy {
            ColorStrategy::ByRank => rank % self.palette.len(),
            ColorStrategy::ById => {
                let digest = Sha256::digest(id.as_bytes());
                let mut head = [0u8; 8];
                head.copy_from_slice(&digest[..8]);
                (u64::from_be_bytes(head) % self.palette.len() as u64) as usize
            }
        };
        self.palette[index].clone()
    }

    fn edge(source: &str, target: &str, color: &str) -> GraphEdge {
        GraphEdge {
            id: format!("e-{}-{}", source, target),
            source_id: source.to_string(),
            target_id: target.to_string(),
            color: color.to_string(),
        }
    }

    /// Position the tree as a graph.
    ///
    /// Categories and subcategories without leaves are not materialized.
    /// Children of a node are only materialized when the node is open in
    /// `expansion`.
    pub fn project<L: CatalogLeaf>(
        &self,
        tree: &CatalogTree<L>,
        expansion: &ViewExpansion,
    ) -> CatalogGraph {
        let layout = &self.layout;
        let mut graph = CatalogGraph::default();

        graph.nodes.push(GraphNode {
            id: ROOT_NODE_ID.to_string(),
            level: GraphNodeLevel::Root,
            label: self.root_label.clone(),
            x: layout.root_x,
            y: layout.root_y,
            color: self
                .palette
                .first()
                .cloned()
                .unwrap_or_else(|| NEUTRAL_EDGE_COLOR.to_string()),
            ref_id: None,
            count: tree.leaf_count(),
            expanded: true,
        });

        let materialized = tree.categories.iter().filter(|c| c.leaf_count() > 0);

        for (rank, branch) in materialized.enumerate() {
            let category_id = branch.category.id;
            let node_id = format!("cat-{}", category_id);
            let color = self.category_color(rank, category_id);
            let x = layout.column_origin_x + rank as f64 * layout.column_width;
            let open = expansion.is_category_open(category_id);

            graph.nodes.push(GraphNode {
                id: node_id.clone(),
                level: GraphNodeLevel::Category,
                label: branch.category.name.clone(),
                x,
                y: layout.category_y,
                color: color.clone(),
                ref_id: Some(category_id),
                count: branch.leaf_count(),
                expanded: open,
            });
            graph.edges.push(Self::edge(ROOT_NODE_ID, &node_id, &color));

            if !open {
                continue;
            }

            let mut cursor = layout.category_y + layout.subcategory_band_y;
            for sub in branch.subcategories.iter().filter(|s| !s.leaves.is_empty()) {
                let sub_id = sub.subcategory.id;
                let sub_node_id = format!("sub-{}", sub_id);
                let sub_open = expansion.is_subcategory_open(sub_id);
                let y = cursor;

                graph.nodes.push(GraphNode {
                    id: sub_node_id.clone(),
                    level: GraphNodeLevel::Subcategory,
                    label: sub.subcategory.name.clone(),
                    x,
                    y,
                    color: SUBCATEGORY_NODE_COLOR.to_string(),
                    ref_id: Some(sub_id),
                    count: sub.leaves.len(),
                    expanded: sub_open,
                });
                graph.edges.push(Self::edge(&node_id, &sub_node_id, &color));

                if !sub_open {
                    cursor += layout.subcategory_row;
                    continue;
                }

                for (index, leaf) in sub.leaves.iter().enumerate() {
                    let leaf_node_id = format!("leaf-{}", leaf.leaf_id());
                    graph.nodes.push(GraphNode {
                        id: leaf_node_id.clone(),
                        level: GraphNodeLevel::Leaf,
                        label: leaf.label().to_string(),
                        x: x + layout.leaf_offset_x,
                        y: y + index as f64 * layout.leaf_row,
                        color: color.clone(),
                        ref_id: Some(leaf.leaf_id()),
                        count: 0,
                        expanded: false,
                    });
                    graph
                        .edges
                        .push(Self::edge(&sub_node_id, &leaf_node_id, NEUTRAL_EDGE_COLOR));
                }

                let leaf_band = sub.leaves.len() as f64 * layout.leaf_row;
                cursor += leaf_band.max(layout.subcategory_row);
            }
        }

        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::catalog::engine::{CatalogFilter, NodeLevel};
    use crate::features::catalog::models::{Category, Submission, SubmissionStatus};
    use crate::shared::test_helpers::{category, subcategory, submission};

    fn approved_tree() -> (CatalogTree<Submission>, Vec<Category>) {
        let tools = category("Tools", 0);
        let frameworks = category("Frameworks", 1);
        let empty = category("Empty", 2);
        let diagramming = subcategory(&tools, "Diagramming", 0);
        let analytics = subcategory(&tools, "Analytics", 1);
        let bare = subcategory(&tools, "Bare", 2);
        let strategy = subcategory(&frameworks, "Strategy", 0);
        let leaves = vec![
            submission(Some(&diagramming), "Sketchboard", SubmissionStatus::Approved),
            submission(Some(&diagramming), "Flowly", SubmissionStatus::Approved),
            submission(Some(&analytics), "Chartr", SubmissionStatus::Approved),
            submission(Some(&strategy), "Canvas Pro", SubmissionStatus::Approved),
        ];
        let categories = vec![tools, frameworks, empty];
        let tree = CatalogTree::build(
            &categories,
            &[diagramming, analytics, bare, strategy],
            &leaves,
        );
        (tree, categories)
    }

    fn node<'a>(graph: &'a CatalogGraph, id: &str) -> &'a GraphNode {
        graph
            .nodes
            .iter()
            .find(|n| n.id == id)
            .unwrap_or_else(|| panic!("node {id} missing"))
    }

    #[test]
    fn test_root_always_present() {
        let projector = GraphProjector::default();
        let empty = CatalogTree::<Submission>::default();

        let graph = projector.project(&empty, &ViewExpansion::all_open(&empty));

        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].id, ROOT_NODE_ID);
        assert_eq!((graph.nodes[0].x, graph.nodes[0].y), (400.0, 0.0));
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_only_categories_with_leaves_are_materialized() {
        let (tree, categories) = approved_tree();
        let graph = GraphProjector::default().project(&tree, &ViewExpansion::all_open(&tree));

        let empty_id = format!("cat-{}", categories[2].id);
        assert!(graph.nodes.iter().all(|n| n.id != empty_id));
        let category_nodes = graph
            .nodes
            .iter()
            .filter(|n| n.level == GraphNodeLevel::Category)
            .count();
        assert_eq!(category_nodes, 2);
        let bare_subs = graph
            .nodes
            .iter()
            .filter(|n| n.label == "Bare")
            .count();
        assert_eq!(bare_subs, 0);
    }

    #[test]
    fn test_layout_columns_and_cumulative_rows() {
        let (tree, categories) = approved_tree();
        let graph = GraphProjector::default().project(&tree, &ViewExpansion::all_open(&tree));
        let tools = &tree.categories[0];
        let diagramming = &tools.subcategories[0];
        let analytics = &tools.subcategories[1];

        let tools_node = node(&graph, &format!("cat-{}", categories[0].id));
        assert_eq!((tools_node.x, tools_node.y), (150.0, 120.0));
        assert_eq!(tools_node.count, 3);
        let frameworks_node = node(&graph, &format!("cat-{}", categories[1].id));
        assert_eq!((frameworks_node.x, frameworks_node.y), (350.0, 120.0));

        let diagramming_node = node(&graph, &format!("sub-{}", diagramming.subcategory.id));
        assert_eq!((diagramming_node.x, diagramming_node.y), (150.0, 220.0));
        let second_leaf = node(&graph, &format!("leaf-{}", diagramming.leaves[1].id));
        assert_eq!((second_leaf.x, second_leaf.y), (350.0, 290.0));

        // two leaves reserve 140 before the next subcategory
        let analytics_node = node(&graph, &format!("sub-{}", analytics.subcategory.id));
        assert_eq!(analytics_node.y, 360.0);
    }

    #[test]
    fn test_collapsed_nodes_hide_children_but_keep_counts() {
        let (tree, categories) = approved_tree();
        let mut expansion = ViewExpansion::all_open(&tree);
        expansion.toggle(NodeLevel::Category, categories[0].id);
        let strategy = tree.categories[1].subcategories[0].subcategory.id;
        expansion.toggle(NodeLevel::Subcategory, strategy);

        let graph = GraphProjector::default().project(&tree, &expansion);

        let tools_node = node(&graph, &format!("cat-{}", categories[0].id));
        assert!(!tools_node.expanded);
        assert_eq!(tools_node.count, 3);
        assert!(graph
            .nodes
            .iter()
            .all(|n| n.label != "Diagramming" && n.label != "Sketchboard"));

        let strategy_node = node(&graph, &format!("sub-{}", strategy));
        assert!(!strategy_node.expanded);
        assert_eq!(strategy_node.count, 1);
        assert!(graph.nodes.iter().all(|n| n.label != "Canvas Pro"));
    }

    #[test]
    fn test_edges_follow_parent_colors() {
        let (tree, categories) = approved_tree();
        let graph = GraphProjector::default().project(&tree, &ViewExpansion::all_open(&tree));
        let tools_id = format!("cat-{}", categories[0].id);
        let diagramming_id = format!("sub-{}", tree.categories[0].subcategories[0].subcategory.id);

        let root_edge = graph
            .edges
            .iter()
            .find(|e| e.target_id == tools_id)
            .expect("root edge");
        assert_eq!(root_edge.source_id, ROOT_NODE_ID);
        assert_eq!(root_edge.id, format!("e-root-{}", tools_id));
        assert_eq!(root_edge.color, DEFAULT_PALETTE[0]);

        let sub_edge = graph
            .edges
            .iter()
            .find(|e| e.target_id == diagramming_id)
            .expect("subcategory edge");
        assert_eq!(sub_edge.color, DEFAULT_PALETTE[0]);

        let leaf_edges: Vec<&GraphEdge> = graph
            .edges
            .iter()
            .filter(|e| e.source_id == diagramming_id)
            .collect();
        assert_eq!(leaf_edges.len(), 2);
        assert!(leaf_edges.iter().all(|e| e.color == NEUTRAL_EDGE_COLOR));
        assert_eq!(graph.edges.len(), graph.nodes.len() - 1);
    }

    #[test]
    fn test_rank_coloring_follows_filtered_order() {
        let (tree, categories) = approved_tree();
        let filtered = CatalogFilter::new("canvas", None).apply(&tree);

        let graph =
            GraphProjector::default().project(&filtered, &ViewExpansion::all_open(&filtered));

        let frameworks_node = node(&graph, &format!("cat-{}", categories[1].id));
        assert_eq!(frameworks_node.x, 150.0);
        assert_eq!(frameworks_node.color, DEFAULT_PALETTE[0]);
    }

    #[test]
    fn test_id_coloring_is_stable_under_filtering() {
        let (tree, categories) = approved_tree();
        let projector = GraphProjector::new(ColorStrategy::ById);
        let filtered = CatalogFilter::new("canvas", None).apply(&tree);
        let frameworks_id = format!("cat-{}", categories[1].id);

        let full = projector.project(&tree, &ViewExpansion::all_open(&tree));
        let narrowed = projector.project(&filtered, &ViewExpansion::all_open(&filtered));

        assert_eq!(
            node(&full, &frameworks_id).color,
            node(&narrowed, &frameworks_id).color
        );
    }

    #[test]
    fn test_projection_is_deterministic() {
        let (tree, _) = approved_tree();
        let expansion = ViewExpansion::all_open(&tree);
        let projector = GraphProjector::default();

        assert_eq!(
            projector.project(&tree, &expansion),
            projector.project(&tree, &expansion)
        );
    }

    #[test]
    fn test_color_strategy_parses() {
        assert_eq!("rank".parse::<ColorStrategy>(), Ok(ColorStrategy::ByRank));
        assert_eq!(" ID ".parse::<ColorStrategy>(), Ok(ColorStrategy::ById));
        assert!("hue".parse::<ColorStrategy>().is_err());
    }
}
