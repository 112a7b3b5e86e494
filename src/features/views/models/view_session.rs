use serde::{Deserialize, Serialize};
use std::time::Instant;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::catalog::engine::{CatalogFilter, ExpansionPolicy, ViewExpansion};

/// Which tree a view session renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    SkillMap,
    Products,
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::SkillMap => write!(f, "skill_map"),
            ViewKind::Products => write!(f, "products"),
        }
    }
}

/// Per-viewer state of one open tree view. Never persisted.
#[derive(Debug, Clone)]
pub struct ViewSession {
    pub id: Uuid,
    pub kind: ViewKind,
    pub filter: CatalogFilter,
    pub expansion: ViewExpansion,
    pub last_seen: Instant,
}

impl ViewSession {
    pub fn new(kind: ViewKind) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            filter: CatalogFilter::default(),
            expansion: ViewExpansion::new(ExpansionPolicy::default()),
            last_seen: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }
}
