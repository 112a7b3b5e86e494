use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::catalog::engine::NodeLevel;
use crate::features::catalog::models::{Concept, Submission};
use crate::features::catalog::services::TreeLoad;
use crate::features::catalog::CatalogService;
use crate::features::products::services::render_product_graph;
use crate::features::skill_map::services::render_skill_map;
use crate::features::views::dtos::{ViewContentDto, ViewEventDto, ViewResponseDto};
use crate::features::views::models::{ViewKind, ViewSession};
use crate::features::views::services::ViewStore;

/// Freshly loaded tree for one view kind
enum LoadedTree {
    Skills(TreeLoad<Concept>),
    Products(TreeLoad<Submission>),
}

impl LoadedTree {
    fn complete(&self) -> bool {
        match self {
            LoadedTree::Skills(load) => load.complete,
            LoadedTree::Products(load) => load.complete,
        }
    }
}

/// Server-held interactive tree views
pub struct ViewService {
    catalog: Arc<CatalogService>,
    store: Arc<ViewStore>,
}

impl ViewService {
    pub fn new(catalog: Arc<CatalogService>, store: Arc<ViewStore>) -> Self {
        Self { catalog, store }
    }

    async fn load(&self, kind: ViewKind) -> LoadedTree {
        match kind {
            ViewKind::SkillMap => LoadedTree::Skills(self.catalog.load_skill_tree().await),
            ViewKind::Products => LoadedTree::Products(self.catalog.load_product_tree().await),
        }
    }

    fn not_found(id: Uuid) -> AppError {
        AppError::NotFound(format!("View {} not found or expired", id))
    }

    /// Open a new session with everything expanded
    pub async fn create(&self, kind: ViewKind) -> Result<ViewResponseDto> {
        let mut session = ViewSession::new(kind);
        let tree = self.load(kind).await;
        let response = self.sync_and_render(&mut session, &tree);
        self.store.insert(session).await;

        tracing::debug!("Opened {} view {}", kind, response.view_id);
        Ok(response)
    }

    /// Re-render against the current catalog
    pub async fn get(&self, id: Uuid) -> Result<ViewResponseDto> {
        let kind = self.kind_of(id).await?;
        let tree = self.load(kind).await;

        self.store
            .with_session(id, |session| self.sync_and_render(session, &tree))
            .await
            .ok_or_else(|| Self::not_found(id))
    }

    /// Apply one intent event, then re-render
    pub async fn apply_event(&self, id: Uuid, event: ViewEventDto) -> Result<ViewResponseDto> {
        validate_event(&event)?;

        let kind = self.kind_of(id).await?;
        let tree = self.load(kind).await;

        self.store
            .with_session(id, |session| {
                // Reset first so events act on ids of the current tree
                let reset = sync(session, &tree);
                apply(session, &tree, event);
                let mut response = self.render(session, &tree);
                response.expansion_reset = reset;
                response
            })
            .await
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if self.store.remove(id).await {
            Ok(())
        } else {
            Err(Self::not_found(id))
        }
    }

    async fn kind_of(&self, id: Uuid) -> Result<ViewKind> {
        self.store
            .with_session(id, |session| session.kind)
            .await
            .ok_or_else(|| Self::not_found(id))
    }

    fn sync_and_render(&self, session: &mut ViewSession, tree: &LoadedTree) -> ViewResponseDto {
        let reset = sync(session, tree);
        let mut response = self.render(session, tree);
        response.expansion_reset = reset;
        response
    }

    fn render(&self, session: &ViewSession, tree: &LoadedTree) -> ViewResponseDto {
        let content = match tree {
            LoadedTree::Skills(load) => ViewContentDto::SkillMap(render_skill_map(
                &load.tree,
                &session.filter,
                &session.expansion,
            )),
            LoadedTree::Products(load) => ViewContentDto::Products(render_product_graph(
                self.catalog.projector(),
                &load.tree,
                &session.filter,
                &session.expansion,
            )),
        };

        ViewResponseDto {
            view_id: session.id,
            kind: session.kind,
            expansion_reset: false,
            content,
        }
    }
}

fn validate_event(event: &ViewEventDto) -> Result<()> {
    match event {
        ViewEventDto::Toggle {
            level: NodeLevel::Leaf,
            ..
        } => Err(AppError::BadRequest(
            "Only categories and subcategories can be toggled".to_string(),
        )),
        ViewEventDto::QueryChange(change) => change
            .validate()
            .map_err(|e| AppError::Validation(e.to_string())),
        _ => Ok(()),
    }
}

/// Reconcile expansion with the loaded tree. A partial load says nothing
/// about the catalog's shape, so the previous state is kept.
fn sync(session: &mut ViewSession, tree: &LoadedTree) -> bool {
    if !tree.complete() {
        tracing::debug!("View {} rendered from a partial load, expansion kept", session.id);
        return false;
    }
    match tree {
        LoadedTree::Skills(load) => session.expansion.sync_with(&load.tree),
        LoadedTree::Products(load) => session.expansion.sync_with(&load.tree),
    }
}

fn apply(session: &mut ViewSession, tree: &LoadedTree, event: ViewEventDto) {
    match event {
        ViewEventDto::Toggle { level, node_id } => {
            session.expansion.toggle(level, node_id);
        }
        ViewEventDto::QueryChange(change) => session.filter.set_query(change.text),
        ViewEventDto::CategorySelect { name } => session.filter.set_category(name),
        // Without the full tree the visible ids are unknown
        ViewEventDto::ExpandAll if !tree.complete() => {}
        ViewEventDto::ExpandAll => match tree {
            LoadedTree::Skills(load) => {
                let visible = session.filter.apply(&load.tree);
                session.expansion.expand_all(&visible);
            }
            LoadedTree::Products(load) => {
                let visible = session.filter.apply(&load.tree);
                session.expansion.expand_all(&visible);
            }
        },
        ViewEventDto::CollapseAll => session.expansion.collapse_all(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::catalog::engine::GraphProjector;
    use crate::features::catalog::models::{Category, Subcategory};
    use crate::features::skill_map::dtos::SkillMapResponseDto;
    use crate::features::views::dtos::QueryChangeDto;
    use crate::shared::test_helpers::{category, concept, subcategory, MemoryCatalogSource};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    struct Fixture {
        service: ViewService,
        outage: Arc<AtomicBool>,
        tools: Category,
        frameworks: Category,
        diagramming: Subcategory,
    }

    fn fixture() -> Fixture {
        let tools = category("Tools", 0);
        let frameworks = category("Frameworks", 1);
        let diagramming = subcategory(&tools, "Diagramming", 0);
        let strategy = subcategory(&frameworks, "Strategy", 0);
        let source = MemoryCatalogSource::new()
            .with_categories(vec![tools.clone(), frameworks.clone()])
            .with_subcategories(vec![diagramming.clone(), strategy.clone()])
            .with_concepts(vec![
                concept(&diagramming, "Figma", "design tool"),
                concept(&strategy, "SWOT Analysis", "strengths and weaknesses"),
            ]);
        let outage = source.outage_switch();
        let catalog = Arc::new(CatalogService::new(
            Arc::new(source),
            GraphProjector::default(),
        ));
        let store = Arc::new(ViewStore::new(Duration::from_secs(600), 100));
        Fixture {
            service: ViewService::new(catalog, store),
            outage,
            tools,
            frameworks,
            diagramming,
        }
    }

    fn skill_map(response: &ViewResponseDto) -> &SkillMapResponseDto {
        match &response.content {
            ViewContentDto::SkillMap(dto) => dto,
            ViewContentDto::Products(_) => panic!("expected a skill map"),
        }
    }

    #[tokio::test]
    async fn test_create_starts_all_open() {
        let f = fixture();
        let view = f.service.create(ViewKind::SkillMap).await.unwrap();

        assert!(view.expansion_reset);
        let dto = skill_map(&view);
        assert!(dto.categories.iter().all(|c| c.expanded));
        assert!(dto.categories[0].subcategories.iter().all(|s| s.expanded));
    }

    #[tokio::test]
    async fn test_toggle_then_get_keeps_state() {
        let f = fixture();
        let view = f.service.create(ViewKind::SkillMap).await.unwrap();

        let toggled = f
            .service
            .apply_event(
                view.view_id,
                ViewEventDto::Toggle {
                    level: NodeLevel::Category,
                    node_id: f.tools.id,
                },
            )
            .await
            .unwrap();
        assert!(!toggled.expansion_reset);
        assert!(!skill_map(&toggled).categories[0].expanded);

        let again = f.service.get(view.view_id).await.unwrap();
        let dto = skill_map(&again);
        assert!(!dto.categories[0].expanded);
        assert!(dto.categories[1].expanded);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_expansion() {
        let f = fixture();
        let id = f.service.create(ViewKind::SkillMap).await.unwrap().view_id;
        f.service
            .apply_event(
                id,
                ViewEventDto::Toggle {
                    level: NodeLevel::Category,
                    node_id: f.tools.id,
                },
            )
            .await
            .unwrap();

        f.outage.store(true, Ordering::SeqCst);
        let degraded = f.service.get(id).await.unwrap();
        assert!(!degraded.expansion_reset);
        assert!(skill_map(&degraded).no_results);

        // Expanding during the outage must not touch the stored state either
        f.service
            .apply_event(id, ViewEventDto::ExpandAll)
            .await
            .unwrap();

        f.outage.store(false, Ordering::SeqCst);
        let recovered = f.service.get(id).await.unwrap();
        assert!(!recovered.expansion_reset);
        let dto = skill_map(&recovered);
        let tools = dto.categories.iter().find(|c| c.id == f.tools.id).unwrap();
        let frameworks = dto
            .categories
            .iter()
            .find(|c| c.id == f.frameworks.id)
            .unwrap();
        assert!(!tools.expanded);
        assert!(frameworks.expanded);
    }

    #[tokio::test]
    async fn test_long_query_change_rejected() {
        let f = fixture();
        let id = f.service.create(ViewKind::SkillMap).await.unwrap().view_id;

        let result = f
            .service
            .apply_event(
                id,
                ViewEventDto::QueryChange(QueryChangeDto {
                    text: "x".repeat(201),
                }),
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let at_limit = f
            .service
            .apply_event(
                id,
                ViewEventDto::QueryChange(QueryChangeDto {
                    text: "x".repeat(200),
                }),
            )
            .await;
        tokio_test::assert_ok!(at_limit);
    }

    #[tokio::test]
    async fn test_collapse_all_then_expand_all_under_filter() {
        let f = fixture();
        let id = f.service.create(ViewKind::SkillMap).await.unwrap().view_id;

        f.service
            .apply_event(id, ViewEventDto::CollapseAll)
            .await
            .unwrap();
        f.service
            .apply_event(
                id,
                ViewEventDto::QueryChange(QueryChangeDto {
                    text: "figma".to_string(),
                }),
            )
            .await
            .unwrap();
        let view = f
            .service
            .apply_event(id, ViewEventDto::ExpandAll)
            .await
            .unwrap();
        let dto = skill_map(&view);
        assert_eq!(dto.shown_categories, 1);
        assert!(dto.categories[0].expanded);
        assert!(dto.categories[0].subcategories[0].expanded);

        // Frameworks was not visible during expand_all, so it stays closed
        let cleared = f
            .service
            .apply_event(
                id,
                ViewEventDto::QueryChange(QueryChangeDto {
                    text: String::new(),
                }),
            )
            .await
            .unwrap();
        let dto = skill_map(&cleared);
        let frameworks = dto
            .categories
            .iter()
            .find(|c| c.id == f.frameworks.id)
            .unwrap();
        assert!(!frameworks.expanded);
        assert_eq!(frameworks.concept_count, 1);
    }

    #[tokio::test]
    async fn test_category_select_and_clear() {
        let f = fixture();
        let id = f.service.create(ViewKind::SkillMap).await.unwrap().view_id;

        let view = f
            .service
            .apply_event(
                id,
                ViewEventDto::CategorySelect {
                    name: Some("Frameworks".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(skill_map(&view).shown_categories, 1);
        assert_eq!(
            skill_map(&view).selected_category.as_deref(),
            Some("Frameworks")
        );

        let view = f
            .service
            .apply_event(id, ViewEventDto::CategorySelect { name: None })
            .await
            .unwrap();
        assert_eq!(skill_map(&view).shown_categories, 2);
    }

    #[tokio::test]
    async fn test_leaf_toggle_rejected() {
        let f = fixture();
        let id = f.service.create(ViewKind::SkillMap).await.unwrap().view_id;

        let result = f
            .service
            .apply_event(
                id,
                ViewEventDto::Toggle {
                    level: NodeLevel::Leaf,
                    node_id: f.diagramming.id,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_unknown_and_deleted_views() {
        let f = fixture();
        assert!(matches!(
            f.service.get(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));

        let id = f.service.create(ViewKind::Products).await.unwrap().view_id;
        tokio_test::assert_ok!(f.service.delete(id).await);
        assert!(matches!(
            f.service.get(id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.service.delete(id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_products_view_renders_graph() {
        let f = fixture();
        let view = f.service.create(ViewKind::Products).await.unwrap();

        assert_eq!(view.kind, ViewKind::Products);
        match view.content {
            ViewContentDto::Products(dto) => {
                assert!(dto.no_results);
                assert_eq!(dto.graph.nodes.len(), 1);
            }
            ViewContentDto::SkillMap(_) => panic!("expected a graph"),
        }
    }
}
