use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::catalog::engine::NodeLevel;
use crate::features::products::dtos::ProductGraphResponseDto;
use crate::features::skill_map::dtos::SkillMapResponseDto;
use crate::features::views::models::ViewKind;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateViewDto {
    pub kind: ViewKind,
}

/// New search text for a view
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct QueryChangeDto {
    #[validate(length(max = 200, message = "text must be at most 200 characters"))]
    pub text: String,
}

/// One user intent applied to a view session
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEventDto {
    /// Flip one category or subcategory between open and closed
    Toggle { level: NodeLevel, node_id: Uuid },
    /// Replace the search text
    QueryChange(QueryChangeDto),
    /// Select a category by exact name, or clear the selection with null
    CategorySelect { name: Option<String> },
    /// Open every category and subcategory visible under the current filter
    ExpandAll,
    CollapseAll,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum ViewContentDto {
    SkillMap(SkillMapResponseDto),
    Products(ProductGraphResponseDto),
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ViewResponseDto {
    pub view_id: Uuid,
    pub kind: ViewKind,
    /// True when the catalog changed since the last render and the
    /// expansion state went back to all open
    pub expansion_reset: bool,
    pub content: ViewContentDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteViewResponseDto {
    pub deleted: bool,
}
