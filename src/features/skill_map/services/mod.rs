mod skill_map_service;

pub use skill_map_service::{render_skill_map, SkillMapService};
