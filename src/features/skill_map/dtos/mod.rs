mod skill_map_dto;

pub use skill_map_dto::*;
