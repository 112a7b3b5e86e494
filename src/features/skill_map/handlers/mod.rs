mod skill_map_handler;

pub use skill_map_handler::*;
