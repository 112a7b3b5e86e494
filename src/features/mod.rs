pub mod admin;
pub mod catalog;
pub mod files;
pub mod products;
pub mod skill_map;
pub mod views;
