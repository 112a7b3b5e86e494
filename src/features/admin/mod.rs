pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod seed;
pub mod services;

pub use services::{AdminService, SeedService};
