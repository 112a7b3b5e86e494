mod admin_service;
mod seed_service;

pub use admin_service::AdminService;
pub use seed_service::SeedService;
