pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod workers;

pub use services::{ViewService, ViewStore};
pub use workers::SessionSweeper;
