mod view_service;
mod view_store;

pub use view_service::ViewService;
pub use view_store::ViewStore;
