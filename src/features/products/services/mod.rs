mod product_service;
mod submission_service;

pub use product_service::{render_product_graph, ProductService};
pub use submission_service::SubmissionService;
