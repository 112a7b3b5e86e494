mod file_service;

pub use file_service::{content_url, FileContent, FileService};
