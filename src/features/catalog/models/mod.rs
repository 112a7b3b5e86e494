mod category;
mod concept;
mod submission;
mod subcategory;

pub use category::Category;
pub use concept::Concept;
pub use subcategory::Subcategory;
pub use submission::{Submission, SubmissionStatus};
