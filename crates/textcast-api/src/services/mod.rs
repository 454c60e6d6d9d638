pub mod deletion;
pub mod upload;

pub use deletion::DeletionService;
pub use upload::{ExtendedItem, UploadService};
