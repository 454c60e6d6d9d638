pub mod delete;
pub mod health;
pub mod list;
pub mod upload;
pub mod upload_extended;
