//! Textcast Core Library
//!
//! Domain models, error types, configuration and naming helpers shared by
//! every textcast crate.

pub mod config;
pub mod error;
pub mod models;
pub mod naming;
pub mod storage_types;

pub use config::{BaseConfig, Config, ServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::{RecordBackend, StorageBackend};
