//! Textcast metadata records
//!
//! Persistence of upload records behind the [`RecordStore`] trait, with a
//! DynamoDB backend for deployments and an in-memory backend for local
//! development and tests.

#[cfg(feature = "dynamodb")]
pub mod dynamo;
pub mod factory;
pub mod memory;
pub mod traits;

pub use factory::create_record_store;
#[cfg(feature = "dynamodb")]
pub use dynamo::DynamoRecordStore;
pub use memory::InMemoryRecordStore;
pub use textcast_core::RecordBackend;
pub use traits::{RecordStore, RecordStoreError, RecordStoreResult};
