//! Storage module for record persistence
//!
//! Provides functionality for:
//! - A document store abstraction with MongoDB and in-memory backends
//! - Typed collections over the raw BSON documents
//! - Employee records and the service that manages them

pub mod collection;
pub mod id;
pub mod memory;
pub mod model;
pub mod mongo;
pub mod service;
pub mod store;

pub use collection::Collection;
pub use id::RecordId;
pub use memory::MemoryStore;
pub use model::{Employee, EmployeeUpdate};
pub use mongo::MongoStore;
pub use service::EmployeeService;
pub use store::{ensure_schema, CollectionName, DocumentStore};

pub use mongodb::bson::{self, doc, Document};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Cast to ObjectId failed for value \"{0}\"")]
    InvalidId(String),

    #[error("Duplicate value for unique field '{field}' in {collection}")]
    Duplicate { collection: String, field: String },

    #[error(transparent)]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate { .. })
    }
}

impl From<bson::ser::Error> for StoreError {
    fn from(err: bson::ser::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<bson::de::Error> for StoreError {
    fn from(err: bson::de::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
