use std::fmt;

use async_trait::async_trait;
use mongodb::bson::Document;

use crate::{RecordId, Result};

/// Collections owned by the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionName {
    Users,
    Employees,
}

impl CollectionName {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionName::Users => "users",
            CollectionName::Employees => "employees",
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document database operations used by the services.
///
/// Every call goes straight to the backend: no retries, no transactions,
/// the first failure is returned to the caller.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents of a collection, in insertion order
    async fn find_all(&self, collection: CollectionName) -> Result<Vec<Document>>;

    async fn find_by_id(&self, collection: CollectionName, id: &RecordId) -> Result<Option<Document>>;

    /// First document whose fields equal every entry of `filter`
    async fn find_one(&self, collection: CollectionName, filter: Document) -> Result<Option<Document>>;

    /// Insert a document; the store assigns `_id`
    async fn insert(&self, collection: CollectionName, document: Document) -> Result<RecordId>;

    /// Set the given fields on a document and return it as updated.
    /// An empty `fields` leaves the document as is.
    async fn update_by_id(
        &self,
        collection: CollectionName,
        id: &RecordId,
        fields: Document,
    ) -> Result<Option<Document>>;

    /// Returns whether a document was removed
    async fn delete_by_id(&self, collection: CollectionName, id: &RecordId) -> Result<bool>;

    /// Declare a unique constraint enforced by the store on every write
    async fn ensure_unique(&self, collection: CollectionName, field: &str) -> Result<()>;
}

/// Unique constraints the records rely on
pub const UNIQUE_FIELDS: [(CollectionName, &str); 1] = [(CollectionName::Users, "username")];

/// Declare every constraint in [`UNIQUE_FIELDS`] on the store
pub async fn ensure_schema(store: &dyn DocumentStore) -> Result<()> {
    for (collection, field) in UNIQUE_FIELDS {
        store.ensure_unique(collection, field).await?;
        tracing::debug!(%collection, field, "unique constraint ensured");
    }
    Ok(())
}
