use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
    Client, Database, IndexModel,
};

use crate::{CollectionName, DocumentStore, RecordId, Result, StoreError};

const DUPLICATE_KEY_CODE: i32 = 11000;

/// MongoDB-backed document store
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connect to a MongoDB deployment
    ///
    /// # Arguments
    /// * `url` - Connection string, e.g. `mongodb://localhost:27017`
    /// * `database` - Database holding the collections
    pub async fn connect(url: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(url).await?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 }).await?;
        tracing::info!(database, "connected to MongoDB");
        Ok(Self { db })
    }

    fn collection(&self, name: CollectionName) -> mongodb::Collection<Document> {
        self.db.collection(name.as_str())
    }
}

/// Map a duplicate-key write failure onto [`StoreError::Duplicate`]
fn map_write_error(err: mongodb::error::Error, collection: CollectionName) -> StoreError {
    if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = &*err.kind {
        if write_error.code == DUPLICATE_KEY_CODE {
            return StoreError::Duplicate {
                collection: collection.to_string(),
                field: duplicate_field(&write_error.message),
            };
        }
    }
    StoreError::Database(err)
}

/// Pull the key name out of "... dup key: { username: \"bob\" }"
fn duplicate_field(message: &str) -> String {
    message
        .split("dup key: {")
        .nth(1)
        .and_then(|rest| rest.split(':').next())
        .map(|field| field.trim().to_string())
        .unwrap_or_default()
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find_all(&self, collection: CollectionName) -> Result<Vec<Document>> {
        let cursor = self.collection(collection).find(doc! {}).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn find_by_id(&self, collection: CollectionName, id: &RecordId) -> Result<Option<Document>> {
        let found = self
            .collection(collection)
            .find_one(doc! { "_id": id.object_id() })
            .await?;
        Ok(found)
    }

    async fn find_one(&self, collection: CollectionName, filter: Document) -> Result<Option<Document>> {
        Ok(self.collection(collection).find_one(filter).await?)
    }

    async fn insert(&self, collection: CollectionName, document: Document) -> Result<RecordId> {
        let result = self
            .collection(collection)
            .insert_one(document)
            .await
            .map_err(|e| map_write_error(e, collection))?;

        match result.inserted_id {
            Bson::ObjectId(oid) => Ok(RecordId::from(oid)),
            other => Err(StoreError::Serialization(format!(
                "Unexpected inserted id: {other}"
            ))),
        }
    }

    async fn update_by_id(
        &self,
        collection: CollectionName,
        id: &RecordId,
        fields: Document,
    ) -> Result<Option<Document>> {
        // "$set" rejects an empty document
        if fields.is_empty() {
            return self.find_by_id(collection, id).await;
        }

        let updated = self
            .collection(collection)
            .find_one_and_update(doc! { "_id": id.object_id() }, doc! { "$set": fields })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| map_write_error(e, collection))?;
        Ok(updated)
    }

    async fn delete_by_id(&self, collection: CollectionName, id: &RecordId) -> Result<bool> {
        let result = self
            .collection(collection)
            .delete_one(doc! { "_id": id.object_id() })
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn ensure_unique(&self, collection: CollectionName, field: &str) -> Result<()> {
        let mut keys = Document::new();
        keys.insert(field, 1);
        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection(collection).create_index(index).await?;
        Ok(())
    }
}
