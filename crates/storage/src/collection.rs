use std::marker::PhantomData;
use std::sync::Arc;

use mongodb::bson::{self, Document};
use serde::{de::DeserializeOwned, Serialize};

use crate::{CollectionName, DocumentStore, RecordId, Result, StoreError};

/// Typed view of one collection of a [`DocumentStore`]
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    name: CollectionName,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            name: self.name,
            _record: PhantomData,
        }
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn DocumentStore>, name: CollectionName) -> Self {
        Self {
            store,
            name,
            _record: PhantomData,
        }
    }

    pub fn name(&self) -> CollectionName {
        self.name
    }

    pub async fn find_all(&self) -> Result<Vec<T>> {
        self.store
            .find_all(self.name)
            .await?
            .into_iter()
            .map(|doc| bson::from_document(doc).map_err(StoreError::from))
            .collect()
    }

    pub async fn find_by_id(&self, id: &RecordId) -> Result<Option<T>> {
        let found = self.store.find_by_id(self.name, id).await?;
        decode(found)
    }

    pub async fn find_one(&self, filter: Document) -> Result<Option<T>> {
        let found = self.store.find_one(self.name, filter).await?;
        decode(found)
    }

    pub async fn insert(&self, record: &T) -> Result<RecordId> {
        let document = bson::to_document(record)?;
        self.store.insert(self.name, document).await
    }

    /// Apply the fields `changes` serializes to; absent fields are untouched
    pub async fn update_by_id<U: Serialize>(&self, id: &RecordId, changes: &U) -> Result<Option<T>> {
        let fields = bson::to_document(changes)?;
        let updated = self.store.update_by_id(self.name, id, fields).await?;
        decode(updated)
    }

    pub async fn delete_by_id(&self, id: &RecordId) -> Result<bool> {
        self.store.delete_by_id(self.name, id).await
    }
}

fn decode<T: DeserializeOwned>(document: Option<Document>) -> Result<Option<T>> {
    document
        .map(bson::from_document)
        .transpose()
        .map_err(Into::into)
}
