use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use tokio::sync::RwLock;

use crate::{CollectionName, DocumentStore, RecordId, Result, StoreError};

#[derive(Default)]
struct Inner {
    collections: HashMap<CollectionName, Vec<Document>>,
    unique: HashMap<CollectionName, Vec<String>>,
}

/// In-process document store, selected with the `memory://` database URL.
///
/// Documents keep insertion order and unique constraints are checked on
/// every write, the same way the MongoDB indexes reject duplicates.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn id_of(document: &Document) -> Option<RecordId> {
    document.get_object_id("_id").ok().map(RecordId::from)
}

fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, value)| document.get(key) == Some(value))
}

impl Inner {
    /// Fail when `candidate` collides with another document on a unique field
    fn check_unique(&self, collection: CollectionName, candidate: &Document) -> Result<()> {
        let Some(fields) = self.unique.get(&collection) else {
            return Ok(());
        };
        let candidate_id = id_of(candidate);
        let existing = self.collections.get(&collection).map(Vec::as_slice).unwrap_or_default();

        for field in fields {
            let Some(value) = candidate.get(field) else {
                continue;
            };
            let clash = existing
                .iter()
                .filter(|doc| id_of(doc) != candidate_id)
                .any(|doc| doc.get(field) == Some(value));
            if clash {
                return Err(StoreError::Duplicate {
                    collection: collection.to_string(),
                    field: field.clone(),
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_all(&self, collection: CollectionName) -> Result<Vec<Document>> {
        let inner = self.inner.read().await;
        Ok(inner.collections.get(&collection).cloned().unwrap_or_default())
    }

    async fn find_by_id(&self, collection: CollectionName, id: &RecordId) -> Result<Option<Document>> {
        let inner = self.inner.read().await;
        Ok(inner
            .collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| id_of(doc).as_ref() == Some(id)))
            .cloned())
    }

    async fn find_one(&self, collection: CollectionName, filter: Document) -> Result<Option<Document>> {
        let inner = self.inner.read().await;
        Ok(inner
            .collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| matches_filter(doc, &filter)))
            .cloned())
    }

    async fn insert(&self, collection: CollectionName, mut document: Document) -> Result<RecordId> {
        let id = match id_of(&document) {
            Some(id) => id,
            None => {
                let id = RecordId::new();
                document.insert("_id", Bson::ObjectId(id.object_id()));
                id
            }
        };

        let mut inner = self.inner.write().await;
        inner.check_unique(collection, &document)?;
        inner.collections.entry(collection).or_default().push(document);
        Ok(id)
    }

    async fn update_by_id(
        &self,
        collection: CollectionName,
        id: &RecordId,
        fields: Document,
    ) -> Result<Option<Document>> {
        let mut inner = self.inner.write().await;
        let Some(position) = inner
            .collections
            .get(&collection)
            .and_then(|docs| docs.iter().position(|doc| id_of(doc).as_ref() == Some(id)))
        else {
            return Ok(None);
        };

        let mut updated = inner.collections[&collection][position].clone();
        for (key, value) in fields {
            if key != "_id" {
                updated.insert(key, value);
            }
        }
        inner.check_unique(collection, &updated)?;

        if let Some(docs) = inner.collections.get_mut(&collection) {
            docs[position] = updated.clone();
        }
        Ok(Some(updated))
    }

    async fn delete_by_id(&self, collection: CollectionName, id: &RecordId) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let Some(docs) = inner.collections.get_mut(&collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|doc| id_of(doc).as_ref() != Some(id));
        Ok(docs.len() < before)
    }

    async fn ensure_unique(&self, collection: CollectionName, field: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        let fields = inner.unique.entry(collection).or_default();
        if !fields.iter().any(|f| f == field) {
            fields.push(field.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryStore::new();
        let id = store
            .insert(CollectionName::Employees, doc! { "first_name": "Ada" })
            .await
            .unwrap();

        let found = store.find_by_id(CollectionName::Employees, &id).await.unwrap().unwrap();
        assert_eq!(found.get_str("first_name").unwrap(), "Ada");
        assert_eq!(found.get_object_id("_id").unwrap(), id.object_id());

        let by_filter = store
            .find_one(CollectionName::Employees, doc! { "first_name": "Ada" })
            .await
            .unwrap();
        assert!(by_filter.is_some());
        assert!(store.find_all(CollectionName::Users).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c"] {
            store.insert(CollectionName::Employees, doc! { "n": name }).await.unwrap();
        }
        let names: Vec<_> = store
            .find_all(CollectionName::Employees)
            .await
            .unwrap()
            .iter()
            .map(|d| d.get_str("n").unwrap().to_string())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_update_sets_only_given_fields() {
        let store = MemoryStore::new();
        let id = store
            .insert(CollectionName::Employees, doc! { "a": 1, "b": 2 })
            .await
            .unwrap();

        let updated = store
            .update_by_id(CollectionName::Employees, &id, doc! { "b": 3 })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.get_i32("a").unwrap(), 1);
        assert_eq!(updated.get_i32("b").unwrap(), 3);

        let missing = store
            .update_by_id(CollectionName::Employees, &RecordId::new(), doc! { "b": 4 })
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let store = MemoryStore::new();
        let id = store.insert(CollectionName::Employees, doc! {}).await.unwrap();

        assert!(store.delete_by_id(CollectionName::Employees, &id).await.unwrap());
        assert!(!store.delete_by_id(CollectionName::Employees, &id).await.unwrap());
    }

    #[tokio::test]
    async fn test_unique_constraint() {
        let store = MemoryStore::new();
        crate::ensure_schema(&store).await.unwrap();

        store
            .insert(CollectionName::Users, doc! { "username": "bob" })
            .await
            .unwrap();
        let err = store
            .insert(CollectionName::Users, doc! { "username": "bob" })
            .await
            .unwrap_err();
        assert!(err.is_duplicate());

        // Other collections are unconstrained
        store.insert(CollectionName::Employees, doc! { "username": "bob" }).await.unwrap();
        store.insert(CollectionName::Employees, doc! { "username": "bob" }).await.unwrap();
    }
}
