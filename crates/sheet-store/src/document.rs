//! Embedded document database: named collections of JSON documents keyed by id.
//!
//! Every write goes through a [`Transaction`] that holds the store's write lock,
//! so multi-document read-modify-write steps are atomic. When a snapshot path is
//! configured the whole store is written to disk after each committed write.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::StoreError;

type Collections = BTreeMap<String, BTreeMap<String, Value>>;

#[derive(Clone, Default)]
pub struct DocumentStore {
    data: Arc<RwLock<Collections>>,
    snapshot: Option<PathBuf>,
}

impl DocumentStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens (or starts) a store persisted to `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let data = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Collections::new(),
            Err(e) => return Err(e.into()),
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tracing::info!(
            "opened document store at {} ({} collections)",
            path.display(),
            data.len()
        );
        Ok(Self {
            data: Arc::new(RwLock::new(data)),
            snapshot: Some(path),
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, StoreError> {
        let data = self.data.read().await;
        data.get(collection)
            .and_then(|docs| docs.get(id))
            .map(|doc| serde_json::from_value(doc.clone()))
            .transpose()
            .map_err(Into::into)
    }

    pub async fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, StoreError> {
        self.find(collection, |_: &T| true).await
    }

    pub async fn find<T, F>(&self, collection: &str, predicate: F) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let data = self.data.read().await;
        let mut found = Vec::new();
        for doc in data.get(collection).into_iter().flat_map(|docs| docs.values()) {
            let item: T = serde_json::from_value(doc.clone())?;
            if predicate(&item) {
                found.push(item);
            }
        }
        Ok(found)
    }

    pub async fn set<T: Serialize>(&self, collection: &str, id: &str, doc: &T) -> Result<(), StoreError> {
        self.transaction(|tx| tx.set(collection, id, doc)).await
    }

    pub async fn insert<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        doc: &T,
    ) -> Result<(), StoreError> {
        self.transaction(|tx| tx.insert(collection, id, doc)).await
    }

    pub async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        self.transaction(|tx| tx.update(collection, id, patch)).await
    }

    pub async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        self.transaction(|tx| Ok(tx.delete(collection, id))).await
    }

    /// Runs `f` under the write lock. Its writes land only if it returns `Ok`.
    pub async fn transaction<R, F>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<R, StoreError>,
    {
        let mut data = self.data.write().await;
        let mut tx = Transaction {
            base: &data,
            staged: BTreeMap::new(),
        };
        let result = f(&mut tx)?;
        let staged = tx.staged;
        if staged.is_empty() {
            return Ok(result);
        }

        // the snapshot is written from a staged copy so a failed write leaves memory untouched
        match &self.snapshot {
            Some(path) => {
                let mut next = data.clone();
                apply_staged(&mut next, staged);
                write_snapshot(path, &next).await?;
                *data = next;
            }
            None => apply_staged(&mut data, staged),
        }
        Ok(result)
    }
}

fn apply_staged(data: &mut Collections, staged: BTreeMap<(String, String), Option<Value>>) {
    for ((collection, id), doc) in staged {
        match doc {
            Some(doc) => {
                data.entry(collection).or_default().insert(id, doc);
            }
            None => {
                if let Some(docs) = data.get_mut(&collection) {
                    docs.remove(&id);
                }
            }
        }
    }
}

async fn write_snapshot(path: &Path, data: &Collections) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(data)?;
    let tmpPath = path.with_extension("tmp");
    tokio::fs::write(&tmpPath, bytes).await?;
    tokio::fs::rename(&tmpPath, path).await?;
    Ok(())
}

/// Staged view over the store. Reads see this transaction's own writes.
pub struct Transaction<'a> {
    base: &'a Collections,
    staged: BTreeMap<(String, String), Option<Value>>,
}

impl Transaction<'_> {
    fn raw(&self, collection: &str, id: &str) -> Option<&Value> {
        match self.staged.get(&(collection.to_string(), id.to_string())) {
            Some(staged) => staged.as_ref(),
            None => self.base.get(collection).and_then(|docs| docs.get(id)),
        }
    }

    pub fn exists(&self, collection: &str, id: &str) -> bool {
        self.raw(collection, id).is_some()
    }

    pub fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>, StoreError> {
        self.raw(collection, id)
            .map(|doc| serde_json::from_value(doc.clone()))
            .transpose()
            .map_err(Into::into)
    }

    /// Like `get`, but a missing document is an error.
    pub fn fetch<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<T, StoreError> {
        self.get(collection, id)?
            .ok_or_else(|| StoreError::not_found(collection, id))
    }

    pub fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, StoreError> {
        let mut merged: BTreeMap<&str, &Value> = self
            .base
            .get(collection)
            .into_iter()
            .flat_map(|docs| docs.iter().map(|(id, doc)| (id.as_str(), doc)))
            .collect();
        for ((c, id), doc) in &self.staged {
            if c != collection {
                continue;
            }
            match doc {
                Some(doc) => {
                    merged.insert(id.as_str(), doc);
                }
                None => {
                    merged.remove(id.as_str());
                }
            }
        }
        merged
            .into_values()
            .map(|doc| serde_json::from_value(doc.clone()).map_err(Into::into))
            .collect()
    }

    pub fn set<T: Serialize>(&mut self, collection: &str, id: &str, doc: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(doc)?;
        self.staged
            .insert((collection.to_string(), id.to_string()), Some(value));
        Ok(())
    }

    pub fn insert<T: Serialize>(&mut self, collection: &str, id: &str, doc: &T) -> Result<(), StoreError> {
        if self.exists(collection, id) {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        self.set(collection, id, doc)
    }

    /// Shallow merge: top-level fields of `patch` replace the document's.
    pub fn update(&mut self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        let Value::Object(fields) = patch else {
            return Err(StoreError::Invalid("update patch must be an object".into()));
        };
        let mut doc = self
            .raw(collection, id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        if let Value::Object(existing) = &mut doc {
            existing.extend(fields);
        }
        self.staged
            .insert((collection.to_string(), id.to_string()), Some(doc));
        Ok(())
    }

    pub fn delete(&mut self, collection: &str, id: &str) -> bool {
        let existed = self.exists(collection, id);
        if existed {
            self.staged
                .insert((collection.to_string(), id.to_string()), None);
        }
        existed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Widget {
        name: String,
        count: u32,
    }

    fn widget(name: &str, count: u32) -> Widget {
        Widget {
            name: name.to_string(),
            count,
        }
    }

    #[tokio::test]
    async fn set_get_list_delete() {
        let store = DocumentStore::in_memory();
        store.set("widgets", "b", &widget("bolt", 2)).await.unwrap();
        store.set("widgets", "a", &widget("axle", 1)).await.unwrap();

        let got: Option<Widget> = store.get("widgets", "a").await.unwrap();
        assert_eq!(got, Some(widget("axle", 1)));

        let all: Vec<Widget> = store.list("widgets").await.unwrap();
        assert_eq!(all, vec![widget("axle", 1), widget("bolt", 2)]);

        assert!(store.delete("widgets", "a").await.unwrap());
        assert!(!store.delete("widgets", "a").await.unwrap());
        assert!(store.get::<Widget>("widgets", "a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_refuses_existing_key() {
        let store = DocumentStore::in_memory();
        store.insert("widgets", "a", &widget("axle", 1)).await.unwrap();

        let err = store.insert("widgets", "a", &widget("other", 9)).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn update_merges_top_level_fields() {
        let store = DocumentStore::in_memory();
        store.set("widgets", "a", &widget("axle", 1)).await.unwrap();
        store.update("widgets", "a", json!({ "count": 5 })).await.unwrap();

        let got: Widget = store.get("widgets", "a").await.unwrap().unwrap();
        assert_eq!(got, widget("axle", 5));

        let missing = store.update("widgets", "zzz", json!({ "count": 1 })).await;
        assert!(missing.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn failed_transaction_leaves_no_trace() {
        let store = DocumentStore::in_memory();
        let result: Result<(), StoreError> = store
            .transaction(|tx| {
                tx.set("widgets", "a", &widget("axle", 1))?;
                assert!(tx.exists("widgets", "a"));
                Err(StoreError::Invalid("abort".into()))
            })
            .await;

        assert!(result.is_err());
        assert!(store.list::<Widget>("widgets").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn transaction_reads_its_own_writes() {
        let store = DocumentStore::in_memory();
        store.set("widgets", "a", &widget("axle", 1)).await.unwrap();

        let listed = store
            .transaction(|tx| {
                tx.delete("widgets", "a");
                tx.set("widgets", "b", &widget("bolt", 2))?;
                tx.list::<Widget>("widgets")
            })
            .await
            .unwrap();
        assert_eq!(listed, vec![widget("bolt", 2)]);
    }

    #[tokio::test]
    async fn find_filters() {
        let store = DocumentStore::in_memory();
        for (id, count) in [("a", 1), ("b", 5), ("c", 9)] {
            store.set("widgets", id, &widget(id, count)).await.unwrap();
        }
        let big: Vec<Widget> = store.find("widgets", |w: &Widget| w.count > 4).await.unwrap();
        assert_eq!(big.len(), 2);
    }

    #[tokio::test]
    async fn snapshot_survives_reopen() {
        let path = std::env::temp_dir()
            .join(format!("sheet-store-{}", uuid::Uuid::new_v4()))
            .join("store.json");

        let store = DocumentStore::open(&path).await.unwrap();
        store.set("widgets", "a", &widget("axle", 1)).await.unwrap();
        drop(store);

        let reopened = DocumentStore::open(&path).await.unwrap();
        let got: Option<Widget> = reopened.get("widgets", "a").await.unwrap();
        assert_eq!(got, Some(widget("axle", 1)));

        if let Some(dir) = path.parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
    }

    #[tokio::test]
    async fn failed_snapshot_discards_the_write() {
        let dir = std::env::temp_dir().join(format!("sheet-store-{}", uuid::Uuid::new_v4()));
        let path = dir.join("store.json");
        let store = DocumentStore::open(&path).await.unwrap();
        store.set("widgets", "a", &widget("axle", 1)).await.unwrap();

        // a directory where the temp file should go makes the snapshot write fail
        tokio::fs::create_dir_all(path.with_extension("tmp")).await.unwrap();
        assert!(store.set("widgets", "b", &widget("bolt", 2)).await.is_err());

        assert!(store.get::<Widget>("widgets", "b").await.unwrap().is_none());
        assert_eq!(store.list::<Widget>("widgets").await.unwrap(), vec![widget("axle", 1)]);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
