use std::{collections::HashMap, hash::Hash, path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};

use crate::errors::ServiceError;

/// Generic JSON file-backed map.
///
/// Holds a `HashMap<K, V>` in memory and rewrites the whole file after every
/// mutation. Writers serialise on the lock, so a save always reflects the
/// mutation that triggered it.
#[derive(Clone)]
pub struct JsonMapStore<K, V> {
    entries: Arc<RwLock<HashMap<K, V>>>,
    file_path: PathBuf,
}

impl<K, V> JsonMapStore<K, V>
where
    K: Eq + Hash + serde::Serialize + serde::de::DeserializeOwned + Clone,
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Load the map from `path`, creating an empty file when it is missing.
    /// A file that exists but cannot be parsed is an error, not an empty map.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.map_err(ServiceError::store)?;
        }

        let map: HashMap<K, V> = match fs::read(&file_path).await {
            Ok(bytes) if bytes.is_empty() => HashMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ServiceError::Store(format!("corrupt store file {}: {e}", file_path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty: HashMap<K, V> = HashMap::new();
                write_atomic(&file_path, &empty).await?;
                empty
            }
            Err(e) => return Err(ServiceError::store(e)),
        };

        Ok(Arc::new(Self { entries: Arc::new(RwLock::new(map)), file_path }))
    }

    /// Snapshot of all values.
    pub async fn values(&self) -> Vec<V> {
        let map = self.entries.read().await;
        map.values().cloned().collect()
    }

    /// Values matching `pred`.
    pub async fn filter<F>(&self, pred: F) -> Vec<V>
    where
        F: Fn(&V) -> bool,
    {
        let map = self.entries.read().await;
        map.values().filter(|v| pred(v)).cloned().collect()
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.entries.read().await;
        map.get(key).cloned()
    }

    /// Insert or replace a value and persist.
    pub async fn insert(&self, key: K, value: V) -> Result<(), ServiceError> {
        let mut map = self.entries.write().await;
        map.insert(key, value);
        write_atomic(&self.file_path, &*map).await
    }

    /// Remove a key and persist; returns whether it existed.
    pub async fn remove(&self, key: &K) -> Result<bool, ServiceError> {
        let mut map = self.entries.write().await;
        if map.remove(key).is_none() {
            return Ok(false);
        }
        write_atomic(&self.file_path, &*map).await?;
        Ok(true)
    }

    /// Mutate the value under `key` in place and persist.
    /// Returns `false` without touching the file when the key is absent.
    pub async fn modify<F>(&self, key: &K, f: F) -> Result<bool, ServiceError>
    where
        F: FnOnce(&mut V),
    {
        let mut map = self.entries.write().await;
        match map.get_mut(key) {
            Some(v) => f(v),
            None => return Ok(false),
        }
        write_atomic(&self.file_path, &*map).await?;
        Ok(true)
    }
}

/// Write to a sibling temp file and rename over the target.
async fn write_atomic<T: serde::Serialize>(path: &PathBuf, value: &T) -> Result<(), ServiceError> {
    let data = serde_json::to_vec(value).map_err(ServiceError::store)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data).await.map_err(ServiceError::store)?;
    fs::rename(&tmp, path).await.map_err(ServiceError::store)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn json_map_store_crud_persists() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonMapStore::<String, String>::new(&tmp).await?;

        assert_eq!(store.values().await.len(), 0);

        store.insert("a".into(), "1".into()).await?;
        store.insert("b".into(), "2".into()).await?;
        assert_eq!(store.get(&"a".into()).await.as_deref(), Some("1"));
        assert_eq!(store.filter(|v| v == "2").await, vec!["2".to_string()]);

        assert!(store.modify(&"a".into(), |v| *v = "10".into()).await?);
        assert!(!store.modify(&"zz".into(), |v| *v = "x".into()).await?);

        assert!(store.remove(&"b".into()).await?);
        assert!(!store.remove(&"b".into()).await?);

        let reloaded = JsonMapStore::<String, String>::new(&tmp).await?;
        assert_eq!(reloaded.values().await, vec!["10".to_string()]);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        tokio::fs::write(&tmp, b"{not json").await?;
        let res = JsonMapStore::<String, String>::new(&tmp).await;
        assert!(matches!(res, Err(ServiceError::Store(_))));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
