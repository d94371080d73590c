use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use anyhow::Context;
use async_trait::async_trait;
use semita_api::{ComplaintId, NotificationId, ServiceId, UserId};
use serde_json::Value;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

pub const SERVICE_PREFIX: &str = "service:";
pub const COMPLAINT_PREFIX: &str = "complaint:";
pub const NOTIF_PREFIX: &str = "notif:";
pub const VOTE_PREFIX: &str = "vote:";

pub fn service_key(id: &ServiceId) -> String {
    format!("{SERVICE_PREFIX}{id}")
}

pub fn complaint_key(id: &ComplaintId) -> String {
    format!("{COMPLAINT_PREFIX}{id}")
}

pub fn notif_key(id: &NotificationId) -> String {
    format!("{NOTIF_PREFIX}{id}")
}

pub fn vote_key(complaint: &ComplaintId, user: &UserId) -> String {
    format!("{VOTE_PREFIX}{complaint}:{user}")
}

/// Document store the domain logic runs against. Documents are JSON values
/// keyed by a prefixed string id; the only query shape is an ascending
/// prefix scan.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>>;
    async fn put(&self, key: &str, value: Value) -> anyhow::Result<()>;
    async fn delete(&self, key: &str) -> anyhow::Result<()>;
    async fn get_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<(String, Value)>>;
}

/// Last-write-wins store backed by an ordered map. Atomic per key, so
/// read-your-writes holds within a single instance.
pub struct MemoryStore(RwLock<BTreeMap<String, Value>>);

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore(RwLock::new(BTreeMap::new()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.0.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> anyhow::Result<()> {
        self.0.write().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.0.write().await.remove(key);
        Ok(())
    }

    async fn get_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<(String, Value)>> {
        Ok(self
            .0
            .read()
            .await
            .range(prefix.to_owned()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

/// Handle shared by all handlers: the injected store plus advisory
/// per-record locks. Every read-modify-write path must hold the lock for
/// its target key, or concurrent writers could lose updates on stores
/// without per-key transactions.
#[derive(Clone)]
pub struct Db {
    store: Arc<dyn Store>,
    locks: Arc<RwLock<HashMap<String, Arc<Mutex<()>>>>>,
}

impl Db {
    pub fn new(store: Arc<dyn Store>) -> Db {
        Db {
            store,
            locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.write().await;
            locks
                .entry(key.to_owned())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    pub async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> anyhow::Result<Option<T>> {
        match self.store.get(key).await? {
            None => Ok(None),
            Some(value) => Ok(Some(
                serde_json::from_value(value)
                    .with_context(|| format!("deserializing record {key:?}"))?,
            )),
        }
    }

    pub async fn fetch_all<T: serde::de::DeserializeOwned>(
        &self,
        prefix: &str,
    ) -> anyhow::Result<Vec<(String, T)>> {
        self.store
            .get_by_prefix(prefix)
            .await?
            .into_iter()
            .map(|(key, value)| {
                let record = serde_json::from_value(value)
                    .with_context(|| format!("deserializing record {key:?}"))?;
                Ok((key, record))
            })
            .collect()
    }

    pub async fn save<T: serde::Serialize>(&self, key: &str, record: &T) -> anyhow::Result<()> {
        let value =
            serde_json::to_value(record).with_context(|| format!("serializing record {key:?}"))?;
        self.store.put(key, value).await
    }

    pub async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.store.delete(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn prefix_scan_is_exact_and_ordered() {
        let store = MemoryStore::new();
        store.put("complaint:b", json!(2)).await.unwrap();
        store.put("complaint:a", json!(1)).await.unwrap();
        store.put("complaints-other", json!(3)).await.unwrap();
        store.put("notif:x", json!(4)).await.unwrap();

        let scanned = store.get_by_prefix("complaint:").await.unwrap();
        assert_eq!(
            scanned,
            vec![
                (String::from("complaint:a"), json!(1)),
                (String::from("complaint:b"), json!(2)),
            ]
        );
    }

    #[tokio::test]
    async fn read_your_writes() {
        let db = Db::new(Arc::new(MemoryStore::new()));
        db.save("service:water", &json!({"ok": true})).await.unwrap();
        let got: Option<serde_json::Value> = db.fetch("service:water").await.unwrap();
        assert_eq!(got, Some(json!({"ok": true})));
        db.remove("service:water").await.unwrap();
        let got: Option<serde_json::Value> = db.fetch("service:water").await.unwrap();
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn advisory_lock_is_exclusive_per_key() {
        let db = Db::new(Arc::new(MemoryStore::new()));
        let guard = db.lock("complaint:x").await;
        let lock = db.locks.read().await.get("complaint:x").unwrap().clone();
        assert!(lock.try_lock().is_err());
        drop(guard);
        assert!(lock.try_lock().is_ok());
    }
}
