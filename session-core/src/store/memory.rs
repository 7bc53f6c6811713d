//! In-memory document store
//!
//! Backs the tests and the local runtime. Mutations take a single write lock,
//! and watcher notification happens inside that critical section, so every
//! subscription observes snapshots in commit order. Delivery itself is
//! non-blocking (bounded channel per watcher); a consumer that falls a full
//! buffer behind is disconnected instead of queueing without bound, and sees
//! end-of-stream after draining what was already delivered.

use super::{DocumentStore, Query, Snapshot, StoreSubscription};
use crate::config::{Config, DEFAULT_FEED_CHANNEL_CAPACITY};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::Value;
use shared::util::snowflake_id;
use shared::{AppError, AppResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;

struct Watcher {
    query: Query,
    tx: mpsc::Sender<Snapshot>,
    token: CancellationToken,
}

/// In-process [`DocumentStore`] implementation
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
    watchers: Arc<DashMap<u64, Watcher>>,
    next_watcher_id: AtomicU64,
    channel_capacity: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_channel_capacity(DEFAULT_FEED_CHANNEL_CAPACITY)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose per-watcher snapshot buffer holds `capacity` entries
    pub fn with_channel_capacity(capacity: usize) -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            watchers: Arc::new(DashMap::new()),
            next_watcher_id: AtomicU64::new(0),
            channel_capacity: capacity.max(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_channel_capacity(config.feed_channel_capacity)
    }

    /// Notify every live watcher of `collection` with a fresh result set.
    /// Must be called with the collections write lock held, so snapshots go
    /// out in commit order. A watcher whose buffer is full gets disconnected:
    /// its sender is dropped so the consumer drains what it has and then
    /// sees end-of-stream.
    fn publish(&self, collection: &str, collections: &HashMap<String, Vec<Value>>) {
        let mut stale = Vec::new();
        for entry in self.watchers.iter() {
            let watcher = entry.value();
            if watcher.query.collection != collection {
                continue;
            }
            if watcher.token.is_cancelled() {
                stale.push(*entry.key());
                continue;
            }
            let snapshot = Self::evaluate(&watcher.query, collections);
            match watcher.tx.try_send(snapshot) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(watcher = *entry.key(), "watcher lagging, disconnecting");
                    stale.push(*entry.key());
                }
                Err(TrySendError::Closed(_)) => stale.push(*entry.key()),
            }
        }
        for id in stale {
            self.watchers.remove(&id);
        }
    }

    fn evaluate(query: &Query, collections: &HashMap<String, Vec<Value>>) -> Snapshot {
        let mut docs: Vec<Value> = collections
            .get(&query.collection)
            .map(|docs| docs.iter().filter(|d| query.matches(d)).cloned().collect())
            .unwrap_or_default();
        query.sort(&mut docs);
        docs
    }

    fn doc_id(doc: &Value) -> Option<&str> {
        doc.get("id").and_then(Value::as_str)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create(&self, collection: &str, mut doc: Value) -> AppResult<Value> {
        let obj = doc
            .as_object_mut()
            .ok_or_else(|| AppError::validation("document must be a JSON object"))?;
        obj.insert("id".to_string(), Value::String(snowflake_id().to_string()));

        let mut collections = self.collections.write();
        collections
            .entry(collection.to_string())
            .or_default()
            .push(doc.clone());
        self.publish(collection, &collections);
        Ok(doc)
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| Self::doc_id(d) == Some(id)))
            .cloned())
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> AppResult<Value> {
        let patch = patch
            .as_object()
            .ok_or_else(|| AppError::validation("patch must be a JSON object"))?
            .clone();

        let mut collections = self.collections.write();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| Self::doc_id(d) == Some(id)))
            .ok_or_else(|| AppError::not_found(format!("{collection}:{id}")))?;
        let obj = doc
            .as_object_mut()
            .ok_or_else(|| AppError::persistence("stored document is not an object"))?;
        for (key, value) in patch {
            obj.insert(key, value);
        }
        let updated = doc.clone();
        self.publish(collection, &collections);
        Ok(updated)
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let mut collections = self.collections.write();
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| AppError::not_found(format!("{collection}:{id}")))?;
        let before = docs.len();
        docs.retain(|d| Self::doc_id(d) != Some(id));
        if docs.len() == before {
            return Err(AppError::not_found(format!("{collection}:{id}")));
        }
        self.publish(collection, &collections);
        Ok(())
    }

    async fn query(&self, query: &Query) -> AppResult<Snapshot> {
        let collections = self.collections.read();
        Ok(Self::evaluate(query, &collections))
    }

    async fn subscribe(&self, query: &Query) -> AppResult<StoreSubscription> {
        // Write lock serializes against commits: the initial snapshot and the
        // watcher registration form one atomic step, so no commit can fall
        // between them.
        let collections = self.collections.write();
        let (tx, rx) = mpsc::channel(self.channel_capacity);
        let token = CancellationToken::new();

        let initial = Self::evaluate(query, &collections);
        let _ = tx.try_send(initial);

        let id = self.next_watcher_id.fetch_add(1, Ordering::Relaxed);
        self.watchers.insert(
            id,
            Watcher {
                query: query.clone(),
                tx,
                token: token.clone(),
            },
        );
        drop(collections);

        tracing::debug!(collection = %query.collection, watcher = id, "subscription opened");
        let watchers = Arc::clone(&self.watchers);
        Ok(StoreSubscription::new(rx, token).with_cleanup(move || {
            watchers.remove(&id);
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Direction, FilterOp};
    use serde_json::json;

    #[tokio::test]
    async fn create_assigns_id_and_get_roundtrips() {
        let store = MemoryStore::new();
        let created = store
            .create("orders", json!({"table_id": "table-1"}))
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();
        let fetched = store.get("orders", &id).await.unwrap().unwrap();
        assert_eq!(fetched["table_id"], "table-1");
    }

    #[tokio::test]
    async fn update_merges_shallow_and_preserves_other_fields() {
        let store = MemoryStore::new();
        let created = store
            .create("orders", json!({"status": "new", "total_price": 130.0}))
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap();
        let updated = store
            .update("orders", id, json!({"status": "preparing"}))
            .await
            .unwrap();
        assert_eq!(updated["status"], "preparing");
        assert_eq!(updated["total_price"], 130.0);
    }

    #[tokio::test]
    async fn update_missing_document_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update("orders", "nope", json!({"status": "preparing"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_missing_document_is_not_found() {
        let store = MemoryStore::new();
        let err = store.delete("orders", "nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn subscribe_delivers_initial_population_immediately() {
        let store = MemoryStore::new();
        store.create("orders", json!({"n": 1})).await.unwrap();
        let query = Query::collection("orders");
        let mut sub = store.subscribe(&query).await.unwrap();
        let snapshot = sub.recv().await.unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test]
    async fn snapshots_arrive_in_commit_order_and_supersede() {
        let store = MemoryStore::new();
        let query = Query::collection("orders").order_by("created_at", Direction::Desc);
        let mut sub = store.subscribe(&query).await.unwrap();
        assert!(sub.recv().await.unwrap().is_empty());

        store
            .create("orders", json!({"created_at": 1}))
            .await
            .unwrap();
        store
            .create("orders", json!({"created_at": 2}))
            .await
            .unwrap();

        let first = sub.recv().await.unwrap();
        assert_eq!(first.len(), 1);
        let second = sub.recv().await.unwrap();
        assert_eq!(second.len(), 2);
        // Newest first
        assert_eq!(second[0]["created_at"], 2);
    }

    #[tokio::test]
    async fn filters_apply_to_subscriptions() {
        let store = MemoryStore::new();
        let query =
            Query::collection("waiter_calls").filter("status", FilterOp::Ne, json!("resolved"));
        let mut sub = store.subscribe(&query).await.unwrap();
        assert!(sub.recv().await.unwrap().is_empty());

        let call = store
            .create("waiter_calls", json!({"status": "pending"}))
            .await
            .unwrap();
        assert_eq!(sub.recv().await.unwrap().len(), 1);

        let id = call["id"].as_str().unwrap();
        store
            .update("waiter_calls", id, json!({"status": "resolved"}))
            .await
            .unwrap();
        // Resolved call leaves the active view
        assert!(sub.recv().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancelled_subscription_discards_queued_snapshot() {
        let store = MemoryStore::new();
        let query = Query::collection("orders");
        let mut sub = store.subscribe(&query).await.unwrap();
        assert!(sub.recv().await.unwrap().is_empty());

        // Snapshot is queued in the channel before the consumer cancels
        store.create("orders", json!({"n": 1})).await.unwrap();
        sub.cancel();
        assert!(sub.recv().await.is_none());

        // Idempotent
        sub.cancel();
        assert!(sub.recv().await.is_none());
    }

    #[tokio::test]
    async fn slow_watcher_is_disconnected_at_capacity() {
        let store = MemoryStore::with_channel_capacity(1);
        let query = Query::collection("orders");
        let mut sub = store.subscribe(&query).await.unwrap();

        // The initial snapshot fills the buffer; the next publish finds it
        // full and drops the watcher rather than queueing without bound
        store.create("orders", json!({"n": 1})).await.unwrap();
        assert_eq!(store.watchers.len(), 0);

        // The consumer still drains what was delivered, then end-of-stream
        assert!(sub.recv().await.unwrap().is_empty());
        assert!(sub.recv().await.is_none());
    }

    #[tokio::test]
    async fn cancel_releases_the_watcher_immediately() {
        let store = MemoryStore::new();
        let query = Query::collection("orders");
        let sub = store.subscribe(&query).await.unwrap();
        assert_eq!(store.watchers.len(), 1);

        // No publish needed for the entry to go away
        sub.cancel();
        assert_eq!(store.watchers.len(), 0);
    }

    #[tokio::test]
    async fn dropped_subscription_releases_the_watcher() {
        let store = MemoryStore::new();
        let query = Query::collection("orders");
        let sub = store.subscribe(&query).await.unwrap();
        assert_eq!(store.watchers.len(), 1);

        drop(sub);
        assert_eq!(store.watchers.len(), 0);
    }

    #[tokio::test]
    async fn independent_subscriptions_do_not_share_state() {
        let store = MemoryStore::new();
        let query = Query::collection("orders");
        let mut a = store.subscribe(&query).await.unwrap();
        let mut b = store.subscribe(&query).await.unwrap();
        a.recv().await.unwrap();
        b.recv().await.unwrap();

        a.cancel();
        store.create("orders", json!({"n": 1})).await.unwrap();

        assert!(a.recv().await.is_none());
        // The other watcher still receives deliveries
        assert_eq!(b.recv().await.unwrap().len(), 1);
    }
}
