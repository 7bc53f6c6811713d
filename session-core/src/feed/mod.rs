//! Change Feed Subscriber
//!
//! Maintains a live, ordered view of the records matching a filter and emits
//! a structural diff against the previous snapshot: which records were added,
//! and which existing records changed status. Each subscription owns its own
//! last-seen state; concurrent watchers (one per open dashboard tab) never
//! share a cursor.

use crate::repository::{ORDERS, WAITER_CALLS};
use crate::store::{Direction, DocumentStore, FilterOp, Query, StoreSubscription};
use serde::de::DeserializeOwned;
use serde_json::json;
use shared::AppResult;
use shared::models::{Order, WaiterCall};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// A record observable through the feed: stable id plus a status label used
/// for change detection
pub trait FeedRecord: DeserializeOwned + Clone {
    fn record_id(&self) -> Option<&str>;
    fn status_label(&self) -> String;
}

impl FeedRecord for Order {
    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn status_label(&self) -> String {
        self.status.to_string()
    }
}

impl FeedRecord for WaiterCall {
    fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn status_label(&self) -> String {
        self.status.to_string()
    }
}

/// Structural diff between two successive snapshots
#[derive(Debug, Clone)]
pub struct FeedDiff<T> {
    /// Records not present in the previous snapshot
    pub added: Vec<T>,
    /// Records whose status label changed since the previous snapshot
    pub status_changed: Vec<T>,
}

impl<T> Default for FeedDiff<T> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            status_changed: Vec::new(),
        }
    }
}

/// One delivery: the full ordered record set plus the diff
#[derive(Debug, Clone)]
pub struct FeedEvent<T> {
    pub records: Vec<T>,
    pub diff: FeedDiff<T>,
    /// True for the initial population right after subscribing
    pub initial: bool,
}

/// Typed live view over one query, with per-subscription diff state
pub struct FeedSubscription<T> {
    inner: StoreSubscription,
    /// id -> status label at the last delivered snapshot; `None` until the
    /// initial population arrives
    last_seen: Option<HashMap<String, String>>,
    _record: PhantomData<T>,
}

impl<T: FeedRecord> FeedSubscription<T> {
    pub fn new(inner: StoreSubscription) -> Self {
        Self {
            inner,
            last_seen: None,
            _record: PhantomData,
        }
    }

    /// Next feed event, or `None` once cancelled.
    ///
    /// Each delivered snapshot fully supersedes the previous one; the diff is
    /// computed against this subscription's own last-seen state only.
    pub async fn next(&mut self) -> Option<FeedEvent<T>> {
        let snapshot = self.inner.recv().await?;

        let mut records = Vec::with_capacity(snapshot.len());
        for doc in snapshot {
            match serde_json::from_value::<T>(doc) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(error = %e, "skipping undecodable feed record"),
            }
        }

        let initial = self.last_seen.is_none();
        let mut diff = FeedDiff::default();
        if let Some(prev) = &self.last_seen {
            for record in &records {
                let Some(id) = record.record_id() else { continue };
                match prev.get(id) {
                    None => diff.added.push(record.clone()),
                    Some(old_status) if *old_status != record.status_label() => {
                        diff.status_changed.push(record.clone());
                    }
                    Some(_) => {}
                }
            }
        }

        self.last_seen = Some(
            records
                .iter()
                .filter_map(|r| Some((r.record_id()?.to_string(), r.status_label())))
                .collect(),
        );

        Some(FeedEvent {
            records,
            diff,
            initial,
        })
    }

    /// Stop delivery immediately and release the store-side watcher.
    /// Idempotent; a snapshot already in flight is discarded.
    pub fn cancel(&self) {
        self.inner.cancel();
    }
}

/// Factory for the two standard watch queries
#[derive(Clone)]
pub struct ChangeFeed {
    store: Arc<dyn DocumentStore>,
}

impl ChangeFeed {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// All orders, newest first
    pub fn orders_query() -> Query {
        Query::collection(ORDERS).order_by("created_at", Direction::Desc)
    }

    /// Unresolved calls; pending before acknowledged, then newest first.
    /// Descending on the wire string gives "pending" > "acknowledged", which
    /// is exactly the rank order the staff view wants.
    pub fn active_calls_query() -> Query {
        Query::collection(WAITER_CALLS)
            .filter("status", FilterOp::Ne, json!("resolved"))
            .order_by("status", Direction::Desc)
            .order_by("created_at", Direction::Desc)
    }

    /// Watch every order in creation-time-descending order
    pub async fn watch_orders(&self) -> AppResult<FeedSubscription<Order>> {
        let sub = self.store.subscribe(&Self::orders_query()).await?;
        Ok(FeedSubscription::new(sub))
    }

    /// Watch unresolved waiter calls, pending surfacing first
    pub async fn watch_active_calls(&self) -> AppResult<FeedSubscription<WaiterCall>> {
        let sub = self.store.subscribe(&Self::active_calls_query()).await?;
        Ok(FeedSubscription::new(sub))
    }
}
