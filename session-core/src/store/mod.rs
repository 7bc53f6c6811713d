//! Document store seam
//!
//! The core depends on a capability surface only: document create /
//! update-by-id / delete-by-id, filtered and ordered queries, and a push
//! subscription that redelivers the full filtered/ordered result set on every
//! matching commit. Any store offering these capabilities can sit behind
//! [`DocumentStore`]; [`MemoryStore`] is the in-process implementation used
//! by tests and the local runtime.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use shared::AppResult;
use std::cmp::Ordering;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// The complete ordered result set matching a query at one point in time
pub type Snapshot = Vec<Value>;

/// Field comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
}

/// Equality / inequality filter on a top-level document field
#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// One component of a multi-field ordering
#[derive(Debug, Clone)]
pub struct SortKey {
    pub field: String,
    pub direction: Direction,
}

/// A filtered, ordered view over one collection
#[derive(Debug, Clone)]
pub struct Query {
    pub collection: String,
    pub filters: Vec<Filter>,
    pub order_by: Vec<SortKey>,
}

impl Query {
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            filters: Vec::new(),
            order_by: Vec::new(),
        }
    }

    pub fn filter(mut self, field: impl Into<String>, op: FilterOp, value: Value) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            op,
            value,
        });
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push(SortKey {
            field: field.into(),
            direction,
        });
        self
    }

    /// True if the document passes every filter
    pub fn matches(&self, doc: &Value) -> bool {
        self.filters.iter().all(|f| {
            let field_value = doc.get(&f.field).unwrap_or(&Value::Null);
            match f.op {
                FilterOp::Eq => field_value == &f.value,
                FilterOp::Ne => field_value != &f.value,
            }
        })
    }

    /// Sort documents in place by the multi-field ordering
    pub fn sort(&self, docs: &mut [Value]) {
        if self.order_by.is_empty() {
            return;
        }
        docs.sort_by(|a, b| {
            for key in &self.order_by {
                let va = a.get(&key.field).unwrap_or(&Value::Null);
                let vb = b.get(&key.field).unwrap_or(&Value::Null);
                let ord = match key.direction {
                    Direction::Asc => cmp_values(va, vb),
                    Direction::Desc => cmp_values(vb, va),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
    }
}

/// Total order over scalar JSON values: Null < Bool < Number < String.
/// Non-scalar values compare equal (ordering on them is undefined).
fn cmp_values(a: &Value, b: &Value) -> Ordering {
    fn type_rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            _ => 4,
        }
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Live subscription handle delivering successive [`Snapshot`]s
///
/// The initial population is delivered immediately on subscribe; afterwards
/// every matching commit redelivers the full result set, in commit order.
/// The buffer is bounded; a consumer that falls a full buffer behind is
/// disconnected by the store and sees end-of-stream after draining.
/// Cancellation is idempotent, releases the store-side watcher immediately
/// and suppresses snapshots that were already queued when it happened.
pub struct StoreSubscription {
    rx: mpsc::Receiver<Snapshot>,
    cancel: CancellationToken,
    /// Releases the store-side watcher entry; ran at most once, on the first
    /// cancel or on drop
    cleanup: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl StoreSubscription {
    pub fn new(rx: mpsc::Receiver<Snapshot>, cancel: CancellationToken) -> Self {
        Self {
            rx,
            cancel,
            cleanup: Mutex::new(None),
        }
    }

    /// Attach the store-side release action
    pub fn with_cleanup(self, cleanup: impl FnOnce() + Send + 'static) -> Self {
        *self.cleanup.lock() = Some(Box::new(cleanup));
        self
    }

    /// Next snapshot, or `None` once cancelled or the store is gone.
    ///
    /// After [`Self::cancel`], queued snapshots are discarded, not dispatched.
    pub async fn recv(&mut self) -> Option<Snapshot> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            snapshot = self.rx.recv() => snapshot,
        }
    }

    /// Stop delivery and release the store-side watcher. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
        if let Some(cleanup) = self.cleanup.lock().take() {
            cleanup();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for StoreSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Capability surface of the persistent store collaborator
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist a new document atomically; the store assigns `id`.
    /// Returns the document as persisted.
    async fn create(&self, collection: &str, doc: Value) -> AppResult<Value>;

    /// Fetch a document by id
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>>;

    /// Shallow-merge `patch` into the document atomically.
    /// Returns the updated document; `NotFound` if it no longer exists.
    async fn update(&self, collection: &str, id: &str, patch: Value) -> AppResult<Value>;

    /// Delete a document by id; `NotFound` if it no longer exists
    async fn delete(&self, collection: &str, id: &str) -> AppResult<()>;

    /// One-shot filtered, ordered read
    async fn query(&self, query: &Query) -> AppResult<Snapshot>;

    /// Open a live subscription over the query's result set
    async fn subscribe(&self, query: &Query) -> AppResult<StoreSubscription>;
}
