//! Order Repository
//!
//! Translates cart contents into a persisted order record and owns lifecycle
//! mutation. Submission is a single atomic create: either the full order
//! document is written or none of it, and until `submit` returns the order
//! does not exist for any subscriber.

use super::ORDERS;
use crate::cart::CartLine;
use crate::lifecycle;
use crate::money;
use crate::store::DocumentStore;
use serde_json::{Value, json};
use shared::models::{Order, OrderItem, OrderStatus, PaymentStatus};
use shared::util::now_millis;
use shared::{AppError, AppResult};
use std::sync::Arc;

#[derive(Clone)]
pub struct OrderRepository {
    store: Arc<dyn DocumentStore>,
}

impl OrderRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Snapshot cart lines into an immutable order and persist it.
    ///
    /// Assigns `status = new`, `payment_status = pending` and the creation
    /// timestamp; the total is computed here once and never recomputed from
    /// live menu prices. Validation and encoding happen entirely before the
    /// create call, so a `Validation` error guarantees nothing was persisted
    /// and the caller's cart stays intact for a retry.
    pub async fn submit(
        &self,
        table_id: &str,
        session_id: &str,
        lines: &[CartLine],
        note: Option<String>,
    ) -> AppResult<Order> {
        if lines.is_empty() {
            return Err(AppError::validation("cannot submit an empty cart"));
        }
        for line in lines {
            money::validate_line(line.unit_price, line.quantity)?;
        }

        let items: Vec<OrderItem> = lines
            .iter()
            .map(|l| OrderItem {
                item_id: l.item_id.clone(),
                name: l.name.clone(),
                unit_price: l.unit_price,
                quantity: l.quantity,
            })
            .collect();
        let total_price = money::total(items.iter().map(|i| (i.unit_price, i.quantity)));

        let mut order = Order {
            id: None,
            table_id: table_id.to_string(),
            session_id: session_id.to_string(),
            items,
            status: OrderStatus::New,
            total_price,
            note: note.filter(|n| !n.trim().is_empty()),
            created_at: now_millis(),
            payment_status: Some(PaymentStatus::Pending),
        };

        let doc = serde_json::to_value(&order)
            .map_err(|e| AppError::validation(format!("failed to encode order: {e}")))?;
        // Once create returns the write is committed and already visible to
        // subscribers; take only the assigned id from it so no post-commit
        // step can fail and misreport the submission as retryable.
        let created = self.store.create(ORDERS, doc).await?;
        order.id = created
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string);

        tracing::info!(
            order_id = order.id.as_deref().unwrap_or_default(),
            table_id,
            total = order.total_price,
            "order submitted"
        );
        Ok(order)
    }

    /// Fetch an order by id
    pub async fn find_by_id(&self, order_id: &str) -> AppResult<Option<Order>> {
        match self.store.get(ORDERS, order_id).await? {
            Some(doc) => {
                let order = serde_json::from_value(doc).map_err(|e| {
                    AppError::persistence(format!("failed to decode stored order: {e}"))
                })?;
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    /// Advance the kitchen status by exactly one step.
    ///
    /// The lifecycle machine validates before anything is written; on
    /// rejection the record is untouched. Only the `status` field is
    /// written, so a racing reader simply sees the next snapshot.
    pub async fn update_status(&self, order_id: &str, requested: OrderStatus) -> AppResult<Order> {
        let current = self
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("order:{order_id}")))?;
        lifecycle::validate_transition(current.status, requested)?;

        let updated = self
            .store
            .update(ORDERS, order_id, json!({ "status": requested }))
            .await?;
        let order: Order = serde_json::from_value(updated)
            .map_err(|e| AppError::persistence(format!("failed to decode stored order: {e}")))?;

        tracing::info!(order_id, status = %requested, "order status advanced");
        Ok(order)
    }

    /// Mark the order paid (payment status pending -> paid, once)
    pub async fn mark_paid(&self, order_id: &str) -> AppResult<Order> {
        let current = self
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("order:{order_id}")))?;
        let payment = current.payment_status.unwrap_or_default();
        lifecycle::validate_transition(payment, PaymentStatus::Paid)?;

        let updated = self
            .store
            .update(ORDERS, order_id, json!({ "payment_status": PaymentStatus::Paid }))
            .await?;
        let order: Order = serde_json::from_value(updated)
            .map_err(|e| AppError::persistence(format!("failed to decode stored order: {e}")))?;

        tracing::info!(order_id, "order marked paid");
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Query, Snapshot, StoreSubscription};
    use async_trait::async_trait;

    fn lines() -> Vec<CartLine> {
        vec![
            CartLine {
                item_id: "a".into(),
                name: "Ayran".into(),
                unit_price: 50.0,
                quantity: 2,
            },
            CartLine {
                item_id: "b".into(),
                name: "Pide".into(),
                unit_price: 30.0,
                quantity: 1,
            },
        ]
    }

    fn repo() -> OrderRepository {
        OrderRepository::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn submit_snapshots_items_and_computes_total() {
        let repo = repo();
        let order = repo
            .submit("table-1", "s1", &lines(), Some("no onions".into()))
            .await
            .unwrap();

        assert!(order.id.is_some());
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.payment_status, Some(PaymentStatus::Pending));
        assert_eq!(order.total_price, 130.0);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.note.as_deref(), Some("no onions"));
        assert!(order.created_at > 0);
    }

    #[tokio::test]
    async fn submit_rejects_empty_lines() {
        let err = repo().submit("table-1", "s1", &[], None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn submit_rejects_invalid_lines_without_persisting() {
        let store = Arc::new(MemoryStore::new());
        let repo = OrderRepository::new(store.clone());

        let bad_lines = [
            CartLine {
                item_id: "a".into(),
                name: "Ayran".into(),
                unit_price: -50.0,
                quantity: 2,
            },
            CartLine {
                item_id: "b".into(),
                name: "Pide".into(),
                unit_price: 10.0,
                quantity: 0,
            },
            CartLine {
                item_id: "c".into(),
                name: "Soup".into(),
                unit_price: f64::NAN,
                quantity: 1,
            },
        ];
        for bad in &bad_lines {
            let err = repo
                .submit("table-1", "s1", std::slice::from_ref(bad), None)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }

        // One bad line poisons the whole submission
        let mut mixed = lines();
        mixed.push(bad_lines[0].clone());
        let err = repo.submit("table-1", "s1", &mixed, None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // Nothing reached the store
        let orders = store.query(&Query::collection(ORDERS)).await.unwrap();
        assert!(orders.is_empty());
    }

    /// Store stub whose create commits but answers with a stripped document
    struct TerseStore;

    #[async_trait]
    impl crate::store::DocumentStore for TerseStore {
        async fn create(&self, _collection: &str, _doc: Value) -> AppResult<Value> {
            Ok(json!({"id": "assigned-1"}))
        }
        async fn get(&self, _collection: &str, _id: &str) -> AppResult<Option<Value>> {
            Ok(None)
        }
        async fn update(&self, _collection: &str, _id: &str, _patch: Value) -> AppResult<Value> {
            Err(AppError::persistence("unsupported"))
        }
        async fn delete(&self, _collection: &str, _id: &str) -> AppResult<()> {
            Err(AppError::persistence("unsupported"))
        }
        async fn query(&self, _query: &Query) -> AppResult<Snapshot> {
            Ok(Vec::new())
        }
        async fn subscribe(&self, _query: &Query) -> AppResult<StoreSubscription> {
            Err(AppError::persistence("unsupported"))
        }
    }

    #[tokio::test]
    async fn submit_result_does_not_depend_on_decoding_the_committed_doc() {
        // Once create returns, the order exists for every subscriber; the
        // returned record must come from the locally validated snapshot plus
        // the assigned id, never from a fallible post-commit decode.
        let repo = OrderRepository::new(Arc::new(TerseStore));
        let order = repo.submit("table-1", "s1", &lines(), None).await.unwrap();
        assert_eq!(order.id.as_deref(), Some("assigned-1"));
        assert_eq!(order.total_price, 130.0);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.status, OrderStatus::New);
    }

    #[tokio::test]
    async fn blank_note_is_dropped() {
        let order = repo()
            .submit("table-1", "s1", &lines(), Some("   ".into()))
            .await
            .unwrap();
        assert!(order.note.is_none());
    }

    #[tokio::test]
    async fn update_status_walks_the_full_chain() {
        let repo = repo();
        let order = repo.submit("table-1", "s1", &lines(), None).await.unwrap();
        let id = order.id.unwrap();

        let order = repo
            .update_status(&id, OrderStatus::Preparing)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Preparing);
        let order = repo.update_status(&id, OrderStatus::Ready).await.unwrap();
        assert_eq!(order.status, OrderStatus::Ready);
        let order = repo
            .update_status(&id, OrderStatus::Delivered)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn update_status_rejects_skip_without_writing() {
        let repo = repo();
        let order = repo.submit("table-1", "s1", &lines(), None).await.unwrap();
        let id = order.id.unwrap();

        let err = repo
            .update_status(&id, OrderStatus::Delivered)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));

        // Record untouched
        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::New);
    }

    #[tokio::test]
    async fn update_status_on_missing_order_is_not_found() {
        let err = repo()
            .update_status("missing", OrderStatus::Preparing)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn mark_paid_is_one_shot() {
        let repo = repo();
        let order = repo.submit("table-1", "s1", &lines(), None).await.unwrap();
        let id = order.id.unwrap();

        let order = repo.mark_paid(&id).await.unwrap();
        assert_eq!(order.payment_status, Some(PaymentStatus::Paid));

        let err = repo.mark_paid(&id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn item_snapshot_is_immutable_after_creation() {
        let repo = repo();
        let mut menu_lines = lines();
        let order = repo
            .submit("table-1", "s1", &menu_lines, None)
            .await
            .unwrap();
        let id = order.id.unwrap();

        // Menu price change after submission must not touch the order
        menu_lines[0].unit_price = 999.0;

        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.total_price, 130.0);
        assert_eq!(stored.items[0].unit_price, 50.0);
    }
}
