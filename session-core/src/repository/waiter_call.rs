//! Waiter Call Repository
//!
//! Service-request records with their own short lifecycle. The client-side
//! cooldown lives in [`crate::notify::CallCooldown`]; by the time a create
//! reaches this adapter it is past rate limiting.

use super::WAITER_CALLS;
use crate::lifecycle;
use crate::store::DocumentStore;
use serde_json::{Value, json};
use shared::models::{WaiterCall, WaiterCallStatus};
use shared::util::now_millis;
use shared::{AppError, AppResult};
use std::sync::Arc;

#[derive(Clone)]
pub struct WaiterCallRepository {
    store: Arc<dyn DocumentStore>,
}

impl WaiterCallRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Persist a new pending call for a table.
    ///
    /// Encoding happens entirely before the create call; once create returns
    /// the call is committed, so only the assigned id is taken from the
    /// store's answer.
    pub async fn create(&self, table_id: &str, message: Option<String>) -> AppResult<WaiterCall> {
        let mut call = WaiterCall {
            id: None,
            table_id: table_id.to_string(),
            status: WaiterCallStatus::Pending,
            message: message.filter(|m| !m.trim().is_empty()),
            created_at: now_millis(),
        };

        let doc = serde_json::to_value(&call)
            .map_err(|e| AppError::validation(format!("failed to encode waiter call: {e}")))?;
        let created = self.store.create(WAITER_CALLS, doc).await?;
        call.id = created
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string);

        tracing::info!(
            call_id = call.id.as_deref().unwrap_or_default(),
            table_id,
            "waiter call created"
        );
        Ok(call)
    }

    /// Fetch a call by id
    pub async fn find_by_id(&self, call_id: &str) -> AppResult<Option<WaiterCall>> {
        match self.store.get(WAITER_CALLS, call_id).await? {
            Some(doc) => {
                let call = serde_json::from_value(doc).map_err(|e| {
                    AppError::persistence(format!("failed to decode stored waiter call: {e}"))
                })?;
                Ok(Some(call))
            }
            None => Ok(None),
        }
    }

    /// Advance the call status by exactly one step (no regression).
    /// A resolved call stays in storage for history but leaves the active
    /// feed via its filter.
    pub async fn advance(
        &self,
        call_id: &str,
        requested: WaiterCallStatus,
    ) -> AppResult<WaiterCall> {
        let current = self
            .find_by_id(call_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("waiter_call:{call_id}")))?;
        lifecycle::validate_transition(current.status, requested)?;

        let updated = self
            .store
            .update(WAITER_CALLS, call_id, json!({ "status": requested }))
            .await?;
        let call: WaiterCall = serde_json::from_value(updated).map_err(|e| {
            AppError::persistence(format!("failed to decode stored waiter call: {e}"))
        })?;

        tracing::info!(call_id, status = %requested, "waiter call advanced");
        Ok(call)
    }

    /// Staff saw the call
    pub async fn acknowledge(&self, call_id: &str) -> AppResult<WaiterCall> {
        self.advance(call_id, WaiterCallStatus::Acknowledged).await
    }

    /// Staff handled the call
    pub async fn resolve(&self, call_id: &str) -> AppResult<WaiterCall> {
        self.advance(call_id, WaiterCallStatus::Resolved).await
    }
}
