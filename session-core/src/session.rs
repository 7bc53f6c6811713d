//! Table Session
//!
//! One diner-facing session at one physical table: owns the cart and the
//! waiter-call cooldown, and funnels everything persistent through the
//! repositories. The session id is generated per browsing session and is
//! opaque to the core (scoping only, not authentication).

use crate::cart::Cart;
use crate::config::Config;
use crate::notify::CallCooldown;
use crate::repository::{OrderRepository, WaiterCallRepository};
use crate::store::DocumentStore;
use shared::models::{Order, WaiterCall};
use shared::{AppError, AppResult};
use std::sync::Arc;

pub struct TableSession {
    table_id: String,
    session_id: String,
    cart: Cart,
    cooldown: CallCooldown,
    orders: OrderRepository,
    calls: WaiterCallRepository,
}

impl TableSession {
    pub fn new(table_id: impl Into<String>, store: Arc<dyn DocumentStore>, config: &Config) -> Self {
        Self {
            table_id: table_id.into(),
            session_id: uuid::Uuid::new_v4().to_string(),
            cart: Cart::new(),
            cooldown: CallCooldown::new(config.call_cooldown()),
            orders: OrderRepository::new(store.clone()),
            calls: WaiterCallRepository::new(store),
        }
    }

    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Submit the cart as a new order.
    ///
    /// The cart is cleared only after the write durably succeeded; on any
    /// failure it stays intact so the diner can retry the same submission.
    pub async fn submit_order(&mut self, note: Option<String>) -> AppResult<Order> {
        if self.cart.is_empty() {
            return Err(AppError::validation("cannot submit an empty cart"));
        }
        let order = self
            .orders
            .submit(&self.table_id, &self.session_id, self.cart.lines(), note)
            .await?;
        self.cart.clear();
        Ok(order)
    }

    /// Raise a waiter call, subject to the local cooldown.
    ///
    /// A rate-limited attempt never reaches the store; the cooldown re-arms
    /// only on a successful write.
    pub async fn call_waiter(&mut self, message: Option<String>) -> AppResult<WaiterCall> {
        self.cooldown.check()?;
        let call = self.calls.create(&self.table_id, message).await?;
        self.cooldown.mark();
        Ok(call)
    }
}
