//! Notification Trigger
//!
//! Consumes feed snapshots and decides whether an audible/visual alert is
//! warranted. The heuristic is intentionally coarse: alert when the count of
//! visible records grows, never on the initial population right after
//! subscribing, and never on status churn at equal count. The concrete
//! sound/visual rendering is a collaborator behind an mpsc sink.

pub mod cooldown;

pub use cooldown::CallCooldown;

use crate::feed::{FeedRecord, FeedSubscription};
use serde::Serialize;
use shared::util::now_millis;
use tokio::sync::mpsc;

/// What kind of arrival triggered the alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertKind {
    NewOrderAlert,
    NewCallAlert,
}

/// Abstract alert event handed to the notification sink
#[derive(Debug, Clone, Serialize)]
pub struct AlertEvent {
    pub kind: AlertKind,
    /// Visible record count at the snapshot that fired the alert
    pub count: usize,
    /// UTC milliseconds
    pub at: i64,
}

/// Per-subscription alert suppression state
///
/// Explicitly owned by one watcher ("no snapshot yet" until the first
/// delivery), never shared, so concurrent dashboards cannot interfere with
/// each other's alert timing.
#[derive(Debug)]
pub struct AlertGate {
    kind: AlertKind,
    last_count: Option<usize>,
}

impl AlertGate {
    pub fn new(kind: AlertKind) -> Self {
        Self {
            kind,
            last_count: None,
        }
    }

    /// Feed one snapshot's record count through the gate.
    ///
    /// Fires exactly when the count grew relative to the previous snapshot
    /// of this subscription; the first observed snapshot only arms the gate.
    pub fn observe(&mut self, count: usize) -> Option<AlertEvent> {
        let grew = self.last_count.is_some_and(|prev| count > prev);
        self.last_count = Some(count);
        grew.then(|| AlertEvent {
            kind: self.kind,
            count,
            at: now_millis(),
        })
    }
}

/// Drives one feed subscription into an alert sink
pub struct NotificationTrigger<T> {
    subscription: FeedSubscription<T>,
    gate: AlertGate,
    sink: mpsc::Sender<AlertEvent>,
}

impl<T: FeedRecord> NotificationTrigger<T> {
    pub fn new(
        subscription: FeedSubscription<T>,
        kind: AlertKind,
        sink: mpsc::Sender<AlertEvent>,
    ) -> Self {
        Self {
            subscription,
            gate: AlertGate::new(kind),
            sink,
        }
    }

    /// Run until the subscription is cancelled or the sink is gone
    pub async fn run(mut self) {
        while let Some(event) = self.subscription.next().await {
            if let Some(alert) = self.gate.observe(event.records.len()) {
                tracing::debug!(kind = ?alert.kind, count = alert.count, "alert fired");
                if self.sink.send(alert).await.is_err() {
                    break;
                }
            }
        }
    }
}
