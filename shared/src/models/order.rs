//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle status
///
/// Strictly linear kitchen workflow. [`Self::next`] is the single source of
/// truth for what transition is allowed; no skipping, no regression.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    New,
    Preparing,
    Ready,
    Delivered,
}

impl OrderStatus {
    /// The immediate successor in the kitchen workflow, `None` when terminal
    pub fn next(self) -> Option<Self> {
        match self {
            Self::New => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    /// All statuses in workflow order
    pub const ALL: [Self; 4] = [Self::New, Self::Preparing, Self::Ready, Self::Delivered];
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Preparing => write!(f, "preparing"),
            Self::Ready => write!(f, "ready"),
            Self::Delivered => write!(f, "delivered"),
        }
    }
}

/// Payment status (advances independently of the kitchen workflow)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Paid),
            Self::Paid => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
        }
    }
}

/// Order line snapshotted at submission time
///
/// Immutable once the order is created; menu price changes never alter it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Menu item reference (String ID)
    pub item_id: String,
    /// Name snapshot at submission time
    pub name: String,
    /// Unit price snapshot in currency unit
    pub unit_price: f64,
    pub quantity: u32,
}

/// Order entity
///
/// Identity and item snapshot are immutable after creation; only `status`
/// and `payment_status` mutate, and only through the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Assigned by the store on creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub table_id: String,
    /// Browsing-session scope tag, opaque to the core
    pub session_id: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    /// Sum over items of unit_price x quantity, computed at submission
    pub total_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Server-assigned creation timestamp (UTC milliseconds)
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
}
