//! Waiter Call Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Waiter call status
///
/// Same linear-no-regression rule as the order workflow, one step shorter.
/// Resolved calls leave the active feed but stay in storage for history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WaiterCallStatus {
    #[default]
    Pending,
    Acknowledged,
    Resolved,
}

impl WaiterCallStatus {
    /// The immediate successor, `None` when terminal
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Acknowledged),
            Self::Acknowledged => Some(Self::Resolved),
            Self::Resolved => None,
        }
    }

    /// Sort rank for the active-calls feed: pending surfaces first
    pub fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Acknowledged => 1,
            Self::Resolved => 2,
        }
    }
}

impl fmt::Display for WaiterCallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Acknowledged => write!(f, "acknowledged"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

/// Service-request record, independent of orders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaiterCall {
    /// Assigned by the store on creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub table_id: String,
    pub status: WaiterCallStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Creation timestamp (UTC milliseconds)
    pub created_at: i64,
}
