//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Dining table
///
/// `qr_code` is the stable per-table identifier encoded in the printed QR
/// code ("table-1", "table-2", ...). Orders and waiter calls carry it as
/// their `table_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiningTable {
    pub id: i64,
    pub name: String,
    pub qr_code: String,
}
