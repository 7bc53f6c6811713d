//! Repository Module
//!
//! Persistence adapters over the [`DocumentStore`](crate::store::DocumentStore)
//! seam. Once a record is persisted it is owned here: no client holds a
//! mutable reference, all mutation goes by id through these adapters, and the
//! adapters are the single point translating store failures into the error
//! taxonomy.

pub mod order;
pub mod waiter_call;

// Re-exports
pub use order::OrderRepository;
pub use waiter_call::WaiterCallRepository;

/// Orders collection name
pub const ORDERS: &str = "orders";
/// Waiter calls collection name
pub const WAITER_CALLS: &str = "waiter_calls";
