//! Data Model
//!
//! Plain serde records shared between the session core and its consumers.

// Menu (read-only collaborator shapes)
pub mod category;
pub mod menu_item;

// Location
pub mod dining_table;

// Orders and service requests
pub mod order;
pub mod waiter_call;

// Re-exports
pub use category::Category;
pub use dining_table::DiningTable;
pub use menu_item::MenuItem;
pub use order::{Order, OrderItem, OrderStatus, PaymentStatus};
pub use waiter_call::{WaiterCall, WaiterCallStatus};
