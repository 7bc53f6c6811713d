//! Table-ordering session/state synchronization core
//!
//! Diners at a physical table place orders from a per-table session; staff
//! observe and advance those orders in real time and handle waiter calls.
//! This crate is the synchronization core only: the cart, the order
//! lifecycle machine, the change-feed fan-out and the notification trigger.
//! Menu content, QR rendering, page layout and the concrete store engine are
//! external collaborators.
//!
//! # Module structure
//!
//! ```text
//! session-core/src/
//! ├── config.rs      # Environment-driven configuration
//! ├── cart.rs        # Per-session order-in-progress
//! ├── lifecycle.rs   # Forward-only status machines
//! ├── money.rs       # Decimal arithmetic for totals
//! ├── store/         # Document store seam + in-memory implementation
//! ├── repository/    # Order / waiter-call persistence adapters
//! ├── feed/          # Live snapshot subscriptions and diffing
//! ├── notify/        # Alert gate, trigger, call cooldown
//! ├── session.rs     # Table session facade
//! └── utils/         # Logging
//! ```

pub mod cart;
pub mod config;
pub mod feed;
pub mod lifecycle;
pub mod money;
pub mod notify;
pub mod repository;
pub mod session;
pub mod store;
pub mod utils;

// Re-export public types
pub use cart::{Cart, CartLine};
pub use config::Config;
pub use feed::{ChangeFeed, FeedDiff, FeedEvent, FeedRecord, FeedSubscription};
pub use notify::{AlertEvent, AlertGate, AlertKind, CallCooldown, NotificationTrigger};
pub use repository::{OrderRepository, WaiterCallRepository};
pub use session::TableSession;
pub use store::{
    Direction, DocumentStore, Filter, FilterOp, MemoryStore, Query, Snapshot, SortKey,
    StoreSubscription,
};

// Re-export unified error types from shared
pub use shared::error::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_from_config, init_logger, init_logger_with_file};
