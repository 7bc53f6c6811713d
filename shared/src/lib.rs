//! Shared types for the table-ordering core
//!
//! Data model, error taxonomy, and utility functions used by both the
//! session core and any front-end crate. No async, no I/O.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult};
pub use serde::{Deserialize, Serialize};
