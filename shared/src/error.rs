//! Unified error taxonomy
//!
//! Every fallible operation in the core resolves to one of these variants.
//! The repositories are the single point that translates store failures into
//! this taxonomy; the cart and the lifecycle machine never swallow errors.
//!
//! | Variant | Recovery |
//! |---------|----------|
//! | `InvalidTransition` | reject the action, record state unchanged |
//! | `NotFound` | surface to caller, no retry |
//! | `Persistence` | surface to caller, submission may be retried |
//! | `RateLimited` | purely local, wait out the cooldown |
//! | `Validation` | fix the input and retry |

use thiserror::Error;

/// Application error
#[derive(Debug, Error)]
pub enum AppError {
    /// Requested status is not the immediate successor of the current one
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// Target record vanished between read and write
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Write did not durably complete; not visible to any subscriber
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Waiter-call cooldown still active; never reaches the store
    #[error("Rate limited: retry in {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Locally rejected input (empty cart, malformed document, ...)
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Create a NotFound error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an InvalidTransition error from any pair of displayable states
    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// True for errors the caller may retry verbatim
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

/// Result type for core operations
pub type AppResult<T> = Result<T, AppError>;
