//! Waiter-call cooldown
//!
//! Client-side rate limit: a session may not create a new waiter call within
//! a fixed window of its previous one. Rejections are purely local and never
//! reach the store.

use shared::{AppError, AppResult};
use std::time::Duration;
use tokio::time::Instant;

/// Per-session cooldown state
#[derive(Debug)]
pub struct CallCooldown {
    window: Duration,
    last_call: Option<Instant>,
}

impl CallCooldown {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_call: None,
        }
    }

    /// Fail with `RateLimited` while the window since the last successful
    /// call is still open
    pub fn check(&self) -> AppResult<()> {
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.window {
                let retry_after = self.window - elapsed;
                return Err(AppError::RateLimited {
                    retry_after_ms: retry_after.as_millis() as u64,
                });
            }
        }
        Ok(())
    }

    /// Re-arm the window. Call only after the create actually succeeded, so
    /// a failed write does not burn the diner's one call per window.
    pub fn mark(&mut self) {
        self.last_call = Some(Instant::now());
    }
}
