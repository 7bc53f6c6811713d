//! Order Lifecycle State Machine
//!
//! The forward-only status chains are modeled as ordered enumerations with a
//! single next-allowed lookup, so no-skip/no-regression is mechanically
//! checkable instead of implied by scattered conditionals. The machine is
//! pure; the repositories are the only writers.

use shared::models::{OrderStatus, PaymentStatus, WaiterCallStatus};
use shared::{AppError, AppResult};
use std::fmt;

/// A status that advances strictly linearly: no skipping, no regression,
/// no cycle
pub trait LinearStatus: Copy + PartialEq + fmt::Display {
    /// The immediate successor, `None` when terminal
    fn next(self) -> Option<Self>;

    fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl LinearStatus for OrderStatus {
    fn next(self) -> Option<Self> {
        OrderStatus::next(self)
    }
}

impl LinearStatus for WaiterCallStatus {
    fn next(self) -> Option<Self> {
        WaiterCallStatus::next(self)
    }
}

impl LinearStatus for PaymentStatus {
    fn next(self) -> Option<Self> {
        PaymentStatus::next(self)
    }
}

/// Allow a transition only onto the immediate successor of `current`
pub fn validate_transition<S: LinearStatus>(current: S, requested: S) -> AppResult<()> {
    match current.next() {
        Some(next) if next == requested => Ok(()),
        _ => Err(AppError::invalid_transition(current, requested)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_allows_only_adjacent_forward_pairs() {
        let mut valid = 0;
        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                let result = validate_transition(from, to);
                if from.next() == Some(to) {
                    assert!(result.is_ok(), "{from} -> {to} should be allowed");
                    valid += 1;
                } else {
                    assert!(
                        matches!(result, Err(AppError::InvalidTransition { .. })),
                        "{from} -> {to} should be rejected"
                    );
                }
            }
        }
        assert_eq!(valid, 3);
    }

    #[test]
    fn order_rejects_skip_and_regression() {
        assert!(validate_transition(OrderStatus::New, OrderStatus::Ready).is_err());
        assert!(validate_transition(OrderStatus::Ready, OrderStatus::Preparing).is_err());
        assert!(validate_transition(OrderStatus::Delivered, OrderStatus::New).is_err());
        // Self-transition is not a transition
        assert!(validate_transition(OrderStatus::Preparing, OrderStatus::Preparing).is_err());
    }

    #[test]
    fn delivered_is_terminal() {
        assert!(OrderStatus::Delivered.is_terminal());
        for to in OrderStatus::ALL {
            assert!(validate_transition(OrderStatus::Delivered, to).is_err());
        }
    }

    #[test]
    fn waiter_call_machine_is_enforced_identically() {
        use WaiterCallStatus::*;
        assert!(validate_transition(Pending, Acknowledged).is_ok());
        assert!(validate_transition(Acknowledged, Resolved).is_ok());
        assert!(validate_transition(Pending, Resolved).is_err());
        assert!(validate_transition(Resolved, Pending).is_err());
        assert!(validate_transition(Acknowledged, Pending).is_err());
    }

    #[test]
    fn payment_advances_once() {
        use PaymentStatus::*;
        assert!(validate_transition(Pending, Paid).is_ok());
        assert!(validate_transition(Paid, Pending).is_err());
        assert!(validate_transition(Paid, Paid).is_err());
    }
}
