//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic is done with `Decimal` internally, then converted to `f64`
//! for storage and serialization. Totals are rounded to 2 decimal places,
//! half-up.

use rust_decimal::prelude::*;
use shared::{AppError, AppResult};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price
const MAX_UNIT_PRICE: f64 = 1_000_000.0;

/// Maximum allowed quantity per line
const MAX_QUANTITY: u32 = 9999;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{field_name} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// Validate one order line before it is snapshotted into a persisted record
pub fn validate_line(unit_price: f64, quantity: u32) -> AppResult<()> {
    require_finite(unit_price, "unit_price")?;
    if unit_price < 0.0 {
        return Err(AppError::validation(format!(
            "unit_price must be non-negative, got {unit_price}"
        )));
    }
    if unit_price > MAX_UNIT_PRICE {
        return Err(AppError::validation(format!(
            "unit_price exceeds maximum allowed ({MAX_UNIT_PRICE}), got {unit_price}"
        )));
    }
    if quantity == 0 {
        return Err(AppError::validation("quantity must be positive"));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"
        )));
    }
    Ok(())
}

/// Convert f64 to Decimal (NaN/Infinity become 0)
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded for storage
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Line total: unit price x quantity
pub fn line_total(unit_price: f64, quantity: u32) -> Decimal {
    to_decimal(unit_price) * Decimal::from(quantity)
}

/// Total over (unit price, quantity) pairs, rounded for storage
pub fn total<I>(lines: I) -> f64
where
    I: IntoIterator<Item = (f64, u32)>,
{
    to_f64(
        lines
            .into_iter()
            .map(|(price, qty)| line_total(price, qty))
            .sum::<Decimal>(),
    )
}
