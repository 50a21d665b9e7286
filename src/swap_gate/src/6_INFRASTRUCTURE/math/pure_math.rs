//! Pure decimal functions - no I/O, no async
//! All functions here must be deterministic and side-effect free

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::infrastructure::constants::{
    FEE_DECIMALS, MAX_DECIMAL_SCALE, MAX_PRICE_IMPACT_PERCENT, PRICE_IMPACT_DIVISOR, SWAP_FEE_RATE,
};
use crate::infrastructure::errors::{CalculationError, Result};

/// Multiply two decimals, reporting overflow instead of panicking
pub fn checked_multiply(a: Decimal, b: Decimal, operation: &str) -> Result<Decimal> {
    a.checked_mul(b).ok_or_else(|| {
        CalculationError::Overflow {
            operation: format!("{}: {} × {}", operation, a, b),
        }
        .into()
    })
}

pub fn checked_divide(a: Decimal, b: Decimal, operation: &str) -> Result<Decimal> {
    if b.is_zero() {
        return Err(CalculationError::DivisionByZero {
            operation: format!("{}: {} ÷ {}", operation, a, b),
        }
        .into());
    }
    a.checked_div(b).ok_or_else(|| {
        CalculationError::Overflow {
            operation: format!("{}: {} ÷ {}", operation, a, b),
        }
        .into()
    })
}

/// Truncate toward zero to `decimals` places (never rounds up)
///
/// Token precisions above what `Decimal` can hold are clamped.
pub fn truncate_to_decimals(amount: Decimal, decimals: u32) -> Decimal {
    amount.round_dp_with_strategy(decimals.min(MAX_DECIMAL_SCALE), RoundingStrategy::ToZero)
}

/// Truncate and pin the scale to `decimals`, so the value renders with
/// exactly that many fractional digits
pub fn to_fixed_decimal(amount: Decimal, decimals: u32) -> Decimal {
    let scale = decimals.min(MAX_DECIMAL_SCALE);
    let mut fixed = truncate_to_decimals(amount, scale);
    fixed.rescale(scale);
    fixed
}

/// ## Examples
/// - `to_fixed(2500.123456789, 6)` → `"2500.123456"`
/// - `to_fixed(0.003, 6)` → `"0.003000"`
pub fn to_fixed(amount: Decimal, decimals: u32) -> String {
    to_fixed_decimal(amount, decimals).to_string()
}

/// Protocol fee: `amount × 0.003`, truncated to 6 decimal places
pub fn calculate_fee(amount: Decimal) -> Result<Decimal> {
    let raw = checked_multiply(amount, SWAP_FEE_RATE, "swap fee")?;
    Ok(to_fixed_decimal(raw, FEE_DECIMALS))
}

/// Modeled price impact: `min(amount / 1_000_000 × 100, 5)`, floored at 0
pub fn price_impact_percent(amount: Decimal) -> Decimal {
    if amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    // amount is bounded by MAX_TRANSACTION_AMOUNT in practice; saturate otherwise
    let impact = (amount / PRICE_IMPACT_DIVISOR)
        .checked_mul(dec!(100))
        .unwrap_or(MAX_PRICE_IMPACT_PERCENT);
    impact.min(MAX_PRICE_IMPACT_PERCENT)
}

/// Apply a percentage tolerance: `value × (1 − tolerance / 100)`
///
/// Tolerances are clamped to [0, 100] so the result stays within [0, value].
pub fn apply_tolerance(value: Decimal, tolerance_percent: Decimal) -> Decimal {
    let tolerance = tolerance_percent.max(Decimal::ZERO).min(dec!(100));
    value * (Decimal::ONE - tolerance / dec!(100))
}

// ===== Tests =====
