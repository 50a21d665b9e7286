//! # Slippage Protection Module
//!
//! Calculates slippage limits and validates quoted swap outputs
//! to ensure trades settle within acceptable price ranges.
//!
//! ## Key Functions
//! - `calculate_min_receive`: Get minimum acceptable output amount
//! - `validate_swap_result`: Verify slippage is within the configured maximum
//!
//! ## Safety Checks
//! - Zero expected amounts are rejected before any division
//! - Slippage is measured in both directions (`|expected - actual|`)
//! - Slippage must not exceed the gate's `max_slippage_percent`

use log::{info, warn};
use rust_decimal::Decimal;

use crate::infrastructure::errors::{Result, TradingError};
use crate::infrastructure::math::{apply_tolerance, to_fixed_decimal};
use crate::infrastructure::security::{SecurityGate, SlippageCheck};

/// Calculate minimum acceptable receive amount based on slippage tolerance
///
/// ## Example
/// - Expected: 100 tokens
/// - Tolerance: 2 (percent)
/// - Result: 98 tokens (will accept down to 98)
///
/// ## Edge Cases
/// - Returns 0 if expected amount is 0 (will be caught by validation)
/// - Truncated to `decimals` so the result never exceeds the true minimum
pub fn calculate_min_receive(expected_amount: Decimal, tolerance_percent: Decimal, decimals: u32) -> Decimal {
    to_fixed_decimal(apply_tolerance(expected_amount, tolerance_percent), decimals)
}

/// Validate that a quoted output meets slippage requirements
///
/// ## Parameters
/// - `gate`: Supplies the configured maximum slippage
/// - `pair`: `FROM_TO` label for errors and logs
/// - `expected`: Output the oracle quoted
/// - `actual`: Output the trade is allowed to settle at
///
/// ## Returns
/// - `Ok(SlippageCheck)` if slippage is acceptable
/// - `Err(TradingError::ZeroExpectedOutput)` if nothing was quoted
/// - `Err(TradingError::SlippageExceeded)` if slippage too high
pub fn validate_swap_result(
    gate: &SecurityGate,
    pair: &str,
    expected: Decimal,
    actual: Decimal,
) -> Result<SlippageCheck> {
    // Zero expected amount is invalid
    if expected.is_zero() {
        return Err(TradingError::ZeroExpectedOutput { pair: pair.to_string() }.into());
    }

    let check = gate.slippage_protection(expected, actual)?;

    if !check.safe {
        warn!(
            "❌ Slippage too high for {}: {}% (max: {}%)",
            pair,
            check.slippage_percent,
            gate.config().max_slippage_percent
        );
        return Err(TradingError::SlippageExceeded {
            expected,
            minimum: actual,
            slippage_percent: check.slippage_percent,
            max_allowed: gate.config().max_slippage_percent,
        }
        .into());
    }

    info!(
        "✅ Slippage acceptable for {}: {}% (max: {}%)",
        pair,
        check.slippage_percent.round_dp(4),
        gate.config().max_slippage_percent
    );

    Ok(check)
}
