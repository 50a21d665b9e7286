//! Validation for swap requests

use rust_decimal::Decimal;

use crate::infrastructure::errors::{Result, ValidationError};
use crate::infrastructure::math::to_fixed_decimal;
use crate::infrastructure::security::SecurityGate;
use crate::types::{Token, TokenRegistry};

/// Sanitize, parse and bound-check a user-typed amount
///
/// Digits beyond the source token's `decimals` are truncated before the
/// bounds check, so the returned value is exactly what gets quoted, charged
/// and recorded.
pub fn validate_swap_amount(gate: &SecurityGate, raw_amount: &str, decimals: u32) -> Result<Decimal> {
    let sanitized = SecurityGate::sanitize(raw_amount);
    let parsed = SecurityGate::parse_amount(&sanitized)?;
    let amount = to_fixed_decimal(parsed, decimals);
    gate.validate_amount(amount)?;
    Ok(amount)
}

/// Resolve both symbols and reject swapping a token for itself
pub fn validate_swap_pair(registry: &TokenRegistry, from: &str, to: &str) -> Result<(Token, Token)> {
    let from_token = registry.require(from)?;
    let to_token = registry.require(to)?;

    if from_token.symbol == to_token.symbol {
        return Err(ValidationError::SameToken { symbol: from_token.symbol.clone() }.into());
    }

    Ok((from_token.clone(), to_token.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::SecurityConfig;
    use crate::infrastructure::errors::SwapGateError;
    use rust_decimal_macros::dec;

    fn gate() -> SecurityGate {
        SecurityGate::new(SecurityConfig::default())
    }

    #[test]
    fn test_amount_sanitized_before_validation() {
        assert_eq!(validate_swap_amount(&gate(), " 1,000.5 ETH", 18).unwrap(), dec!(1000.5));
        assert_eq!(validate_swap_amount(&gate(), "1.2.3", 18).unwrap(), dec!(1.23));
    }

    #[test]
    fn test_amount_below_minimum() {
        let err = validate_swap_amount(&gate(), "0.00001", 18).unwrap_err();
        assert!(matches!(err, SwapGateError::Validation(ValidationError::AmountBelowMinimum { .. })));
    }

    #[test]
    fn test_amount_with_no_digits() {
        let err = validate_swap_amount(&gate(), "abc", 18).unwrap_err();
        assert!(matches!(err, SwapGateError::Validation(ValidationError::InvalidAmount { .. })));
    }

    #[test]
    fn test_negative_sign_is_stripped() {
        // "-5" sanitizes to "5"
        assert_eq!(validate_swap_amount(&gate(), "-5", 18).unwrap(), dec!(5));
    }

    #[test]
    fn test_amount_truncated_to_token_decimals() {
        let amount = validate_swap_amount(&gate(), "1.1234567", 6).unwrap();
        assert_eq!(amount, dec!(1.123456));
        assert_eq!(amount.to_string(), "1.123456");

        assert_eq!(validate_swap_amount(&gate(), "7.9", 0).unwrap(), dec!(7));
    }

    #[test]
    fn test_amount_truncated_below_minimum_rejected() {
        // 0.5 of a whole-unit token truncates to 0
        let err = validate_swap_amount(&gate(), "0.5", 0).unwrap_err();
        assert!(matches!(err, SwapGateError::Validation(ValidationError::AmountBelowMinimum { .. })));

        // 0.00019 at 4 decimals is 0.0001, still at the floor
        assert_eq!(validate_swap_amount(&gate(), "0.00019", 4).unwrap(), dec!(0.0001));
        assert!(validate_swap_amount(&gate(), "0.00019", 3).is_err());
    }

    #[test]
    fn test_pair_validation() {
        let registry = TokenRegistry::with_defaults();
        let (from, to) = validate_swap_pair(&registry, "ETH", "USDC").unwrap();
        assert_eq!(from.symbol, "ETH");
        assert_eq!(to.decimals, 6);

        assert!(matches!(
            validate_swap_pair(&registry, "ETH", "ETH"),
            Err(SwapGateError::Validation(ValidationError::SameToken { .. }))
        ));
        assert!(matches!(
            validate_swap_pair(&registry, "ETH", "DOGE"),
            Err(SwapGateError::Validation(ValidationError::UnknownToken { .. }))
        ));
    }
}
