//! # Security Gate
//!
//! Input hygiene and policy checks applied before any swap is quoted.
//!
//! ## Checks
//! - `sanitize`: strip an amount string down to digits and one decimal point
//! - `validate_amount`: anti-dust floor and large-transfer ceiling
//! - `slippage_protection`: relative deviation against the configured maximum
//! - `detect_suspicious`: advisory flag for bursts of identical amounts
//! - `generate_id`: time-ordered, collision-resistant identifiers
//!
//! Rate limiting lives in [`crate::infrastructure::rate_limiting`].

use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::infrastructure::config::SecurityConfig;
use crate::infrastructure::constants::{RATE_LIMIT_WINDOW_NANOS, SUSPICIOUS_REPEAT_THRESHOLD};
use crate::infrastructure::errors::{Result, ValidationError};
use crate::infrastructure::math::{checked_divide, checked_multiply};
use crate::infrastructure::time::NANOS_PER_MILLI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlippageCheck {
    pub safe: bool,
    pub slippage_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspicionReport {
    pub flagged: bool,
    pub reason: Option<String>,
}

impl SuspicionReport {
    fn clear() -> Self {
        Self { flagged: false, reason: None }
    }
}

/// One past transaction as seen by the suspicious-activity heuristic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivitySample {
    pub amount: Decimal,
    pub timestamp: u64,
}

#[derive(Debug, Clone)]
pub struct SecurityGate {
    config: SecurityConfig,
}

impl SecurityGate {
    pub fn new(config: SecurityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SecurityConfig {
        &self.config
    }

    /// Keep digits and the first decimal point; drop everything else
    pub fn sanitize(input: &str) -> String {
        let mut seen_point = false;
        input
            .chars()
            .filter(|c| match c {
                '0'..='9' => true,
                '.' if !seen_point => {
                    seen_point = true;
                    true
                }
                _ => false,
            })
            .collect()
    }

    /// Parse an already-sanitized amount string
    pub fn parse_amount(sanitized: &str) -> Result<Decimal> {
        if sanitized.is_empty() || sanitized == "." {
            return Err(ValidationError::InvalidAmount {
                input: sanitized.to_string(),
                reason: "no numeric value".to_string(),
            }
            .into());
        }

        sanitized.parse::<Decimal>().map_err(|e| {
            ValidationError::InvalidAmount {
                input: sanitized.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    pub fn validate_amount(&self, amount: Decimal) -> Result<()> {
        if amount < self.config.min_transaction_amount {
            return Err(ValidationError::AmountBelowMinimum {
                amount,
                minimum: self.config.min_transaction_amount,
            }
            .into());
        }

        if amount > self.config.max_transaction_amount {
            return Err(ValidationError::AmountAboveMaximum {
                amount,
                maximum: self.config.max_transaction_amount,
            }
            .into());
        }

        Ok(())
    }

    /// `|expected - actual| / expected * 100`, safe iff within the configured maximum.
    ///
    /// A zero `expected` is a `DivisionByZero` calculation error.
    pub fn slippage_protection(&self, expected: Decimal, actual: Decimal) -> Result<SlippageCheck> {
        let deviation = checked_divide(expected - actual, expected, "slippage")?;
        let slippage_percent = checked_multiply(deviation.abs(), dec!(100), "slippage percent")?;
        Ok(SlippageCheck {
            safe: slippage_percent <= self.config.max_slippage_percent,
            slippage_percent,
        })
    }

    /// Flag more than five same-amount transactions inside the last minute.
    /// Advisory only.
    pub fn detect_suspicious(history: &[ActivitySample], now: u64) -> SuspicionReport {
        let recent: Vec<&ActivitySample> = history
            .iter()
            .filter(|tx| now.saturating_sub(tx.timestamp) < RATE_LIMIT_WINDOW_NANOS)
            .collect();

        if recent.len() <= SUSPICIOUS_REPEAT_THRESHOLD {
            return SuspicionReport::clear();
        }

        let first = recent[0].amount.normalize();
        if recent.iter().all(|tx| tx.amount.normalize() == first) {
            return SuspicionReport {
                flagged: true,
                reason: Some(
                    "Unusual pattern detected: Multiple identical transactions in short time".to_string(),
                ),
            };
        }

        SuspicionReport::clear()
    }

    /// `tx_<millis>_<16 hex>`
    pub fn generate_id(now_nanos: u64) -> String {
        generate_secure_id("tx", now_nanos)
    }
}

/// `<prefix>_<millis>_<16 hex chars of OS-seeded randomness>`
pub fn generate_secure_id(prefix: &str, now_nanos: u64) -> String {
    let suffix: u64 = rand::thread_rng().gen();
    format!("{}_{}_{:016x}", prefix, now_nanos / NANOS_PER_MILLI, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::errors::{CalculationError, SwapGateError};
    use std::collections::HashSet;

    const SEC: u64 = 1_000_000_000;
    const NOW: u64 = 1_700_000_000 * SEC;

    fn gate() -> SecurityGate {
        SecurityGate::new(SecurityConfig::default())
    }

    #[test]
    fn test_sanitize_strips_and_collapses() {
        assert_eq!(SecurityGate::sanitize("1,234.56"), "1234.56");
        assert_eq!(SecurityGate::sanitize("1.2.3.4"), "1.234");
        assert_eq!(SecurityGate::sanitize(" $12abc "), "12");
        assert_eq!(SecurityGate::sanitize("-5e3"), "53");
        assert_eq!(SecurityGate::sanitize("..5"), ".5");
        assert_eq!(SecurityGate::sanitize(""), "");
        assert_eq!(SecurityGate::sanitize("１２"), "");
    }

    #[test]
    fn test_sanitize_idempotent() {
        let inputs = ["1.2.3", "abc", "0..0.1", "  42 ", "3.14159", "..", "9e-7", "1_000.5.5x"];
        for input in inputs {
            let once = SecurityGate::sanitize(input);
            assert_eq!(SecurityGate::sanitize(&once), once, "not idempotent for {:?}", input);
            assert!(once.chars().all(|c| c.is_ascii_digit() || c == '.'));
            assert!(once.matches('.').count() <= 1);
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(SecurityGate::parse_amount("1.5").unwrap(), dec!(1.5));
        assert_eq!(SecurityGate::parse_amount(".5").unwrap(), dec!(0.5));
        assert_eq!(SecurityGate::parse_amount("7.").unwrap(), dec!(7));
        assert!(matches!(
            SecurityGate::parse_amount(""),
            Err(SwapGateError::Validation(ValidationError::InvalidAmount { .. }))
        ));
        assert!(SecurityGate::parse_amount(".").is_err());
    }

    #[test]
    fn test_validate_amount_bounds() {
        let gate = gate();
        assert!(gate.validate_amount(dec!(0.0001)).is_ok());
        assert!(gate.validate_amount(dec!(1)).is_ok());
        assert!(gate.validate_amount(dec!(1000000)).is_ok());

        let below = gate.validate_amount(dec!(0.00001)).unwrap_err();
        assert!(below.to_string().contains("Minimum: 0.0001"));

        let above = gate.validate_amount(dec!(1000000.01)).unwrap_err();
        assert!(matches!(above, SwapGateError::Validation(ValidationError::AmountAboveMaximum { .. })));
        assert!(above.to_string().contains("1000000"));
    }

    #[test]
    fn test_validate_amount_uses_configured_bounds() {
        let gate = SecurityGate::new(SecurityConfig {
            min_transaction_amount: dec!(10),
            max_transaction_amount: dec!(20),
            ..SecurityConfig::default()
        });
        assert!(gate.validate_amount(dec!(9.99)).is_err());
        assert!(gate.validate_amount(dec!(15)).is_ok());
        assert!(gate.validate_amount(dec!(20.01)).is_err());
    }

    #[test]
    fn test_slippage_protection() {
        let gate = gate();

        let check = gate.slippage_protection(dec!(2500), dec!(2487.5)).unwrap();
        assert!(check.safe);
        assert_eq!(check.slippage_percent, dec!(0.5));

        let check = gate.slippage_protection(dec!(100), dec!(95)).unwrap();
        assert!(check.safe, "exactly at the limit is safe");

        let check = gate.slippage_protection(dec!(100), dec!(94)).unwrap();
        assert!(!check.safe);
        assert_eq!(check.slippage_percent, dec!(6));

        // Positive deviation counts too
        let check = gate.slippage_protection(dec!(100), dec!(110)).unwrap();
        assert!(!check.safe);
    }

    #[test]
    fn test_slippage_against_zero_expected() {
        let result = gate().slippage_protection(Decimal::ZERO, dec!(1));
        assert!(matches!(
            result,
            Err(SwapGateError::Calculation(CalculationError::DivisionByZero { .. }))
        ));
    }

    #[test]
    fn test_detect_suspicious_identical_burst() {
        let samples: Vec<ActivitySample> = (0..6)
            .map(|i| ActivitySample { amount: dec!(1.0), timestamp: NOW - i * SEC })
            .collect();
        let report = SecurityGate::detect_suspicious(&samples, NOW);
        assert!(report.flagged);
        assert!(report.reason.unwrap().contains("identical"));
    }

    #[test]
    fn test_detect_suspicious_needs_more_than_five() {
        let samples: Vec<ActivitySample> = (0..5)
            .map(|i| ActivitySample { amount: dec!(1), timestamp: NOW - i * SEC })
            .collect();
        assert!(!SecurityGate::detect_suspicious(&samples, NOW).flagged);
    }

    #[test]
    fn test_detect_suspicious_ignores_old_and_varied() {
        let mut samples: Vec<ActivitySample> = (0..6)
            .map(|i| ActivitySample { amount: dec!(1), timestamp: NOW - 120 * SEC - i })
            .collect();
        assert!(!SecurityGate::detect_suspicious(&samples, NOW).flagged);

        samples = (0..8)
            .map(|i| ActivitySample { amount: Decimal::from(i), timestamp: NOW - i as u64 })
            .collect();
        assert!(!SecurityGate::detect_suspicious(&samples, NOW).flagged);

        // Same value at different scales is still identical
        samples = (0..6)
            .map(|i| ActivitySample {
                amount: if i % 2 == 0 { dec!(1.0) } else { dec!(1.000) },
                timestamp: NOW - i as u64,
            })
            .collect();
        assert!(SecurityGate::detect_suspicious(&samples, NOW).flagged);
    }

    #[test]
    fn test_generate_id_format_and_uniqueness() {
        let id = SecurityGate::generate_id(NOW);
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "tx");
        assert_eq!(parts[1], (NOW / 1_000_000).to_string());
        assert_eq!(parts[2].len(), 16);

        let ids: HashSet<String> = (0..10_000).map(|_| SecurityGate::generate_id(NOW)).collect();
        assert_eq!(ids.len(), 10_000, "ids collided within one millisecond");
    }
}
