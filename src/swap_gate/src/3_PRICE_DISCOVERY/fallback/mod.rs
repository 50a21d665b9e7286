//! Static fallback exchange rates
//!
//! Consulted when the live feed fails or has no rate for a pair. Owned by the
//! oracle instance, so tests can run with their own tables.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Clone, PartialEq)]
pub struct FallbackRates {
    rates: HashMap<(String, String), Decimal>,
}

impl Default for FallbackRates {
    /// ETH / USDC / APOM / MATIC cross rates
    fn default() -> Self {
        Self::empty()
            .with_rate("ETH", "USDC", dec!(2500))
            .with_rate("ETH", "APOM", dec!(1000))
            .with_rate("ETH", "MATIC", dec!(1562.5))
            .with_rate("USDC", "ETH", dec!(0.0004))
            .with_rate("USDC", "APOM", dec!(0.4))
            .with_rate("USDC", "MATIC", dec!(0.625))
            .with_rate("APOM", "ETH", dec!(0.001))
            .with_rate("APOM", "USDC", dec!(2.5))
            .with_rate("APOM", "MATIC", dec!(1.5625))
            .with_rate("MATIC", "ETH", dec!(0.00064))
            .with_rate("MATIC", "USDC", dec!(1.6))
            .with_rate("MATIC", "APOM", dec!(0.64))
    }
}

impl FallbackRates {
    pub fn empty() -> Self {
        Self { rates: HashMap::new() }
    }

    /// Builder form of [`FallbackRates::insert`]
    pub fn with_rate(mut self, from: &str, to: &str, rate: Decimal) -> Self {
        self.insert(from, to, rate);
        self
    }

    /// Non-positive rates are ignored
    pub fn insert(&mut self, from: &str, to: &str, rate: Decimal) {
        if rate > Decimal::ZERO {
            self.rates.insert((from.to_string(), to.to_string()), rate);
        }
    }

    pub fn get(&self, from: &str, to: &str) -> Option<Decimal> {
        self.rates.get(&(from.to_string(), to.to_string())).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let rates = FallbackRates::default();
        assert_eq!(rates.len(), 12);
        assert_eq!(rates.get("ETH", "USDC"), Some(dec!(2500)));
        assert_eq!(rates.get("MATIC", "ETH"), Some(dec!(0.00064)));
        assert_eq!(rates.get("ETH", "ETH"), None);
        assert_eq!(rates.get("ETH", "DOGE"), None);
    }

    #[test]
    fn test_directional_lookup() {
        let rates = FallbackRates::empty().with_rate("A", "B", dec!(2));
        assert_eq!(rates.get("A", "B"), Some(dec!(2)));
        assert_eq!(rates.get("B", "A"), None);
    }

    #[test]
    fn test_non_positive_rates_ignored() {
        let rates = FallbackRates::empty()
            .with_rate("A", "B", dec!(0))
            .with_rate("A", "C", dec!(-1));
        assert!(rates.is_empty());
    }
}
