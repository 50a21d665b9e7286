//! # Gate Configuration
//!
//! Environment-style configuration with defaults for everything. Values are
//! read once at construction; components own a copy of the section they need.
//!
//! ## Environment Variables
//! | Variable                              | Meaning                              |
//! |---------------------------------------|--------------------------------------|
//! | `SWAP_GATE_MAX_SLIPPAGE`              | max slippage percent                 |
//! | `SWAP_GATE_SLIPPAGE_TOLERANCE`        | quote slippage tolerance percent     |
//! | `SWAP_GATE_TRANSACTION_TIMEOUT_MS`    | settlement timeout                   |
//! | `SWAP_GATE_RATE_LIMIT_PER_MINUTE`     | requests-per-minute ceiling          |
//! | `SWAP_GATE_MIN_AMOUNT`                | minimum transaction amount           |
//! | `SWAP_GATE_MAX_AMOUNT`                | maximum transaction amount           |
//! | `SWAP_GATE_SIGNER_THRESHOLD`          | multisig N                           |
//! | `SWAP_GATE_SIGNERS`                   | comma-separated authorized signers   |
//! | `SWAP_GATE_TIMELOCK_SECS`             | multisig timelock                    |
//! | `SWAP_GATE_APPROVAL_VALUE_THRESHOLD`  | value at which approval is required  |
//! | `SWAP_GATE_PRICE_CACHE_MS`            | quote cache freshness window         |
//! | `SWAP_GATE_SETTLEMENT_DELAY_MS`       | simulated confirmation delay         |
//! | `SWAP_GATE_HISTORY_NAMESPACE`         | transaction store key prefix         |
//! | `SWAP_GATE_ERROR_HISTORY_SIZE`        | error ring buffer capacity           |

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::infrastructure::constants::*;
use crate::infrastructure::errors::{ConfigError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct SecurityConfig {
    pub max_slippage_percent: Decimal,
    pub slippage_tolerance_percent: Decimal,
    pub transaction_timeout: Duration,
    pub rate_limit_per_minute: usize,
    pub min_transaction_amount: Decimal,
    pub max_transaction_amount: Decimal,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_slippage_percent: MAX_SLIPPAGE_PERCENT,
            slippage_tolerance_percent: DEFAULT_SLIPPAGE_TOLERANCE_PERCENT,
            transaction_timeout: Duration::from_nanos(TRANSACTION_TIMEOUT_NANOS),
            rate_limit_per_minute: RATE_LIMIT_PER_MINUTE,
            min_transaction_amount: MIN_TRANSACTION_AMOUNT,
            max_transaction_amount: MAX_TRANSACTION_AMOUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiSigConfig {
    pub threshold: usize,
    pub signers: Vec<String>,
    pub timelock: Duration,
    /// Transfers at or above this value must go through approval. `None` disables the check.
    pub approval_value_threshold: Option<Decimal>,
}

impl Default for MultiSigConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIGNER_THRESHOLD,
            signers: Vec::new(),
            timelock: Duration::from_nanos(DEFAULT_TIMELOCK_NANOS),
            approval_value_threshold: None,
        }
    }
}

/// Partial update applied by `MultiSigApprovalStore::configure`
#[derive(Debug, Clone, Default)]
pub struct MultiSigConfigUpdate {
    pub threshold: Option<usize>,
    pub signers: Option<Vec<String>>,
    pub timelock: Option<Duration>,
    pub approval_value_threshold: Option<Option<Decimal>>,
}

impl MultiSigConfig {
    pub fn apply(&mut self, update: MultiSigConfigUpdate) {
        if let Some(threshold) = update.threshold {
            self.threshold = threshold;
        }
        if let Some(signers) = update.signers {
            self.signers = signers;
        }
        if let Some(timelock) = update.timelock {
            self.timelock = timelock;
        }
        if let Some(value) = update.approval_value_threshold {
            self.approval_value_threshold = value;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.threshold == 0 {
            return Err(inconsistent("signer threshold must be at least 1"));
        }
        if !self.signers.is_empty() && self.threshold > self.signers.len() {
            return Err(inconsistent(format!(
                "signer threshold {} exceeds signer count {}",
                self.threshold,
                self.signers.len()
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OracleConfig {
    pub cache_duration: Duration,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self { cache_duration: Duration::from_nanos(PRICE_CACHE_DURATION_NANOS) }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettlementConfig {
    pub delay: Duration,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self { delay: Duration::from_nanos(SETTLEMENT_DELAY_NANOS) }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GateConfig {
    pub security: SecurityConfig,
    pub multisig: MultiSigConfig,
    pub oracle: OracleConfig,
    pub settlement: SettlementConfig,
    pub history_namespace: String,
    pub error_history_size: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            security: SecurityConfig::default(),
            multisig: MultiSigConfig::default(),
            oracle: OracleConfig::default(),
            settlement: SettlementConfig::default(),
            history_namespace: TRANSACTION_HISTORY_NAMESPACE.to_string(),
            error_history_size: MAX_ERROR_HISTORY,
        }
    }
}

impl GateConfig {
    /// Defaults overlaid with `SWAP_GATE_*` process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each known key
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let security = &mut config.security;

        if let Some(v) = parse::<Decimal, _>(&lookup, "SWAP_GATE_MAX_SLIPPAGE")? {
            security.max_slippage_percent = v;
        }
        if let Some(v) = parse::<Decimal, _>(&lookup, "SWAP_GATE_SLIPPAGE_TOLERANCE")? {
            security.slippage_tolerance_percent = v;
        }
        if let Some(ms) = parse::<u64, _>(&lookup, "SWAP_GATE_TRANSACTION_TIMEOUT_MS")? {
            security.transaction_timeout = Duration::from_millis(ms);
        }
        if let Some(v) = parse::<usize, _>(&lookup, "SWAP_GATE_RATE_LIMIT_PER_MINUTE")? {
            security.rate_limit_per_minute = v;
        }
        if let Some(v) = parse::<Decimal, _>(&lookup, "SWAP_GATE_MIN_AMOUNT")? {
            security.min_transaction_amount = v;
        }
        if let Some(v) = parse::<Decimal, _>(&lookup, "SWAP_GATE_MAX_AMOUNT")? {
            security.max_transaction_amount = v;
        }

        let multisig = &mut config.multisig;
        if let Some(v) = parse::<usize, _>(&lookup, "SWAP_GATE_SIGNER_THRESHOLD")? {
            multisig.threshold = v;
        }
        if let Some(raw) = lookup("SWAP_GATE_SIGNERS") {
            multisig.signers = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(secs) = parse::<u64, _>(&lookup, "SWAP_GATE_TIMELOCK_SECS")? {
            multisig.timelock = Duration::from_secs(secs);
        }
        if let Some(v) = parse::<Decimal, _>(&lookup, "SWAP_GATE_APPROVAL_VALUE_THRESHOLD")? {
            multisig.approval_value_threshold = Some(v);
        }

        if let Some(ms) = parse::<u64, _>(&lookup, "SWAP_GATE_PRICE_CACHE_MS")? {
            config.oracle.cache_duration = Duration::from_millis(ms);
        }
        if let Some(ms) = parse::<u64, _>(&lookup, "SWAP_GATE_SETTLEMENT_DELAY_MS")? {
            config.settlement.delay = Duration::from_millis(ms);
        }
        if let Some(ns) = lookup("SWAP_GATE_HISTORY_NAMESPACE") {
            config.history_namespace = ns;
        }
        if let Some(v) = parse::<usize, _>(&lookup, "SWAP_GATE_ERROR_HISTORY_SIZE")? {
            config.error_history_size = v;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.security;
        if s.min_transaction_amount <= Decimal::ZERO {
            return Err(inconsistent("minimum transaction amount must be positive"));
        }
        if s.min_transaction_amount > s.max_transaction_amount {
            return Err(inconsistent(format!(
                "minimum amount {} exceeds maximum amount {}",
                s.min_transaction_amount, s.max_transaction_amount
            )));
        }
        if s.rate_limit_per_minute == 0 {
            return Err(inconsistent("rate limit ceiling must be at least 1"));
        }
        for (name, pct) in [
            ("max slippage", s.max_slippage_percent),
            ("slippage tolerance", s.slippage_tolerance_percent),
        ] {
            if pct < Decimal::ZERO || pct > dec!(100) {
                return Err(inconsistent(format!("{} must be within 0-100%, got {}%", name, pct)));
            }
        }
        if self.error_history_size == 0 {
            return Err(inconsistent("error history size must be at least 1"));
        }
        self.multisig.validate()
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }
            .into()
        }),
    }
}

fn inconsistent(reason: impl Into<String>) -> crate::infrastructure::errors::SwapGateError {
    ConfigError::Inconsistent { reason: reason.into() }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::errors::SwapGateError;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_empty() {
        let config = GateConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, GateConfig::default());
        assert_eq!(config.security.max_slippage_percent, dec!(5.0));
        assert_eq!(config.security.rate_limit_per_minute, 10);
        assert_eq!(config.security.min_transaction_amount, dec!(0.0001));
        assert_eq!(config.security.max_transaction_amount, dec!(1000000));
        assert_eq!(config.security.transaction_timeout, Duration::from_secs(300));
        assert_eq!(config.multisig.threshold, 2);
        assert_eq!(config.multisig.timelock, Duration::from_secs(3600));
    }

    #[test]
    fn test_overrides_applied() {
        let config = GateConfig::from_lookup(lookup_from(&[
            ("SWAP_GATE_MAX_SLIPPAGE", "2.5"),
            ("SWAP_GATE_RATE_LIMIT_PER_MINUTE", "3"),
            ("SWAP_GATE_MIN_AMOUNT", "0.01"),
            ("SWAP_GATE_SIGNERS", "alice, bob ,,carol"),
            ("SWAP_GATE_TIMELOCK_SECS", "60"),
            ("SWAP_GATE_APPROVAL_VALUE_THRESHOLD", "50000"),
        ]))
        .unwrap();

        assert_eq!(config.security.max_slippage_percent, dec!(2.5));
        assert_eq!(config.security.rate_limit_per_minute, 3);
        assert_eq!(config.security.min_transaction_amount, dec!(0.01));
        assert_eq!(config.multisig.signers, vec!["alice", "bob", "carol"]);
        assert_eq!(config.multisig.timelock, Duration::from_secs(60));
        assert_eq!(config.multisig.approval_value_threshold, Some(dec!(50000)));
    }

    #[test]
    fn test_malformed_value_rejected() {
        let result = GateConfig::from_lookup(lookup_from(&[("SWAP_GATE_RATE_LIMIT_PER_MINUTE", "ten")]));
        assert!(matches!(
            result,
            Err(SwapGateError::Config(ConfigError::InvalidValue { ref key, .. })) if key == "SWAP_GATE_RATE_LIMIT_PER_MINUTE"
        ));
    }

    #[test]
    fn test_min_above_max_rejected() {
        let result = GateConfig::from_lookup(lookup_from(&[
            ("SWAP_GATE_MIN_AMOUNT", "10"),
            ("SWAP_GATE_MAX_AMOUNT", "5"),
        ]));
        assert!(matches!(result, Err(SwapGateError::Config(ConfigError::Inconsistent { .. }))));
    }

    #[test]
    fn test_threshold_above_signer_count_rejected() {
        let result = GateConfig::from_lookup(lookup_from(&[
            ("SWAP_GATE_SIGNERS", "alice"),
            ("SWAP_GATE_SIGNER_THRESHOLD", "2"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_multisig_update() {
        let mut config = MultiSigConfig::default();
        config.apply(MultiSigConfigUpdate {
            signers: Some(vec!["a".into(), "b".into(), "c".into()]),
            threshold: Some(3),
            ..Default::default()
        });
        assert_eq!(config.threshold, 3);
        assert_eq!(config.signers.len(), 3);
        assert_eq!(config.timelock, Duration::from_secs(3600));
        assert!(config.validate().is_ok());
    }
}
