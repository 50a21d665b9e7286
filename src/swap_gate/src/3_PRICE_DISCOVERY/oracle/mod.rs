//! # Price Oracle
//!
//! Quotes exchange rates between token symbols. A quote never fails: the
//! resolution order is cache, live feed, fallback table, identity rate.
//!
//! ## Resolution
//! 1. Cache entry younger than the freshness window → `cached`
//! 2. Live feed returns a positive rate → `live`
//! 3. Fallback table has the pair → `fallback`
//! 4. Otherwise rate 1 → `fallback`, with a warning
//!
//! Live and fallback resolutions are both cached. The cache is shared across
//! requesters and lives in a concurrent map.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::fallback::FallbackRates;
use crate::infrastructure::config::OracleConfig;
use crate::infrastructure::errors::{Result, SwapGateError};
use crate::_4_TRADING_EXECUTION::calculate_min_receive;
use crate::infrastructure::math::{checked_multiply, price_impact_percent, to_fixed_decimal};
use crate::infrastructure::time::Clock;
use crate::types::{PriceQuote, QuoteSource, SwapResult, Token};

/// Live rate source. `Ok(None)` means the feed has no rate for the pair.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<Option<Decimal>>;
}

/// Fixed in-memory rates
#[derive(Debug, Clone, Default)]
pub struct StaticPriceFeed {
    rates: HashMap<(String, String), Decimal>,
}

impl StaticPriceFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, from: &str, to: &str, rate: Decimal) -> Self {
        self.rates.insert((from.to_string(), to.to_string()), rate);
        self
    }
}

#[async_trait]
impl PriceFeed for StaticPriceFeed {
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<Option<Decimal>> {
        Ok(self.rates.get(&(from.to_string(), to.to_string())).copied())
    }
}

/// Feed that is always down
#[derive(Debug, Clone, Default)]
pub struct UnavailablePriceFeed;

#[async_trait]
impl PriceFeed for UnavailablePriceFeed {
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<Option<Decimal>> {
        Err(SwapGateError::Other(format!("price feed unavailable for {}_{}", from, to)))
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedRate {
    rate: Decimal,
    fetched_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
}

pub struct PriceOracle {
    cache: DashMap<String, CachedRate>,
    feed: Arc<dyn PriceFeed>,
    fallback: FallbackRates,
    clock: Arc<dyn Clock>,
    cache_duration: Duration,
}

impl PriceOracle {
    pub fn new(
        feed: Arc<dyn PriceFeed>,
        fallback: FallbackRates,
        clock: Arc<dyn Clock>,
        config: &OracleConfig,
    ) -> Self {
        Self {
            cache: DashMap::new(),
            feed,
            fallback,
            clock,
            cache_duration: config.cache_duration,
        }
    }

    fn cache_key(from: &str, to: &str) -> String {
        format!("{}_{}", from, to)
    }

    /// Always returns a positive rate
    pub async fn quote(&self, from: &Token, to: &Token) -> PriceQuote {
        let key = Self::cache_key(&from.symbol, &to.symbol);
        let now = self.clock.now_nanos();

        if let Some(cached) = self.fresh_entry(&key, now) {
            return PriceQuote {
                from: from.symbol.clone(),
                to: to.symbol.clone(),
                rate: cached.rate,
                timestamp: cached.fetched_at,
                source: QuoteSource::Cached,
            };
        }

        let (rate, source) = match self.feed.fetch_rate(&from.symbol, &to.symbol).await {
            Ok(Some(rate)) if rate > Decimal::ZERO => (rate, QuoteSource::Live),
            Ok(Some(rate)) => {
                warn!("⚠️ Live feed returned non-positive rate {} for {}, using fallback", rate, key);
                (self.fallback_rate(&from.symbol, &to.symbol), QuoteSource::Fallback)
            }
            Ok(None) => (self.fallback_rate(&from.symbol, &to.symbol), QuoteSource::Fallback),
            Err(e) => {
                warn!("⚠️ Price feed failed for {}, using fallback rates: {}", key, e);
                (self.fallback_rate(&from.symbol, &to.symbol), QuoteSource::Fallback)
            }
        };

        self.cache.insert(key, CachedRate { rate, fetched_at: now });
        debug!("💱 {} → {} rate {} ({})", from.symbol, to.symbol, rate, source.as_str());

        PriceQuote {
            from: from.symbol.clone(),
            to: to.symbol.clone(),
            rate,
            timestamp: now,
            source,
        }
    }

    /// Expected and minimum output for `amount` of `from`
    ///
    /// ## Returns
    /// - Zeroed result for `amount <= 0` (positivity is validated upstream)
    /// - Otherwise expected = `amount × rate` truncated to `to.decimals`,
    ///   minimum = expected less `slippage_tolerance_percent`, impact capped at 5%
    pub async fn calculate_swap(
        &self,
        from: &Token,
        to: &Token,
        amount: Decimal,
        slippage_tolerance_percent: Decimal,
    ) -> Result<SwapResult> {
        if amount <= Decimal::ZERO {
            return Ok(SwapResult::zeroed());
        }

        let quote = self.quote(from, to).await;
        let raw_expected = checked_multiply(amount, quote.rate, "expected output")?;
        let expected_amount = to_fixed_decimal(raw_expected, to.decimals);
        let minimum_amount =
            calculate_min_receive(expected_amount, slippage_tolerance_percent, to.decimals);

        Ok(SwapResult {
            expected_amount,
            minimum_amount,
            price_impact: price_impact_percent(amount),
            quote: Some(quote),
        })
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Entry count and keys (`FROM_TO`), sorted
    pub fn cache_stats(&self) -> CacheStats {
        let mut keys: Vec<String> = self.cache.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        CacheStats { size: keys.len(), keys }
    }

    fn fresh_entry(&self, key: &str, now: u64) -> Option<CachedRate> {
        let entry = self.cache.get(key)?;
        let age = now.saturating_sub(entry.fetched_at);
        if (age as u128) < self.cache_duration.as_nanos() {
            Some(*entry)
        } else {
            None
        }
    }

    fn fallback_rate(&self, from: &str, to: &str) -> Decimal {
        match self.fallback.get(from, to) {
            Some(rate) => rate,
            None => {
                warn!("⚠️ No rate found for {} -> {}, defaulting to 1:1", from, to);
                Decimal::ONE
            }
        }
    }
}
