//! Diagnostics module - Gate state formatted for operators
//!
//! Thin read-only views over the engine's collaborators. Each call reads
//! current state; nothing is cached here.

use serde::{Deserialize, Serialize};

use crate::_1_CRITICAL_OPERATIONS::{PendingApproval, SwapEngine};
use crate::_3_PRICE_DISCOVERY::CacheStats;
use crate::infrastructure::errors::{AppError, Result};
use crate::infrastructure::rate_limiting::RateLimitStatus;

/// Everything an operator dashboard shows for one requester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsSnapshot {
    pub requester: String,
    pub rate_limit: RateLimitStatus,
    pub cache: CacheStats,
    pub pending_approvals: Vec<PendingApproval>,
    pub recent_errors: Vec<AppError>,
    pub timestamp: u64,
}

/// Remaining admissions and time until the requester's window frees a slot
pub fn rate_limit_status(engine: &SwapEngine, requester: &str) -> RateLimitStatus {
    engine.rate_limit_status(requester)
}

pub fn cache_stats(engine: &SwapEngine) -> CacheStats {
    engine.oracle().cache_stats()
}

/// Unexecuted approvals, newest first
pub fn pending_approvals(engine: &SwapEngine) -> Result<Vec<PendingApproval>> {
    engine.approvals().pending_approvals()
}

pub fn recent_errors(engine: &SwapEngine, count: usize) -> Vec<AppError> {
    engine.errors().recent(count)
}

pub fn clear_error_history(engine: &SwapEngine) {
    engine.errors().clear_history();
}

/// Collect every view at once
///
/// Errors are capped at the default recent count (10).
///
/// IMPORTANT: Propagates multisig store failures instead of returning an
/// empty approval list, so a poisoned store is visible to the caller
pub fn snapshot(engine: &SwapEngine, requester: &str) -> Result<DiagnosticsSnapshot> {
    Ok(DiagnosticsSnapshot {
        requester: requester.to_string(),
        rate_limit: rate_limit_status(engine, requester),
        cache: cache_stats(engine),
        pending_approvals: pending_approvals(engine)?,
        recent_errors: engine.errors().recent_default(),
        timestamp: engine.now_nanos(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::GateConfig;
    use crate::infrastructure::errors::ErrorCategory;
    use crate::infrastructure::time::ManualClock;
    use crate::types::WalletSession;
    use crate::_4_TRADING_EXECUTION::ImmediateDelay;
    use futures::executor::block_on;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::time::Duration;

    const T0: u64 = 1_700_000_000_000_000_000;
    const ALICE: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    fn engine() -> (Arc<ManualClock>, SwapEngine) {
        let clock = Arc::new(ManualClock::new(T0));
        let engine = SwapEngine::builder(GateConfig::default())
            .with_clock(clock.clone())
            .with_settlement_delay(Arc::new(ImmediateDelay))
            .build()
            .unwrap();
        (clock, engine)
    }

    #[test]
    fn test_fresh_engine_is_quiet() {
        let (_, engine) = engine();
        let snap = snapshot(&engine, ALICE).unwrap();

        assert_eq!(snap.rate_limit.remaining, 10);
        assert_eq!(snap.rate_limit.time_until_reset, Duration::ZERO);
        assert_eq!(snap.cache.size, 0);
        assert!(snap.pending_approvals.is_empty());
        assert!(snap.recent_errors.is_empty());
        assert_eq!(snap.timestamp, T0);
    }

    #[test]
    fn test_views_follow_swaps() {
        let (clock, engine) = engine();
        let wallet = WalletSession::connected(ALICE);

        block_on(engine.swap("ETH", "USDC", "1.0", &wallet)).unwrap();
        clock.advance(Duration::from_secs(15));
        block_on(engine.swap("ETH", "APOM", "1.0", &wallet)).unwrap();

        let status = rate_limit_status(&engine, ALICE);
        assert_eq!(status.remaining, 8);
        assert_eq!(status.time_until_reset, Duration::from_secs(45));

        assert_eq!(cache_stats(&engine).keys, vec!["ETH_APOM", "ETH_USDC"]);
    }

    #[test]
    fn test_error_history_views() {
        let (_, engine) = engine();
        let wallet = WalletSession::disconnected();

        for _ in 0..3 {
            assert!(block_on(engine.swap("ETH", "USDC", "1.0", &wallet)).is_err());
        }

        let errors = recent_errors(&engine, 2);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.category == ErrorCategory::WalletConnection));

        clear_error_history(&engine);
        assert!(recent_errors(&engine, 10).is_empty());
    }

    #[test]
    fn test_pending_approvals_visible() {
        let (_, engine) = engine();
        let target = "0x9999999999999999999999999999999999999999";
        engine.approvals().create(target, dec!(50000), Vec::new()).unwrap();

        let pending = pending_approvals(&engine).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].value, dec!(50000));
    }
}
