//! # Settlement Module
//!
//! Simulated on-chain settlement. Waits out a confirmation delay, then issues
//! a settlement reference and a resource-cost figure.
//!
//! ## Timing
//! - The delay is injected through [`SettlementDelay`] so tests never sleep
//! - Every settlement is raced against the transaction timeout; if the timeout
//!   wins, the attempt fails with `SettlementTimeout` and nothing is issued
//! - When both complete in the same poll, settlement wins

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{select, Either};
use log::{info, warn};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::infrastructure::config::SettlementConfig;
use crate::infrastructure::constants::{MAX_RESOURCE_COST, MIN_RESOURCE_COST};
use crate::infrastructure::errors::{Result, TradingError};

/// Source of settlement and timeout waits
#[async_trait]
pub trait SettlementDelay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Real timer on the tokio runtime
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl SettlementDelay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Completes immediately; for tests and dry runs
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateDelay;

#[async_trait]
impl SettlementDelay for ImmediateDelay {
    async fn wait(&self, _duration: Duration) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReceipt {
    pub reference: String,
    pub resource_cost: u64,
}

pub struct Settlement {
    delay: Arc<dyn SettlementDelay>,
    confirmation_delay: Duration,
    timeout: Duration,
}

impl Settlement {
    pub fn new(delay: Arc<dyn SettlementDelay>, config: &SettlementConfig, timeout: Duration) -> Self {
        Self {
            delay,
            confirmation_delay: config.delay,
            timeout,
        }
    }

    /// Wait for simulated confirmation, bounded by the transaction timeout
    pub async fn settle(&self, label: &str) -> Result<SettlementReceipt> {
        let confirmation = self.delay.wait(self.confirmation_delay);
        let deadline = self.delay.wait(self.timeout);

        match select(confirmation, deadline).await {
            Either::Left(((), _)) => {
                let receipt = issue_receipt();
                info!(
                    "✅ Settled {}: reference {} (resource cost {})",
                    label, receipt.reference, receipt.resource_cost
                );
                Ok(receipt)
            }
            Either::Right(((), _)) => {
                warn!("❌ Settlement of {} timed out after {:?}", label, self.timeout);
                Err(TradingError::SettlementTimeout { timeout_secs: self.timeout.as_secs() }.into())
            }
        }
    }
}

/// `0x` + 64 hex reference and a cost in [50_000, 150_000)
fn issue_receipt() -> SettlementReceipt {
    let mut rng = rand::thread_rng();
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes);

    SettlementReceipt {
        reference: format!("0x{}", hex::encode(bytes)),
        resource_cost: rng.gen_range(MIN_RESOURCE_COST..MAX_RESOURCE_COST),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::errors::SwapGateError;
    use futures::executor::block_on;

    /// Completes waits up to `limit`; longer waits never complete
    struct CappedDelay {
        limit: Duration,
    }

    #[async_trait]
    impl SettlementDelay for CappedDelay {
        async fn wait(&self, duration: Duration) {
            if duration > self.limit {
                futures::future::pending::<()>().await;
            }
        }
    }

    fn config(delay_secs: u64) -> SettlementConfig {
        SettlementConfig { delay: Duration::from_secs(delay_secs) }
    }

    #[test]
    fn test_receipt_format() {
        let settlement = Settlement::new(Arc::new(ImmediateDelay), &config(2), Duration::from_secs(300));
        let receipt = block_on(settlement.settle("ETH_USDC")).unwrap();

        assert!(receipt.reference.starts_with("0x"));
        assert_eq!(receipt.reference.len(), 66);
        assert!(hex::decode(&receipt.reference[2..]).is_ok());
        assert!((MIN_RESOURCE_COST..MAX_RESOURCE_COST).contains(&receipt.resource_cost));
    }

    #[test]
    fn test_settlement_wins_tie() {
        // Both waits complete immediately
        let settlement = Settlement::new(Arc::new(ImmediateDelay), &config(2), Duration::ZERO);
        assert!(block_on(settlement.settle("ETH_USDC")).is_ok());
    }

    #[test]
    fn test_timeout_when_confirmation_never_arrives() {
        let delay = Arc::new(CappedDelay { limit: Duration::from_secs(5) });
        let settlement = Settlement::new(delay, &config(10), Duration::from_secs(5));

        let result = block_on(settlement.settle("ETH_USDC"));
        assert!(matches!(
            result,
            Err(SwapGateError::Trading(TradingError::SettlementTimeout { timeout_secs: 5 }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_delay_settles_before_timeout() {
        let settlement = Settlement::new(Arc::new(TokioDelay), &config(2), Duration::from_secs(300));
        let started = tokio::time::Instant::now();
        assert!(settlement.settle("ETH_USDC").await.is_ok());
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_delay_times_out() {
        let settlement = Settlement::new(Arc::new(TokioDelay), &config(10), Duration::from_secs(3));
        let result = settlement.settle("ETH_USDC").await;
        assert!(matches!(
            result,
            Err(SwapGateError::Trading(TradingError::SettlementTimeout { timeout_secs: 3 }))
        ));
    }
}
