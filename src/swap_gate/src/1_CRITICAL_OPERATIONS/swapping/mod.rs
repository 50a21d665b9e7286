//! Swapping module - Orchestrates a swap from request to settled record
//! Critical operation: the only path that persists transaction records

pub mod swap_validator;


use std::sync::Arc;

use dashmap::DashMap;
use log::{info, warn};
use rust_decimal::Decimal;

use crate::_1_CRITICAL_OPERATIONS::multisig::MultiSigApprovalStore;
use crate::_2_CRITICAL_DATA::{KeyValueStore, MemoryKeyValueStore, TransactionHistory};
use crate::_3_PRICE_DISCOVERY::{FallbackRates, PriceFeed, PriceOracle, StaticPriceFeed};
use crate::_4_TRADING_EXECUTION::{validate_swap_result, Settlement, SettlementDelay, TokioDelay};
use crate::infrastructure::config::GateConfig;
use crate::infrastructure::errors::{ErrorClassifier, Result, SwapError, SwapGateError};
use crate::infrastructure::math::calculate_fee;
use crate::infrastructure::rate_limiting::{RateLimitStatus, RateLimiter};
use crate::infrastructure::reentrancy::{ActiveSwaps, SwapGuard};
use crate::infrastructure::security::SecurityGate;
use crate::infrastructure::time::{ceil_secs, Clock, SystemClock};
use crate::types::{
    SwapResult, TokenRegistry, TransactionKind, TransactionRecord, TransactionStatus, WalletSession,
};

pub struct SwapEngine {
    config: GateConfig,
    gate: SecurityGate,
    tokens: TokenRegistry,
    oracle: PriceOracle,
    settlement: Settlement,
    history: TransactionHistory,
    approvals: Arc<MultiSigApprovalStore>,
    errors: Arc<ErrorClassifier>,
    rate_limiters: DashMap<String, RateLimiter>,
    active_swaps: ActiveSwaps,
    clock: Arc<dyn Clock>,
}

impl SwapEngine {
    pub fn builder(config: GateConfig) -> SwapEngineBuilder {
        SwapEngineBuilder::new(config)
    }

    // Main swap orchestration function
    //
    // SWAP FLOW (short-circuits on the first failure):
    // 1. Requester must be a connected wallet
    // 2. Resolve the token pair, sanitize + truncate + bound-check the amount
    // 3. Per-requester sliding-window rate limit
    // 4. Suspicious-activity heuristic over the requester's history (advisory)
    // 5. Quote expected/minimum output at the configured tolerance
    // 6. Slippage between expected and minimum must be within the maximum
    // 7. Simulated settlement, bounded by the transaction timeout
    // 8. Confirmed record with fee, prepended to the requester's history
    //
    // Every failure is classified into an AppError and logged before returning.
    pub async fn swap(
        &self,
        from: &str,
        to: &str,
        raw_amount: &str,
        wallet: &WalletSession,
    ) -> Result<TransactionRecord> {
        match self.execute_swap(from, to, raw_amount, wallet).await {
            Ok(record) => Ok(record),
            Err(e) => {
                let app_error = self.errors.classify(&e);
                self.errors.log_error(&app_error);
                Err(e)
            }
        }
    }

    async fn execute_swap(
        &self,
        from: &str,
        to: &str,
        raw_amount: &str,
        wallet: &WalletSession,
    ) -> Result<TransactionRecord> {
        // === STEP 1: Connected requester ===
        let requester = wallet.requester()?;

        // One in-flight swap per requester; released on return or drop
        let _guard = SwapGuard::acquire(&self.active_swaps, requester)?;

        // === STEP 2: Validate input ===
        // Pair first: the amount is truncated to the source token's decimals
        let (from_token, to_token) = swap_validator::validate_swap_pair(&self.tokens, from, to)?;
        let amount = swap_validator::validate_swap_amount(&self.gate, raw_amount, from_token.decimals)?;
        let pair = format!("{}_{}", from_token.symbol, to_token.symbol);

        // === STEP 3: Rate limit ===
        self.admit(requester)?;

        // === STEP 4: Suspicious activity (advisory only) ===
        let past = self.history.load(requester)?;
        let samples: Vec<_> = past.iter().map(TransactionRecord::activity_sample).collect();
        let report = SecurityGate::detect_suspicious(&samples, self.clock.now_nanos());
        if report.flagged {
            warn!(
                "⚠️ {} for {}: {}",
                pair,
                requester,
                report.reason.as_deref().unwrap_or("suspicious activity")
            );
        }

        info!("🔄 Swap {} {} for {}", amount, pair, requester);

        // === STEP 5: Quote ===
        let quoted = self
            .oracle
            .calculate_swap(
                &from_token,
                &to_token,
                amount,
                self.config.security.slippage_tolerance_percent,
            )
            .await?;

        // === STEP 6: Slippage protection ===
        validate_swap_result(&self.gate, &pair, quoted.expected_amount, quoted.minimum_amount)?;

        // === STEP 7: Settle ===
        let receipt = self.settlement.settle(&pair).await?;

        // === STEP 8: Record ===
        let now = self.clock.now_nanos();
        let record = TransactionRecord {
            id: SecurityGate::generate_id(now),
            kind: TransactionKind::Swap,
            from_amount: amount,
            to_amount: quoted.expected_amount,
            fee: calculate_fee(amount)?,
            from_token,
            to_token,
            status: TransactionStatus::Confirmed,
            timestamp: now,
            settlement_reference: receipt.reference,
            resource_cost: receipt.resource_cost,
        };

        self.history.prepend(requester, record.clone())?;

        info!(
            "✅ Swap {} confirmed: {} {} → {} {} (fee {})",
            record.id,
            record.from_amount,
            record.from_token.symbol,
            record.to_amount,
            record.to_token.symbol,
            record.fee
        );

        Ok(record)
    }

    /// Quote without consuming a rate-limit slot or settling
    pub async fn preview(&self, from: &str, to: &str, raw_amount: &str) -> Result<SwapResult> {
        let (from_token, to_token) = swap_validator::validate_swap_pair(&self.tokens, from, to)?;
        let amount = swap_validator::validate_swap_amount(&self.gate, raw_amount, from_token.decimals)?;
        self.oracle
            .calculate_swap(
                &from_token,
                &to_token,
                amount,
                self.config.security.slippage_tolerance_percent,
            )
            .await
    }

    pub fn calculate_fee(&self, amount: Decimal) -> Result<Decimal> {
        calculate_fee(amount)
    }

    pub fn history(&self, address: &str) -> Result<Vec<TransactionRecord>> {
        self.history.load(address)
    }

    pub fn clear_history(&self, address: &str) -> Result<()> {
        self.history.clear(address)
    }

    pub fn update_status(
        &self,
        address: &str,
        id: &str,
        status: TransactionStatus,
    ) -> Result<TransactionRecord> {
        self.history.update_status(address, id, status)
    }

    /// Whether a transfer of `value` must go through multisig approval
    pub fn requires_approval(&self, value: Decimal) -> Result<bool> {
        self.approvals.requires_approval(value)
    }

    /// Requester's window; a requester never seen has the full ceiling
    pub fn rate_limit_status(&self, requester: &str) -> RateLimitStatus {
        let now = self.clock.now_nanos();
        match self.rate_limiters.get_mut(requester) {
            Some(mut limiter) => limiter.status(now),
            None => RateLimitStatus {
                remaining: self.config.security.rate_limit_per_minute,
                time_until_reset: std::time::Duration::ZERO,
            },
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenRegistry {
        &self.tokens
    }

    pub fn oracle(&self) -> &PriceOracle {
        &self.oracle
    }

    pub fn approvals(&self) -> &Arc<MultiSigApprovalStore> {
        &self.approvals
    }

    pub fn errors(&self) -> &Arc<ErrorClassifier> {
        &self.errors
    }

    pub fn now_nanos(&self) -> u64 {
        self.clock.now_nanos()
    }

    fn admit(&self, requester: &str) -> Result<()> {
        let now = self.clock.now_nanos();
        let ceiling = self.config.security.rate_limit_per_minute;
        let mut limiter = self
            .rate_limiters
            .entry(requester.to_string())
            .or_insert_with(|| RateLimiter::new(ceiling));

        if limiter.check(now) {
            return Ok(());
        }

        let retry_in_secs = ceil_secs(limiter.time_until_reset(now).as_nanos() as u64);
        Err(SwapError::RateLimitExceeded { retry_in_secs }.into())
    }
}

/// Wires a [`SwapEngine`] from configuration plus injectable collaborators.
/// Anything not supplied gets the production default.
pub struct SwapEngineBuilder {
    config: GateConfig,
    clock: Option<Arc<dyn Clock>>,
    feed: Option<Arc<dyn PriceFeed>>,
    fallback: Option<FallbackRates>,
    delay: Option<Arc<dyn SettlementDelay>>,
    store: Option<Arc<dyn KeyValueStore>>,
    tokens: Option<TokenRegistry>,
    approvals: Option<Arc<MultiSigApprovalStore>>,
}

impl SwapEngineBuilder {
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            clock: None,
            feed: None,
            fallback: None,
            delay: None,
            store: None,
            tokens: None,
            approvals: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_price_feed(mut self, feed: Arc<dyn PriceFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    pub fn with_fallback_rates(mut self, fallback: FallbackRates) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_settlement_delay(mut self, delay: Arc<dyn SettlementDelay>) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_tokens(mut self, tokens: TokenRegistry) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Share an approval store with other components
    pub fn with_approvals(mut self, approvals: Arc<MultiSigApprovalStore>) -> Self {
        self.approvals = Some(approvals);
        self
    }

    pub fn build(self) -> std::result::Result<SwapEngine, SwapGateError> {
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let feed = self.feed.unwrap_or_else(|| Arc::new(StaticPriceFeed::new()));
        let delay = self.delay.unwrap_or_else(|| Arc::new(TokioDelay));
        let store = self.store.unwrap_or_else(|| Arc::new(MemoryKeyValueStore::new()));
        let approvals = self.approvals.unwrap_or_else(|| {
            Arc::new(MultiSigApprovalStore::new(self.config.multisig.clone(), clock.clone()))
        });

        let config = self.config;
        Ok(SwapEngine {
            gate: SecurityGate::new(config.security.clone()),
            tokens: self.tokens.unwrap_or_else(TokenRegistry::with_defaults),
            oracle: PriceOracle::new(
                feed,
                self.fallback.unwrap_or_default(),
                clock.clone(),
                &config.oracle,
            ),
            settlement: Settlement::new(delay, &config.settlement, config.security.transaction_timeout),
            history: TransactionHistory::new(store, config.history_namespace.clone()),
            approvals,
            errors: Arc::new(ErrorClassifier::new(config.error_history_size, clock.clone())),
            rate_limiters: DashMap::new(),
            active_swaps: ActiveSwaps::new(),
            clock,
            config,
        })
    }
}
