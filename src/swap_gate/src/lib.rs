//! Swap Gate - Security-First Swap Settlement with Numbered Zones
//!
//! Admits, prices, protects and records token swaps for connected wallets,
//! and gates high-value transfers behind threshold signatures plus a timelock.
//!
//! Architecture:
//! 1_CRITICAL_OPERATIONS - Swap orchestration, multisig approvals (highest security)
//! 2_CRITICAL_DATA - Per-address transaction history
//! 3_PRICE_DISCOVERY - Cached oracle with live feed and fallback rates
//! 4_TRADING_EXECUTION - Slippage protection and simulated settlement
//! 5_INFORMATIONAL - Diagnostics views
//! 6_INFRASTRUCTURE - Config, errors, math, rate limiting, security, time
//!
//! ```rust,ignore
//! let engine = SwapEngine::builder(GateConfig::from_env()?).build()?;
//! let wallet = WalletSession::connected("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
//! let record = engine.swap("ETH", "USDC", "1.0", &wallet).await?;
//! ```

// Import numbered modules with explicit paths
#[path = "1_CRITICAL_OPERATIONS/mod.rs"]
mod critical_operations_1;
use critical_operations_1 as _1_CRITICAL_OPERATIONS;

#[path = "2_CRITICAL_DATA/mod.rs"]
mod critical_data_2;
use critical_data_2 as _2_CRITICAL_DATA;

#[path = "3_PRICE_DISCOVERY/mod.rs"]
mod price_discovery_3;
use price_discovery_3 as _3_PRICE_DISCOVERY;

#[path = "4_TRADING_EXECUTION/mod.rs"]
mod trading_execution_4;
use trading_execution_4 as _4_TRADING_EXECUTION;

#[path = "5_INFORMATIONAL/mod.rs"]
mod informational_5;
use informational_5 as _5_INFORMATIONAL;

#[path = "6_INFRASTRUCTURE/mod.rs"]
mod infrastructure_6;
use infrastructure_6 as infrastructure;

mod types;

// ===== PUBLIC API =====

pub use _1_CRITICAL_OPERATIONS::{
    ApprovalState, MultiSigApprovalStore, PendingApproval, SwapEngine, SwapEngineBuilder,
};
pub use _2_CRITICAL_DATA::{KeyValueStore, MemoryKeyValueStore, TransactionHistory};
pub use _3_PRICE_DISCOVERY::{
    CacheStats, FallbackRates, PriceFeed, PriceOracle, StaticPriceFeed, UnavailablePriceFeed,
};
pub use _4_TRADING_EXECUTION::{
    calculate_min_receive, validate_swap_result, ImmediateDelay, Settlement, SettlementDelay,
    SettlementReceipt, TokioDelay,
};
pub use types::{
    PriceQuote, QuoteSource, SwapResult, Token, TokenAddress, TokenRegistry, TransactionKind,
    TransactionRecord, TransactionStatus, WalletSession,
};

pub use infrastructure::{
    calculate_fee, price_impact_percent, to_fixed, to_fixed_decimal, truncate_to_decimals,
    ActiveSwaps, AppError, ApprovalError, CalculationError, Clock, ConfigError, ErrorCategory,
    ErrorClassifier, GateConfig, ManualClock, MultiSigConfig, MultiSigConfigUpdate, OracleConfig,
    RateLimitStatus, RateLimiter, Result, SecurityConfig, SecurityGate, SettlementConfig,
    StorageError, SwapError, SwapGateError, SwapGuard, SystemClock, SystemError, TradingError,
    ValidationError,
};
pub use infrastructure::security::{generate_secure_id, ActivitySample, SlippageCheck, SuspicionReport};

/// Read-only operator views
pub mod diagnostics {
    pub use crate::_5_INFORMATIONAL::*;
}

/// Default values for every tunable
pub mod constants {
    pub use crate::infrastructure::constants::*;
}
