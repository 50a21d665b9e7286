//! Default values for every tunable in [`crate::infrastructure::config`].
//! Durations are nanoseconds unless the name says otherwise.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===== SECURITY =====

/// Maximum tolerated deviation between expected and realized output (percent)
pub const MAX_SLIPPAGE_PERCENT: Decimal = dec!(5.0);

/// Slippage tolerance applied when quoting a swap (percent)
pub const DEFAULT_SLIPPAGE_TOLERANCE_PERCENT: Decimal = dec!(0.5);

/// Anti-dust floor
pub const MIN_TRANSACTION_AMOUNT: Decimal = dec!(0.0001);

/// Large-transfer guard
pub const MAX_TRANSACTION_AMOUNT: Decimal = dec!(1000000);

pub const RATE_LIMIT_PER_MINUTE: usize = 10;

/// Sliding window for rate limiting and suspicious-activity detection (60 seconds)
pub const RATE_LIMIT_WINDOW_NANOS: u64 = 60_000_000_000;

/// More than this many identical recent amounts is flagged
pub const SUSPICIOUS_REPEAT_THRESHOLD: usize = 5;

/// Upper bound on a single settlement attempt (5 minutes)
pub const TRANSACTION_TIMEOUT_NANOS: u64 = 300_000_000_000;

// ===== PRICE DISCOVERY =====

/// Quotes younger than this are served from cache (30 seconds)
pub const PRICE_CACHE_DURATION_NANOS: u64 = 30_000_000_000;

/// Trade size at which modeled price impact reaches 100% before capping
pub const PRICE_IMPACT_DIVISOR: Decimal = dec!(1000000);

/// Price impact ceiling (percent)
pub const MAX_PRICE_IMPACT_PERCENT: Decimal = dec!(5);

// ===== SETTLEMENT =====

/// Artificial network-confirmation delay (2 seconds)
pub const SETTLEMENT_DELAY_NANOS: u64 = 2_000_000_000;

/// Protocol fee (0.3%)
pub const SWAP_FEE_RATE: Decimal = dec!(0.003);

/// Fees are truncated to this many decimal places
pub const FEE_DECIMALS: u32 = 6;

pub const MIN_RESOURCE_COST: u64 = 50_000;
pub const MAX_RESOURCE_COST: u64 = 150_000;

// ===== MULTISIG =====

pub const DEFAULT_SIGNER_THRESHOLD: usize = 2;

/// Delay between threshold being met and execution being allowed (1 hour)
pub const DEFAULT_TIMELOCK_NANOS: u64 = 3_600_000_000_000;

// ===== STORAGE & DIAGNOSTICS =====

pub const TRANSACTION_HISTORY_NAMESPACE: &str = "swap_gate_transactions";

pub const MAX_ERROR_HISTORY: usize = 50;

pub const DEFAULT_RECENT_ERRORS: usize = 10;

/// rust_decimal cannot represent more fractional digits than this
pub const MAX_DECIMAL_SCALE: u32 = 28;
