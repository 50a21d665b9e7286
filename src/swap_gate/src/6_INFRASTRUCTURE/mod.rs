//! Infrastructure - Shared utilities and types
//! Foundation layer for all other modules

pub mod config;
pub mod constants;
pub mod errors;
#[path = "math/pure_math.rs"]
pub mod math;
pub mod rate_limiting;
pub mod reentrancy;
pub mod security;
pub mod time;

// Re-export commonly used items
pub use config::{GateConfig, MultiSigConfig, MultiSigConfigUpdate, OracleConfig, SecurityConfig, SettlementConfig};
pub use errors::{
    AppError, ApprovalError, CalculationError, ConfigError, ErrorCategory, ErrorClassifier, Result,
    StorageError, SwapError, SwapGateError, SystemError, TradingError, ValidationError,
};
pub use math::{calculate_fee, price_impact_percent, to_fixed, to_fixed_decimal, truncate_to_decimals};
pub use rate_limiting::{RateLimitStatus, RateLimiter};
pub use reentrancy::{ActiveSwaps, SwapGuard};
pub use security::SecurityGate;
pub use time::{Clock, ManualClock, SystemClock};
