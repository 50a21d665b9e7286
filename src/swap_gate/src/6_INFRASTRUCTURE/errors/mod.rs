//! # Error Types
//!
//! One crate-wide error, grouped by the zone that raises it. Every variant's
//! `Display` text doubles as the reason string surfaced to callers, so the
//! wording here is part of the public contract.
//!
//! ## Mapping
//! - `category()` folds typed errors onto the closed [`ErrorCategory`] taxonomy
//! - `is_recoverable()` tells the caller whether an immediate retry makes sense
//!
//! Raw, untyped failures (strings from collaborators) go through
//! [`classifier::ErrorClassifier::classify_raw`] instead.

pub mod classifier;

use rust_decimal::Decimal;
use thiserror::Error;

pub use classifier::{AppError, ErrorCategory, ErrorClassifier};

pub type Result<T> = std::result::Result<T, SwapGateError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwapGateError {
    #[error(transparent)]
    Swap(#[from] SwapError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Trading(#[from] TradingError),

    #[error(transparent)]
    Approval(#[from] ApprovalError),

    #[error(transparent)]
    Calculation(#[from] CalculationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    System(#[from] SystemError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Other(String),
}

/// Failures of the swap pipeline itself (admission, identity)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwapError {
    #[error("Wallet not connected")]
    NotConnected,

    #[error("Rate limit exceeded, retry in {retry_in_secs}s")]
    RateLimitExceeded { retry_in_secs: u64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Amount too small. Minimum: {minimum}")]
    AmountBelowMinimum { amount: Decimal, minimum: Decimal },

    #[error("Amount exceeds maximum limit of {maximum}. Please contact support for large transactions.")]
    AmountAboveMaximum { amount: Decimal, maximum: Decimal },

    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("Source and destination token must be different (got {symbol})")]
    SameToken { symbol: String },

    #[error("Unknown token: {symbol}")]
    UnknownToken { symbol: String },

    #[error("Invalid token {symbol}: {reason}")]
    InvalidToken { symbol: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TradingError {
    #[error("Slippage too high: {slippage_percent}% exceeds maximum {max_allowed}%")]
    SlippageExceeded {
        expected: Decimal,
        minimum: Decimal,
        slippage_percent: Decimal,
        max_allowed: Decimal,
    },

    #[error("Expected output for {pair} is zero, cannot verify slippage")]
    ZeroExpectedOutput { pair: String },

    #[error("Settlement timed out after {timeout_secs}s (network confirmation not received)")]
    SettlementTimeout { timeout_secs: u64 },
}

/// Multi-signature workflow failures; each blocker has its own reason string
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApprovalError {
    #[error("Transaction not found: {id}")]
    NotFound { id: String },

    #[error("Transaction already executed: {id}")]
    AlreadyExecuted { id: String },

    #[error("Unauthorized signer: {signer}")]
    UnauthorizedSigner { signer: String },

    #[error("Already signed by this address: {signer}")]
    AlreadySigned { signer: String },

    #[error("Insufficient signatures: {collected}/{required}")]
    InsufficientSignatures { collected: usize, required: usize },

    #[error("Timelock active. Executable in {remaining_secs} seconds")]
    TimelockActive { remaining_secs: u64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: String },

    #[error("Division by zero in {operation}")]
    DivisionByZero { operation: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("Failed to serialize records for {key}: {reason}")]
    Serialization { key: String, reason: String },

    #[error("Corrupted records under {key}: {reason}")]
    Deserialization { key: String, reason: String },

    #[error("Record {id} not found for {address}")]
    RecordNotFound { address: String, id: String },

    #[error("Invalid status transition for {id}: {from} -> {to}")]
    InvalidStatusTransition { id: String, from: String, to: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SystemError {
    #[error("A {operation} is already in progress for {user}")]
    OperationInProgress { operation: String, user: String },

    #[error("Internal state corrupted: {reason}")]
    StateCorrupted { reason: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue { key: String, value: String, reason: String },

    #[error("Inconsistent configuration: {reason}")]
    Inconsistent { reason: String },
}

impl SwapGateError {
    /// Fold a typed error onto the closed user-facing taxonomy
    pub fn category(&self) -> ErrorCategory {
        match self {
            SwapGateError::Swap(SwapError::NotConnected) => ErrorCategory::WalletConnection,
            SwapGateError::Swap(SwapError::RateLimitExceeded { .. }) => ErrorCategory::RateLimit,
            SwapGateError::Validation(_) => ErrorCategory::ValidationError,
            SwapGateError::Trading(TradingError::SlippageExceeded { .. }) => ErrorCategory::SlippageExceeded,
            SwapGateError::Trading(TradingError::ZeroExpectedOutput { .. }) => ErrorCategory::TransactionFailed,
            SwapGateError::Trading(TradingError::SettlementTimeout { .. }) => ErrorCategory::NetworkError,
            SwapGateError::Approval(_) => ErrorCategory::ContractError,
            SwapGateError::Calculation(_) => ErrorCategory::TransactionFailed,
            SwapGateError::Storage(_) => ErrorCategory::Unknown,
            SwapGateError::System(SystemError::OperationInProgress { .. }) => ErrorCategory::RateLimit,
            SwapGateError::System(SystemError::StateCorrupted { .. }) => ErrorCategory::Unknown,
            SwapGateError::Config(_) => ErrorCategory::ValidationError,
            SwapGateError::Other(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether retrying the same request can succeed without operator action
    pub fn is_recoverable(&self) -> bool {
        match self {
            SwapGateError::System(SystemError::StateCorrupted { .. }) => false,
            SwapGateError::Storage(StorageError::Deserialization { .. }) => false,
            SwapGateError::Config(_) => false,
            SwapGateError::Approval(ApprovalError::AlreadyExecuted { .. }) => false,
            SwapGateError::Approval(ApprovalError::NotFound { .. }) => false,
            _ => true,
        }
    }
}
