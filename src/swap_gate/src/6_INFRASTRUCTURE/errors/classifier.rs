//! Error classification and diagnostics history
//!
//! Turns typed errors and raw collaborator failures into [`AppError`]s with a
//! fixed user-facing message and suggested action per category. Every created
//! error lands in a bounded, newest-first history.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use log::error;
use serde::{Deserialize, Serialize};

use super::SwapGateError;
use crate::infrastructure::constants::{DEFAULT_RECENT_ERRORS, MAX_ERROR_HISTORY};
use crate::infrastructure::time::{Clock, SystemClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    WalletConnection,
    TransactionFailed,
    InsufficientFunds,
    SlippageExceeded,
    RateLimit,
    ValidationError,
    NetworkError,
    ContractError,
    Unknown,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::WalletConnection => "WALLET_CONNECTION",
            ErrorCategory::TransactionFailed => "TRANSACTION_FAILED",
            ErrorCategory::InsufficientFunds => "INSUFFICIENT_FUNDS",
            ErrorCategory::SlippageExceeded => "SLIPPAGE_EXCEEDED",
            ErrorCategory::RateLimit => "RATE_LIMIT",
            ErrorCategory::ValidationError => "VALIDATION_ERROR",
            ErrorCategory::NetworkError => "NETWORK_ERROR",
            ErrorCategory::ContractError => "CONTRACT_ERROR",
            ErrorCategory::Unknown => "UNKNOWN",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCategory::WalletConnection =>
                "Unable to connect to your wallet. Please make sure your wallet extension is unlocked and try again.",
            ErrorCategory::TransactionFailed =>
                "Transaction failed. This could be due to insufficient gas or a contract error.",
            ErrorCategory::InsufficientFunds =>
                "Insufficient funds in your wallet to complete this transaction.",
            ErrorCategory::SlippageExceeded =>
                "Price changed too much during transaction. Try increasing slippage tolerance or waiting for stable prices.",
            ErrorCategory::RateLimit =>
                "Too many requests. Please wait a moment before trying again.",
            ErrorCategory::ValidationError =>
                "Invalid input. Please check your entries and try again.",
            ErrorCategory::NetworkError =>
                "Network connection issue. Please check your internet connection and try again.",
            ErrorCategory::ContractError =>
                "Smart contract error. The transaction cannot be processed at this time.",
            ErrorCategory::Unknown =>
                "An unexpected error occurred. Please try again or contact support if the issue persists.",
        }
    }

    pub fn suggested_action(&self) -> &'static str {
        match self {
            ErrorCategory::WalletConnection => "Unlock your wallet and refresh the page",
            ErrorCategory::TransactionFailed => "Check transaction details and try again with higher gas",
            ErrorCategory::InsufficientFunds => "Add funds to your wallet or reduce transaction amount",
            ErrorCategory::SlippageExceeded => "Increase slippage tolerance in settings or try again later",
            ErrorCategory::RateLimit => "Wait 60 seconds before submitting another transaction",
            ErrorCategory::ValidationError => "Review your input and correct any errors",
            ErrorCategory::NetworkError => "Check your internet connection and try again",
            ErrorCategory::ContractError => "Wait a few minutes and try again",
            ErrorCategory::Unknown => "Refresh the page or contact support",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified failure, immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppError {
    pub category: ErrorCategory,
    pub message: String,
    pub user_message: String,
    pub technical: Option<String>,
    pub timestamp: u64,
    pub recoverable: bool,
    pub suggested_action: String,
}

/// Substring rules checked in order; first hit wins
const RAW_ERROR_RULES: &[(&str, ErrorCategory, &str)] = &[
    ("user rejected", ErrorCategory::WalletConnection, "Transaction rejected by user"),
    ("not connected", ErrorCategory::WalletConnection, "Wallet not connected"),
    ("insufficient funds", ErrorCategory::InsufficientFunds, "Insufficient funds"),
    ("slippage", ErrorCategory::SlippageExceeded, "Slippage tolerance exceeded"),
    ("rate limit", ErrorCategory::RateLimit, "Rate limit exceeded"),
    ("network", ErrorCategory::NetworkError, "Network error"),
    ("timeout", ErrorCategory::NetworkError, "Network error"),
    ("timed out", ErrorCategory::NetworkError, "Network error"),
    ("revert", ErrorCategory::ContractError, "Contract execution reverted"),
    ("contract", ErrorCategory::ContractError, "Contract error"),
];

pub struct ErrorClassifier {
    history: Mutex<VecDeque<AppError>>,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new(MAX_ERROR_HISTORY, Arc::new(SystemClock))
    }
}

impl ErrorClassifier {
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            history: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
            clock,
        }
    }

    pub fn create_error(
        &self,
        category: ErrorCategory,
        message: impl Into<String>,
        technical: Option<String>,
        recoverable: bool,
    ) -> AppError {
        let app_error = AppError {
            category,
            message: message.into(),
            user_message: category.user_message().to_string(),
            technical,
            timestamp: self.clock.now_nanos(),
            recoverable,
            suggested_action: category.suggested_action().to_string(),
        };

        self.push_history(app_error.clone());
        app_error
    }

    /// Classify a typed error
    pub fn classify(&self, err: &SwapGateError) -> AppError {
        self.create_error(
            err.category(),
            err.to_string(),
            Some(format!("{:?}", err)),
            err.is_recoverable(),
        )
    }

    /// Classify an untyped failure by its text
    pub fn classify_raw(&self, raw: &str) -> AppError {
        let lowered = raw.to_lowercase();
        let (category, message) = RAW_ERROR_RULES
            .iter()
            .find(|(needle, _, _)| lowered.contains(needle))
            .map(|(_, category, message)| (*category, *message))
            .unwrap_or((ErrorCategory::Unknown, "Transaction failed"));

        self.create_error(category, message, Some(raw.to_string()), true)
    }

    pub fn log_error(&self, app_error: &AppError) {
        error!(
            "[AppError] type={} message={} timestamp={} technical={}",
            app_error.category,
            app_error.message,
            app_error.timestamp,
            app_error.technical.as_deref().unwrap_or("-")
        );
    }

    /// Full history, newest first
    pub fn history(&self) -> Vec<AppError> {
        self.with_history(|h| h.iter().cloned().collect())
    }

    pub fn recent(&self, count: usize) -> Vec<AppError> {
        self.with_history(|h| h.iter().take(count).cloned().collect())
    }

    pub fn recent_default(&self) -> Vec<AppError> {
        self.recent(DEFAULT_RECENT_ERRORS)
    }

    pub fn clear_history(&self) {
        self.with_history(|h| h.clear());
    }

    fn push_history(&self, app_error: AppError) {
        let capacity = self.capacity;
        self.with_history(|h| {
            h.push_front(app_error);
            h.truncate(capacity);
        });
    }

    // A poisoned lock only means another thread panicked mid-push; the deque
    // itself is still structurally valid.
    fn with_history<R>(&self, f: impl FnOnce(&mut VecDeque<AppError>) -> R) -> R {
        let mut guard = match self.history.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::errors::{SwapError, ValidationError};
    use crate::infrastructure::time::ManualClock;
    use rust_decimal_macros::dec;

    fn classifier(capacity: usize) -> ErrorClassifier {
        ErrorClassifier::new(capacity, Arc::new(ManualClock::new(1_000)))
    }

    #[test]
    fn test_raw_heuristics() {
        let c = classifier(50);
        assert_eq!(c.classify_raw("Error: insufficient funds for gas * price + value").category, ErrorCategory::InsufficientFunds);
        assert_eq!(c.classify_raw("MetaMask: User rejected the request").category, ErrorCategory::WalletConnection);
        assert_eq!(c.classify_raw("price slippage check failed").category, ErrorCategory::SlippageExceeded);
        assert_eq!(c.classify_raw("network changed: 1 => 137").category, ErrorCategory::NetworkError);
        assert_eq!(c.classify_raw("execution reverted: STF").category, ErrorCategory::ContractError);
        assert_eq!(c.classify_raw("something odd").category, ErrorCategory::Unknown);
    }

    #[test]
    fn test_fixed_messages_per_category() {
        let c = classifier(50);
        let a = c.classify_raw("insufficient funds (a)");
        let b = c.classify_raw("insufficient funds (b)");
        assert_eq!(a.user_message, b.user_message);
        assert_eq!(a.suggested_action, "Add funds to your wallet or reduce transaction amount");
        assert_eq!(a.technical.as_deref(), Some("insufficient funds (a)"));
    }

    #[test]
    fn test_typed_classification() {
        let c = classifier(50);
        let err = SwapGateError::from(ValidationError::AmountBelowMinimum {
            amount: dec!(0.00001),
            minimum: dec!(0.0001),
        });
        let app_error = c.classify(&err);
        assert_eq!(app_error.category, ErrorCategory::ValidationError);
        assert!(app_error.message.contains("0.0001"));
        assert!(app_error.recoverable);
        assert_eq!(app_error.timestamp, 1_000);
    }

    #[test]
    fn test_history_is_newest_first_and_capped() {
        let c = classifier(3);
        for i in 0..5 {
            c.classify_raw(&format!("failure {}", i));
        }
        let history = c.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].technical.as_deref(), Some("failure 4"));
        assert_eq!(history[2].technical.as_deref(), Some("failure 2"));

        assert_eq!(c.recent(1).len(), 1);
        c.clear_history();
        assert!(c.history().is_empty());
    }

    #[test]
    fn test_category_serializes_as_screaming_snake() {
        let json = serde_json::to_string(&ErrorCategory::RateLimit).unwrap();
        assert_eq!(json, "\"RATE_LIMIT\"");
        let c = classifier(5);
        let app_error = c.classify(&SwapError::NotConnected.into());
        assert_eq!(app_error.category.to_string(), "WALLET_CONNECTION");
    }
}
