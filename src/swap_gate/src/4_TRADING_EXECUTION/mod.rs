//! # Trading Execution Module
//!
//! Slippage enforcement and simulated settlement for approved swaps.
//!
//! ## Architecture
//! - **slippage/**: Minimum-receive maths and slippage validation
//! - **settlement/**: Injectable confirmation delay raced against the
//!   transaction timeout; issues settlement references
//!
//! ## Key Constraints
//! - **No Real Submission**: Settlement is simulated
//! - **Bounded**: A settlement attempt never outlives the transaction timeout
//! - **Slippage Protected**: Default 5% max slippage enforced
//!
//! ## Settlement Flow
//! 1. **Quote**: Expected and minimum output from the oracle
//! 2. **Validate**: Slippage between expected and minimum within limits
//! 3. **Settle**: Wait for simulated confirmation (or time out)
//! 4. **Receipt**: Reference and resource cost for the transaction record

pub mod settlement;
pub mod slippage;

pub use settlement::{ImmediateDelay, Settlement, SettlementDelay, SettlementReceipt, TokioDelay};
pub use slippage::{calculate_min_receive, validate_swap_result};
