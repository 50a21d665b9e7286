//! # Critical Operations
//!
//! Everything that can move value or change who may move it.
//!
//! ## Architecture
//! - **swapping/**: `SwapEngine`, the single entry point that admits, quotes,
//!   settles and records a swap
//! - **multisig/**: N-of-M signer approval with a timelock for high-value
//!   transfers
//!
//! ## Security Model
//! - **Connected Requester**: No swap without a connected wallet address
//! - **Per-Requester Guard**: One in-flight swap per address
//! - **Rate Limited**: Sliding one-minute window per address
//! - **Slippage Protected**: Settlement never starts above the maximum slippage
//! - **Timelocked Approvals**: Threshold first, then the timelock

pub mod multisig;
pub mod swapping;

pub use multisig::{ApprovalState, MultiSigApprovalStore, PendingApproval};
pub use swapping::{SwapEngine, SwapEngineBuilder};
