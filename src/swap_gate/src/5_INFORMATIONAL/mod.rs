//! Informational zone - Read-only views for operators and UI
//! Nothing here mutates swap state except clearing the error history

pub mod diagnostics;

pub use diagnostics::{
    cache_stats, clear_error_history, pending_approvals, rate_limit_status, recent_errors,
    snapshot, DiagnosticsSnapshot,
};
