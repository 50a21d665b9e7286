//! Reentrancy guards for critical operations
//! Prevents a requester from running two swaps at once
//!
//! ## Per-Requester Guards
//! - A requester holds at most one in-flight swap
//! - Different requesters proceed in parallel
//! - The slot is released on drop, including when the swap future is
//!   abandoned mid-settlement
//!
//! Example: requester A and requester B can swap simultaneously, but A's
//! second call fails with `OperationInProgress` until A's first call returns.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::infrastructure::errors::{Result, SystemError};

/// Shared set of requesters with a swap in flight
#[derive(Debug, Clone, Default)]
pub struct ActiveSwaps {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl ActiveSwaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, requester: &str) -> bool {
        self.lock().contains(requester)
    }

    pub fn count(&self) -> usize {
        self.lock().len()
    }

    // Membership is a plain set; a panic while holding the lock cannot leave it
    // half-updated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Guard for swap operations
#[derive(Debug)]
pub struct SwapGuard {
    registry: ActiveSwaps,
    requester: String,
}

impl SwapGuard {
    /// Acquire a swap guard for the requester
    pub fn acquire(registry: &ActiveSwaps, requester: &str) -> Result<Self> {
        let acquired = registry.lock().insert(requester.to_string());

        if acquired {
            Ok(SwapGuard {
                registry: registry.clone(),
                requester: requester.to_string(),
            })
        } else {
            Err(SystemError::OperationInProgress {
                operation: "swap".to_string(),
                user: requester.to_string(),
            }
            .into())
        }
    }
}

impl Drop for SwapGuard {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.requester);
    }
}
