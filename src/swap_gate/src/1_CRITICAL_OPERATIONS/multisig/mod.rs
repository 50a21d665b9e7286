//! Multi-signature approval - N-of-M signer approval plus a timelock
//! for high-value transfers
//!
//! ## Lifecycle
//! `Created → (signatures accumulate) → Executable → Executed`, with
//! cancellation (destructive removal) allowed until execution.
//!
//! ## Ordering
//! Threshold is checked before the timelock. Once enough signers approve, the
//! timelock still gives every signer a window to cancel a malicious transfer.
//!
//! All records sit behind one store-wide lock, so `sign`, `execute` and
//! `cancel` are mutually exclusive.


use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::infrastructure::config::{MultiSigConfig, MultiSigConfigUpdate};
use crate::infrastructure::errors::{ApprovalError, Result, SystemError};
use crate::infrastructure::security::generate_secure_id;
use crate::infrastructure::time::{ceil_secs, Clock};

// Pending high-value transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingApproval {
    pub id: String,
    pub target: String,
    pub value: Decimal,
    #[serde(with = "serde_bytes")]
    pub payload: Vec<u8>,           // Opaque call data
    pub signers: Vec<String>,       // No duplicates, all authorized
    pub created_at: u64,
    pub executable_at: u64,         // created_at + timelock
    pub executed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalState {
    Created,
    Executable,
    Executed,
}

struct StoreState {
    approvals: HashMap<String, PendingApproval>,
    insertion_order: Vec<String>,
    config: MultiSigConfig,
}

pub struct MultiSigApprovalStore {
    state: Mutex<StoreState>,
    clock: Arc<dyn Clock>,
}

impl MultiSigApprovalStore {
    pub fn new(config: MultiSigConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(StoreState {
                approvals: HashMap::new(),
                insertion_order: Vec::new(),
                config,
            }),
            clock,
        }
    }

    /// Register a transfer awaiting approval; executable no earlier than now + timelock
    pub fn create(&self, target: &str, value: Decimal, payload: Vec<u8>) -> Result<PendingApproval> {
        let mut state = self.lock()?;
        let now = self.clock.now_nanos();
        let timelock = state.config.timelock.as_nanos().min(u64::MAX as u128) as u64;

        let approval = PendingApproval {
            id: generate_secure_id("multisig", now),
            target: target.to_string(),
            value,
            payload,
            signers: Vec::new(),
            created_at: now,
            executable_at: now.saturating_add(timelock),
            executed: false,
        };

        state.insertion_order.push(approval.id.clone());
        state.approvals.insert(approval.id.clone(), approval.clone());

        info!("📝 Multisig {} created: {} to {}", approval.id, value, target);
        Ok(approval)
    }

    pub fn sign(&self, id: &str, signer: &str) -> Result<()> {
        let mut state = self.lock()?;
        let StoreState { approvals, config, .. } = &mut *state;

        let approval = approvals
            .get_mut(id)
            .ok_or_else(|| ApprovalError::NotFound { id: id.to_string() })?;

        if approval.executed {
            return Err(ApprovalError::AlreadyExecuted { id: id.to_string() }.into());
        }

        if !config.signers.iter().any(|s| s == signer) {
            return Err(ApprovalError::UnauthorizedSigner { signer: signer.to_string() }.into());
        }

        if approval.signers.iter().any(|s| s == signer) {
            return Err(ApprovalError::AlreadySigned { signer: signer.to_string() }.into());
        }

        approval.signers.push(signer.to_string());
        info!(
            "✍️ Multisig {} signed by {} ({}/{})",
            id,
            signer,
            approval.signers.len(),
            config.threshold
        );
        Ok(())
    }

    /// `Ok(())` when execution is allowed; otherwise the specific blocker
    pub fn can_execute(&self, id: &str) -> Result<()> {
        let state = self.lock()?;
        check_executable(&state, id, self.clock.now_nanos())
    }

    /// Mark executed. The record is immutable afterwards.
    pub fn execute(&self, id: &str) -> Result<PendingApproval> {
        let mut state = self.lock()?;
        check_executable(&state, id, self.clock.now_nanos())?;

        let approval = state
            .approvals
            .get_mut(id)
            .ok_or_else(|| ApprovalError::NotFound { id: id.to_string() })?;
        approval.executed = true;

        info!("✅ Multisig {} executed ({} to {})", id, approval.value, approval.target);
        Ok(approval.clone())
    }

    /// Remove a not-yet-executed record entirely
    pub fn cancel(&self, id: &str, signer: &str) -> Result<()> {
        let mut state = self.lock()?;

        let approval = state
            .approvals
            .get(id)
            .ok_or_else(|| ApprovalError::NotFound { id: id.to_string() })?;

        if approval.executed {
            return Err(ApprovalError::AlreadyExecuted { id: id.to_string() }.into());
        }

        if !state.config.signers.iter().any(|s| s == signer) {
            return Err(ApprovalError::UnauthorizedSigner { signer: signer.to_string() }.into());
        }

        state.approvals.remove(id);
        state.insertion_order.retain(|existing| existing != id);

        warn!("🚫 Multisig {} cancelled by {}", id, signer);
        Ok(())
    }

    /// Unexecuted records, newest first
    pub fn pending_approvals(&self) -> Result<Vec<PendingApproval>> {
        let state = self.lock()?;
        let mut pending: Vec<PendingApproval> = state
            .insertion_order
            .iter()
            .rev()
            .filter_map(|id| state.approvals.get(id))
            .filter(|approval| !approval.executed)
            .cloned()
            .collect();
        // Stable: equal timestamps keep newest-inserted first
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pending)
    }

    pub fn get(&self, id: &str) -> Result<Option<PendingApproval>> {
        Ok(self.lock()?.approvals.get(id).cloned())
    }

    pub fn state(&self, id: &str) -> Result<ApprovalState> {
        let state = self.lock()?;
        let approval = state
            .approvals
            .get(id)
            .ok_or_else(|| ApprovalError::NotFound { id: id.to_string() })?;

        if approval.executed {
            return Ok(ApprovalState::Executed);
        }

        let now = self.clock.now_nanos();
        if approval.signers.len() >= state.config.threshold && now >= approval.executable_at {
            Ok(ApprovalState::Executable)
        } else {
            Ok(ApprovalState::Created)
        }
    }

    /// Whether a transfer of `value` must go through approval; always false
    /// when no value threshold is configured
    pub fn requires_approval(&self, value: Decimal) -> Result<bool> {
        let state = self.lock()?;
        Ok(state
            .config
            .approval_value_threshold
            .is_some_and(|threshold| value >= threshold))
    }

    /// Apply a partial update. Signatures from signers no longer authorized
    /// are dropped from unexecuted records.
    pub fn configure(&self, update: MultiSigConfigUpdate) -> Result<MultiSigConfig> {
        let mut state = self.lock()?;

        let mut next = state.config.clone();
        next.apply(update);
        next.validate()?;

        for approval in state.approvals.values_mut().filter(|a| !a.executed) {
            let before = approval.signers.len();
            approval.signers.retain(|s| next.signers.contains(s));
            if approval.signers.len() != before {
                warn!(
                    "⚠️ Multisig {}: dropped {} signature(s) from removed signers",
                    approval.id,
                    before - approval.signers.len()
                );
            }
        }

        state.config = next.clone();
        info!(
            "⚙️ Multisig configured: {}-of-{}, timelock {:?}",
            next.threshold,
            next.signers.len(),
            next.timelock
        );
        Ok(next)
    }

    pub fn config(&self) -> Result<MultiSigConfig> {
        Ok(self.lock()?.config.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>> {
        self.state.lock().map_err(|_| {
            SystemError::StateCorrupted {
                reason: "multisig store lock poisoned".to_string(),
            }
            .into()
        })
    }
}

fn check_executable(state: &StoreState, id: &str, now: u64) -> Result<()> {
    let approval = state
        .approvals
        .get(id)
        .ok_or_else(|| ApprovalError::NotFound { id: id.to_string() })?;

    if approval.executed {
        return Err(ApprovalError::AlreadyExecuted { id: id.to_string() }.into());
    }

    if approval.signers.len() < state.config.threshold {
        return Err(ApprovalError::InsufficientSignatures {
            collected: approval.signers.len(),
            required: state.config.threshold,
        }
        .into());
    }

    if now < approval.executable_at {
        return Err(ApprovalError::TimelockActive {
            remaining_secs: ceil_secs(approval.executable_at - now),
        }
        .into());
    }

    Ok(())
}
