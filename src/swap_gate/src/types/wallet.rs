use serde::{Deserialize, Serialize};

use crate::infrastructure::errors::{Result, SwapError};

// Connection state as reported by the wallet collaborator. Read-only here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSession {
    pub address: Option<String>,
    pub connected: bool,
}

impl WalletSession {
    pub fn connected(address: &str) -> Self {
        Self {
            address: Some(address.to_string()),
            connected: true,
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    /// The requester address, or `NotConnected` unless both an address and
    /// the connected flag are present
    pub fn requester(&self) -> Result<&str> {
        match (&self.address, self.connected) {
            (Some(address), true) if !address.trim().is_empty() => Ok(address.as_str()),
            _ => Err(SwapError::NotConnected.into()),
        }
    }
}
