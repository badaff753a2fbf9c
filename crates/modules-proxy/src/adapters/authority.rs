//! Single Owner Authority Adapter
//!
//! Implements `GovernanceAuthority` for a proxy governed by one address
//! (typically a multisig or timelock account).

use crate::domain::{Address, ProxyError};
use crate::ports::outbound::GovernanceAuthority;
use parking_lot::RwLock;
use tracing::info;

/// Governance held by exactly one address at a time.
pub struct SingleOwnerAuthority {
    owner: RwLock<Address>,
}

impl SingleOwnerAuthority {
    /// Create an authority held by `owner`.
    pub fn new(owner: Address) -> Self {
        Self {
            owner: RwLock::new(owner),
        }
    }
}

impl GovernanceAuthority for SingleOwnerAuthority {
    fn is_authorized(&self, caller: &Address) -> bool {
        *self.owner.read() == *caller
    }

    fn owner(&self) -> Address {
        *self.owner.read()
    }

    fn transfer(&self, caller: &Address, new_owner: Address) -> Result<Address, ProxyError> {
        // Check and swap under one write guard.
        let mut owner = self.owner.write();
        if *owner != *caller {
            return Err(ProxyError::Unauthorized { caller: *caller });
        }

        let previous = std::mem::replace(&mut *owner, new_owner);
        info!(?previous, ?new_owner, "Governance transferred");
        Ok(previous)
    }
}
