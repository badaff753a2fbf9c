//! # Core Identifiers
//!
//! ## Clusters
//!
//! - **Addressing**: `Address` (module and caller handles)
//! - **Routing**: `Selector` (4-byte function identifier)
//! - **Beacon**: `ModuleName` (32-byte coarse module identifier)

use crate::errors::IdentifierError;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

pub use primitive_types::{H160, H256};

/// A 20-byte Ethereum-style address.
///
/// Used both for module handles and for callers.
pub type Address = H160;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Width of a function selector in bytes.
pub const SELECTOR_LEN: usize = 4;

fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(input);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

// =============================================================================
// SELECTOR
// =============================================================================

/// Function identifier: the first four bytes of Keccak-256 over the canonical
/// signature text, e.g. `"transfer(address,uint256)"`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Selector(pub [u8; SELECTOR_LEN]);

impl Selector {
    /// Wrap raw selector bytes.
    pub const fn new(bytes: [u8; SELECTOR_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive the selector of a canonical function signature.
    pub fn from_signature(signature: &str) -> Self {
        let digest = keccak256(signature.as_bytes());
        let mut bytes = [0u8; SELECTOR_LEN];
        bytes.copy_from_slice(&digest[..SELECTOR_LEN]);
        Self(bytes)
    }

    /// Read the selector from the head of ABI-style call data.
    ///
    /// Returns `None` when the call data is shorter than a selector.
    pub fn from_calldata(calldata: &[u8]) -> Option<Self> {
        let head = calldata.get(..SELECTOR_LEN)?;
        let mut bytes = [0u8; SELECTOR_LEN];
        bytes.copy_from_slice(head);
        Some(Self(bytes))
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; SELECTOR_LEN] {
        &self.0
    }
}

impl From<[u8; SELECTOR_LEN]> for Selector {
    fn from(bytes: [u8; SELECTOR_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector({self})")
    }
}

impl FromStr for Selector {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let decoded =
            hex::decode(digits).map_err(|e| IdentifierError::InvalidHex(e.to_string()))?;
        let bytes: [u8; SELECTOR_LEN] =
            decoded
                .try_into()
                .map_err(|v: Vec<u8>| IdentifierError::InvalidLength {
                    expected: SELECTOR_LEN,
                    actual: v.len(),
                })?;
        Ok(Self(bytes))
    }
}

// =============================================================================
// MODULE NAME
// =============================================================================

/// Coarse module identifier used by the beacon registry.
///
/// Derived as Keccak-256 of a human-readable label so that every party
/// computing the name of `"LoanTokenLogicStandard"` arrives at the same key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct ModuleName(pub H256);

impl ModuleName {
    /// Derive the name key from a label.
    pub fn from_label(label: &str) -> Self {
        Self(H256(keccak256(label.as_bytes())))
    }

    /// Raw 32-byte key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_fixed_bytes()
    }
}

impl From<[u8; 32]> for ModuleName {
    fn from(bytes: [u8; 32]) -> Self {
        Self(H256(bytes))
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0.as_bytes()))
    }
}

impl fmt::Debug for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleName({self})")
    }
}
