//! # `GovernanceEnvelope`
//!
//! The wrapper for every governance request delivered to the proxy.
//!
//! ## Security Properties
//!
//! - **Versioning**: all messages include a `version` field for forward compatibility.
//! - **Correlation**: responses echo `correlation_id`.
//! - **Envelope Authority**: `sender` is the sole source of truth for identity.
//!   Multisig or timelock executors place their own address here after they
//!   have collected the confirmations they require.

use crate::entities::{Address, Timestamp};
use crate::errors::MessageError;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Envelope around a governance payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceEnvelope<T> {
    /// Protocol version. MUST be checked before processing.
    pub version: u16,

    /// The executing governance actor.
    pub sender: Address,

    /// Unique identifier for correlating request/response pairs.
    pub correlation_id: Uuid,

    /// Unix timestamp (seconds) when the envelope was created.
    pub timestamp: Timestamp,

    /// The actual payload.
    pub payload: T,
}

impl<T> GovernanceEnvelope<T> {
    /// Current protocol version.
    pub const CURRENT_VERSION: u16 = 1;

    /// Wrap a payload with a fresh correlation id and the current time.
    pub fn new(sender: Address, payload: T) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            version: Self::CURRENT_VERSION,
            sender,
            correlation_id: Uuid::new_v4(),
            timestamp,
            payload,
        }
    }

    /// Check the envelope header.
    pub fn verify(&self) -> VerificationResult {
        if self.version != Self::CURRENT_VERSION {
            return VerificationResult::UnsupportedVersion {
                received: self.version,
                supported: Self::CURRENT_VERSION,
            };
        }
        VerificationResult::Valid
    }
}

/// Result of envelope verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    /// Envelope passed all checks.
    Valid,
    /// Envelope version is unsupported.
    UnsupportedVersion { received: u16, supported: u16 },
}

impl VerificationResult {
    /// Returns true if the verification was successful.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationResult::Valid)
    }

    /// Convert into a `Result`, mapping failures to `MessageError`.
    pub fn into_result(self) -> Result<(), MessageError> {
        match self {
            VerificationResult::Valid => Ok(()),
            VerificationResult::UnsupportedVersion {
                received,
                supported,
            } => Err(MessageError::UnsupportedVersion {
                received,
                supported,
            }),
        }
    }
}
