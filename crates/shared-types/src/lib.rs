//! # Shared Types Crate
//!
//! Primitive identifiers and the governance envelope shared by every crate in
//! the workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `Selector`, `ModuleName` and `Address` are
//!   defined here and nowhere else.
//! - **Envelope Authority**: governance requests arrive wrapped in a
//!   `GovernanceEnvelope<T>`; its `sender` is the only identity the proxy
//!   trusts. Payloads MUST NOT carry their own caller field.

pub mod entities;
pub mod envelope;
pub mod errors;

pub use entities::*;
pub use envelope::{GovernanceEnvelope, VerificationResult};
pub use errors::*;
