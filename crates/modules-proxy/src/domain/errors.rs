//! Error types for the Modules Proxy
//!
//! Every mutation failure leaves the registry exactly as it was before the
//! call.

use super::entities::ClashReport;
use super::value_objects::{Address, LogIndex, ModuleName, ModuleRef, Selector};
use std::collections::BTreeSet;
use thiserror::Error;

/// All errors that can occur in the modules proxy and the beacon.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Candidate overlaps other modules or the router's own selectors.
    #[error(
        "Selector clash for module {module:?}: {} owned by other modules, {} reserved",
        .report.clashing.len(),
        .report.reserved.len()
    )]
    Clash {
        module: ModuleRef,
        report: Box<ClashReport>,
    },

    /// Candidate mixes free selectors with selectors of one existing module.
    #[error(
        "Partial overlap: module {module:?} shares {} selectors with {owner:?} and declares {} free ones",
        .report.clashing.len(),
        .report.free.len()
    )]
    PartialOverlap {
        module: ModuleRef,
        owner: ModuleRef,
        report: Box<ClashReport>,
    },

    /// Replacement does not declare exactly the coverage it replaces.
    #[error(
        "Coverage mismatch replacing {from:?} with {to:?}: {} missing, {} extra",
        .missing.len(),
        .extra.len()
    )]
    CoverageMismatch {
        from: ModuleRef,
        to: ModuleRef,
        missing: BTreeSet<Selector>,
        extra: BTreeSet<Selector>,
    },

    /// Caller lacks the governance capability.
    #[error("Unauthorized caller: {caller:?}")]
    Unauthorized { caller: Address },

    /// No active implementation for the selector.
    #[error("Unrouted function: {selector}")]
    UnroutedFunction { selector: Selector },

    /// An item of a batch failed; nothing in the batch was applied.
    #[error("Batch aborted at item {index}: {source}")]
    BatchAbort {
        index: usize,
        #[source]
        source: Box<ProxyError>,
    },

    /// Module is not registered with this proxy.
    #[error("Module not registered: {module:?}")]
    ModuleNotRegistered { module: ModuleRef },

    /// Module declares no selectors.
    #[error("Module {module:?} declares no selectors")]
    EmptyModule { module: ModuleRef },

    /// Module declares more selectors than allowed.
    #[error("Module {module:?} declares {count} selectors, max {max}")]
    TooManySelectors {
        module: ModuleRef,
        count: usize,
        max: usize,
    },

    /// Batch size exceeded limits.
    #[error("Batch size exceeded: {size} > {max}")]
    BatchTooLarge { size: usize, max: usize },

    /// Replace lists differ in length.
    #[error("Batch length mismatch: {from} sources, {to} targets")]
    BatchLengthMismatch { from: usize, to: usize },

    /// Call data too short to hold a selector.
    #[error("Invalid calldata: {len} bytes")]
    InvalidCalldata { len: usize },

    /// Audit lookup beyond recorded history.
    #[error("Log index {index} out of range (history length {len})")]
    LogIndexOutOfRange { index: LogIndex, len: usize },

    /// Beacon lookups are paused.
    #[error("Beacon is paused")]
    BeaconPaused,

    /// Beacon has no implementation for the name.
    #[error("Unknown module name: {name}")]
    UnknownModuleName { name: ModuleName },

    /// Address does not resolve to a deployed module.
    #[error("Unknown module address: {address:?}")]
    UnknownModuleAddress { address: Address },

    /// The routed module failed.
    #[error("Module {module:?} failed: {source}")]
    ModuleExecution {
        module: ModuleRef,
        #[source]
        source: ModuleError,
    },
}

impl ProxyError {
    /// Wrap a batch item failure.
    pub fn batch_abort(index: usize, source: ProxyError) -> Self {
        ProxyError::BatchAbort {
            index,
            source: Box::new(source),
        }
    }

    /// Innermost error, looking through `BatchAbort`.
    pub fn root(&self) -> &ProxyError {
        match self {
            ProxyError::BatchAbort { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Failures raised by module code while handling a forwarded call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
    /// The module rejected the call.
    #[error("Reverted: {0}")]
    Reverted(String),

    /// The module was routed a selector it does not implement.
    #[error("Selector {0} not implemented")]
    NotImplemented(Selector),

    /// Arguments could not be decoded.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
