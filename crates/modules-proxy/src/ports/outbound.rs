//! Outbound Ports (Driven Ports / SPI)
//!
//! What the proxy needs from the outside world: module code to forward to,
//! an authority deciding who may mutate the registry, a clock for the audit
//! log, and a directory resolving deployed addresses to modules.

use crate::domain::errors::{ModuleError, ProxyError};
use crate::domain::value_objects::{Address, CallContext, ModuleRef, Selector, Timestamp};
use std::sync::Arc;

pub use shared_bus::EventPublisher;

/// A deployed unit of logic registered behind a proxy.
///
/// `S` is the router's persistent state. A module never owns state of its
/// own: every call receives the state of the proxy it was routed through.
pub trait Module<S>: Send + Sync {
    /// Address of this module.
    fn address(&self) -> ModuleRef;

    /// Every selector this module implements.
    ///
    /// Read once, when the module is first registered.
    fn selectors(&self) -> Vec<Selector>;

    /// Handle a forwarded call.
    ///
    /// `calldata` is the complete call including its 4-byte selector.
    fn call(
        &self,
        state: &mut S,
        ctx: &CallContext,
        calldata: &[u8],
    ) -> Result<Vec<u8>, ModuleError>;
}

/// Shared handle to a module.
pub type ModuleHandle<S> = Arc<dyn Module<S>>;

/// Governance capability gate.
///
/// Only callers this authority accepts may mutate a registry.
pub trait GovernanceAuthority: Send + Sync {
    /// Whether `caller` currently holds the capability.
    fn is_authorized(&self, caller: &Address) -> bool;

    /// The current holder.
    fn owner(&self) -> Address;

    /// Hand the capability to `new_owner`. Returns the previous holder.
    fn transfer(&self, caller: &Address, new_owner: Address) -> Result<Address, ProxyError>;
}

/// Time source for upgrade log rows.
pub trait Clock: Send + Sync {
    /// Current Unix time in seconds.
    fn now(&self) -> Timestamp;
}

/// Directory of deployed modules, used where requests name modules by
/// address only.
pub trait ModuleSource<S>: Send + Sync {
    /// Resolve a deployed address.
    fn resolve(&self, address: &Address) -> Option<ModuleHandle<S>>;
}
