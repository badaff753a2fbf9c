//! Value objects for the Modules Proxy

use serde::{Deserialize, Serialize};

pub use shared_types::{Address, ModuleName, Selector, Timestamp};

/// Handle of a deployed module (its address).
pub type ModuleRef = Address;

/// Position in an upgrade log. `0` means "never registered"; real entries
/// start at `1`.
pub type LogIndex = u64;

/// Outcome of classifying a candidate module against the selector table.
///
/// Add and replace are distinct governance decisions, so nothing here is ever
/// resolved automatically: only `CleanAdd` and `AlreadyActive` permit
/// `add_module`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClashVerdict {
    /// Every selector is free.
    CleanAdd,
    /// Every selector is already routed to the candidate itself.
    AlreadyActive,
    /// Every selector is owned by exactly one other module.
    ReplaceCandidate { owner: ModuleRef },
    /// Some selectors are free, the rest belong to a single other module.
    PartialOverlap { owner: ModuleRef },
    /// Selectors are owned by two or more other modules.
    MultiOwnerClash,
    /// At least one selector belongs to the router itself.
    ReservedClash,
}

impl ClashVerdict {
    /// Whether `add_module` may proceed.
    pub fn permits_add(&self) -> bool {
        matches!(self, ClashVerdict::CleanAdd | ClashVerdict::AlreadyActive)
    }
}

/// Context handed to a module on every forwarded call.
///
/// `caller` is the original caller of the proxy, not the proxy itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    /// Account that called the proxy.
    pub caller: Address,
    /// Address of the proxy whose state the module runs against.
    pub proxy: Address,
    /// Selector that was routed.
    pub selector: Selector,
}
