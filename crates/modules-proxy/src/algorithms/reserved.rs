//! Router-owned selectors.
//!
//! The proxy's own management entry points can never be routed to a module.
//! The list is fixed; deployments may extend it through configuration but
//! never shrink it.

use crate::domain::value_objects::Selector;
use std::collections::BTreeSet;

/// Canonical signatures of the router's own functions.
pub const ROUTER_FUNCTION_SIGNATURES: &[&str] = &[
    "addModule(address)",
    "addModules(address[])",
    "replaceModule(address,address)",
    "replaceModules(address[],address[])",
    "removeModule(address)",
    "removeModules(address[])",
    "setProxyOwner(address)",
    "getProxyOwner()",
    "getFuncImplementation(bytes4)",
    "canAddModule(address)",
    "canNotAddModules(address[])",
    "checkClashingFuncSelectors(address)",
    "activeModuleIndex(bytes4)",
    "moduleUpgradeLog(bytes4,uint256)",
];

/// Denylist consulted before any ownership check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservedSelectors {
    selectors: BTreeSet<Selector>,
}

impl ReservedSelectors {
    /// The router's built-in denylist.
    pub fn router_defaults() -> Self {
        Self {
            selectors: ROUTER_FUNCTION_SIGNATURES
                .iter()
                .map(|sig| Selector::from_signature(sig))
                .collect(),
        }
    }

    /// Built-in denylist plus deployment-specific additions.
    pub fn with_extra(extra: impl IntoIterator<Item = Selector>) -> Self {
        let mut reserved = Self::router_defaults();
        reserved.selectors.extend(extra);
        reserved
    }

    pub fn contains(&self, selector: &Selector) -> bool {
        self.selectors.contains(selector)
    }

    pub fn as_set(&self) -> &BTreeSet<Selector> {
        &self.selectors
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }
}

impl Default for ReservedSelectors {
    fn default() -> Self {
        Self::router_defaults()
    }
}
