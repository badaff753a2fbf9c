//! Core entities for the Modules Proxy

use super::value_objects::{ClashVerdict, ModuleRef, Selector};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A module and the full set of selectors it implements.
///
/// Read from the module once, at first registration, and authoritative from
/// then on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Module handle.
    pub module: ModuleRef,
    /// Declared selectors.
    pub selectors: BTreeSet<Selector>,
}

impl ModuleDescriptor {
    pub fn new(module: ModuleRef, selectors: impl IntoIterator<Item = Selector>) -> Self {
        Self {
            module,
            selectors: selectors.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    pub fn declares(&self, selector: &Selector) -> bool {
        self.selectors.contains(selector)
    }
}

/// Per-selector classification of a candidate module.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClashReport {
    /// The candidate being checked.
    pub module: ModuleRef,
    /// Selectors with no current owner.
    pub free: BTreeSet<Selector>,
    /// Selectors already routed to the candidate itself.
    pub self_owned: BTreeSet<Selector>,
    /// Selectors owned by other modules, with their owner.
    pub clashing: BTreeMap<Selector, ModuleRef>,
    /// Selectors reserved by the router.
    pub reserved: BTreeSet<Selector>,
}

impl ClashReport {
    pub fn new(module: ModuleRef) -> Self {
        Self {
            module,
            ..Default::default()
        }
    }

    /// Distinct modules owning at least one of the candidate's selectors.
    pub fn clashing_modules(&self) -> BTreeSet<ModuleRef> {
        self.clashing.values().copied().collect()
    }

    /// Reserved selectors as a list, matching `checkClashingFuncSelectors`.
    pub fn clashing_reserved_selectors(&self) -> Vec<Selector> {
        self.reserved.iter().copied().collect()
    }

    /// Decide what the candidate's coverage means for the registry.
    ///
    /// Reserved selectors win over everything else.
    pub fn verdict(&self) -> ClashVerdict {
        if !self.reserved.is_empty() {
            return ClashVerdict::ReservedClash;
        }

        let owners = self.clashing_modules();
        let mut owners = owners.into_iter();
        match (owners.next(), owners.next()) {
            (None, _) if self.free.is_empty() && !self.self_owned.is_empty() => {
                ClashVerdict::AlreadyActive
            }
            (None, _) => ClashVerdict::CleanAdd,
            (Some(owner), None) if self.free.is_empty() && self.self_owned.is_empty() => {
                ClashVerdict::ReplaceCandidate { owner }
            }
            (Some(owner), None) => ClashVerdict::PartialOverlap { owner },
            (Some(_), Some(_)) => ClashVerdict::MultiOwnerClash,
        }
    }

    /// `true` iff `add_module` would be accepted.
    pub fn can_add(&self) -> bool {
        self.verdict().permits_add()
    }
}
