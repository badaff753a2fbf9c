//! Domain invariants for the Modules Proxy
//!
//! Checked by tests after every operation sequence; cheap enough to call
//! from debug assertions.

use super::entities::ModuleDescriptor;
use super::selector_table::SelectorTable;
use super::upgrade_log::UpgradeLog;
use super::value_objects::{ModuleRef, Selector};
use std::collections::{BTreeSet, HashMap};

/// INVARIANT-1: Single Owner
/// Every routed selector belongs to exactly one registered module, and every
/// registered module owns its whole declared set.
pub fn invariant_single_owner(
    table: &SelectorTable,
    descriptors: &HashMap<ModuleRef, ModuleDescriptor>,
) -> bool {
    for (selector, owner) in table.iter() {
        let Some(descriptor) = descriptors.get(owner) else {
            return false;
        };
        if !descriptor.declares(selector) {
            return false;
        }
    }

    descriptors.iter().all(|(module, descriptor)| {
        descriptor
            .selectors
            .iter()
            .all(|s| table.get(s) == Some(*module))
    })
}

/// INVARIANT-2: Log Matches Table
/// The active log entry of every selector equals the live route.
pub fn invariant_log_matches_table(table: &SelectorTable, log: &UpgradeLog<Selector>) -> bool {
    let logged_match = log
        .keys()
        .all(|selector| log.active_implementation(selector) == table.get(selector));

    let routed_logged = table
        .iter()
        .all(|(selector, _)| log.active_index(selector) > 0);

    logged_match && routed_logged
}

/// INVARIANT-3: Reserved Unclaimed
/// No router-owned selector is ever routed to a module.
pub fn invariant_reserved_unclaimed(table: &SelectorTable, reserved: &BTreeSet<Selector>) -> bool {
    reserved.iter().all(|s| !table.is_routed(s))
}

/// INVARIANT-4: History Monotonicity
/// No active index moved backwards between two observations.
pub fn invariant_monotonic_history(
    before: &UpgradeLog<Selector>,
    after: &UpgradeLog<Selector>,
) -> bool {
    before.keys().all(|selector| {
        after.active_index(selector) >= before.active_index(selector)
            && after.len_for(selector) >= before.len_for(selector)
            && before.history(selector) == &after.history(selector)[..before.len_for(selector)]
    })
}
