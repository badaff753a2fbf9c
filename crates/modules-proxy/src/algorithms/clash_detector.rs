//! Clash Detection
//!
//! Classifies every selector a candidate declares:
//! - reserved by the router (checked first, unconditional rejection)
//! - routed to the candidate itself
//! - routed to some other module
//! - free
//!
//! Pure query: no side effects.

use super::reserved::ReservedSelectors;
use crate::domain::entities::{ClashReport, ModuleDescriptor};
use crate::domain::selector_table::SelectorTable;
use crate::domain::value_objects::Selector;
use std::collections::BTreeSet;

/// Partition `candidate`'s selectors against the table and the denylist.
pub fn check_clashes(
    candidate: &ModuleDescriptor,
    table: &SelectorTable,
    reserved: &ReservedSelectors,
) -> ClashReport {
    let mut report = ClashReport::new(candidate.module);

    for selector in &candidate.selectors {
        if reserved.contains(selector) {
            report.reserved.insert(*selector);
            continue;
        }

        match table.get(selector) {
            None => {
                report.free.insert(*selector);
            }
            Some(owner) if owner == candidate.module => {
                report.self_owned.insert(*selector);
            }
            Some(owner) => {
                report.clashing.insert(*selector, owner);
            }
        }
    }

    report
}

/// `true` iff every selector is free or already routed to the candidate.
pub fn can_add(
    candidate: &ModuleDescriptor,
    table: &SelectorTable,
    reserved: &ReservedSelectors,
) -> bool {
    check_clashes(candidate, table, reserved).can_add()
}

/// Selectors `declared` lacks (`missing`) and adds (`extra`) relative to
/// `owned`.
pub fn coverage_diff(
    owned: &BTreeSet<Selector>,
    declared: &BTreeSet<Selector>,
) -> (BTreeSet<Selector>, BTreeSet<Selector>) {
    let missing = owned.difference(declared).copied().collect();
    let extra = declared.difference(owned).copied().collect();
    (missing, extra)
}
