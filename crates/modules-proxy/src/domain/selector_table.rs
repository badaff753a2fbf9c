//! Selector table: the active route for every function identifier.
//!
//! One entry per selector; absence means unrouted.

use super::value_objects::{ModuleRef, Selector};
use std::collections::{BTreeSet, HashMap};

/// Mapping `Selector -> ModuleRef` holding active implementations only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectorTable {
    routes: HashMap<Selector, ModuleRef>,
}

impl SelectorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// O(1) lookup used on the dispatch path.
    pub fn get(&self, selector: &Selector) -> Option<ModuleRef> {
        self.routes.get(selector).copied()
    }

    /// Route `selector` to `module`, returning the previous owner.
    pub fn assign(&mut self, selector: Selector, module: ModuleRef) -> Option<ModuleRef> {
        self.routes.insert(selector, module)
    }

    /// Unroute `selector`, returning the previous owner.
    pub fn clear(&mut self, selector: &Selector) -> Option<ModuleRef> {
        self.routes.remove(selector)
    }

    pub fn is_routed(&self, selector: &Selector) -> bool {
        self.routes.contains_key(selector)
    }

    /// Every selector currently routed to `module`.
    pub fn owned_by(&self, module: &ModuleRef) -> BTreeSet<Selector> {
        self.routes
            .iter()
            .filter(|(_, owner)| *owner == module)
            .map(|(selector, _)| *selector)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Selector, &ModuleRef)> {
        self.routes.iter()
    }
}
