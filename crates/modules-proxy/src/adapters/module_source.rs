//! In-memory module directory.

use crate::domain::Address;
use crate::ports::outbound::{ModuleHandle, ModuleSource};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Deployed modules keyed by address.
pub struct InMemoryModuleSource<S> {
    modules: RwLock<HashMap<Address, ModuleHandle<S>>>,
}

impl<S> InMemoryModuleSource<S> {
    pub fn new() -> Self {
        Self {
            modules: RwLock::new(HashMap::new()),
        }
    }

    /// Make `module` resolvable at its own address.
    pub fn deploy(&self, module: ModuleHandle<S>) {
        let address = module.address();
        debug!(?address, "Module deployed");
        self.modules.write().insert(address, module);
    }

    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }
}

impl<S> Default for InMemoryModuleSource<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> ModuleSource<S> for InMemoryModuleSource<S> {
    fn resolve(&self, address: &Address) -> Option<ModuleHandle<S>> {
        self.modules.read().get(address).cloned()
    }
}
