//! Closure-backed modules.
//!
//! Lets a module be assembled from one handler per function, which is how
//! deployment scripts and tests describe small facets.

use crate::domain::{Address, CallContext, ModuleError, ModuleRef, Selector};
use crate::ports::outbound::Module;
use std::collections::BTreeMap;

/// Handler for one function of a module.
pub type ModuleFn<S> =
    Box<dyn Fn(&mut S, &CallContext, &[u8]) -> Result<Vec<u8>, ModuleError> + Send + Sync>;

/// A module whose functions are closures.
pub struct FnModule<S> {
    address: Address,
    functions: BTreeMap<Selector, ModuleFn<S>>,
}

impl<S> FnModule<S> {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            functions: BTreeMap::new(),
        }
    }

    /// Add a function by canonical signature, e.g. `"deposit(uint256)"`.
    pub fn with_function<F>(self, signature: &str, f: F) -> Self
    where
        F: Fn(&mut S, &CallContext, &[u8]) -> Result<Vec<u8>, ModuleError> + Send + Sync + 'static,
    {
        self.with_selector(Selector::from_signature(signature), f)
    }

    /// Add a function by raw selector.
    pub fn with_selector<F>(mut self, selector: Selector, f: F) -> Self
    where
        F: Fn(&mut S, &CallContext, &[u8]) -> Result<Vec<u8>, ModuleError> + Send + Sync + 'static,
    {
        self.functions.insert(selector, Box::new(f));
        self
    }
}

impl<S> Module<S> for FnModule<S> {
    fn address(&self) -> ModuleRef {
        self.address
    }

    fn selectors(&self) -> Vec<Selector> {
        self.functions.keys().copied().collect()
    }

    fn call(
        &self,
        state: &mut S,
        ctx: &CallContext,
        calldata: &[u8],
    ) -> Result<Vec<u8>, ModuleError> {
        match self.functions.get(&ctx.selector) {
            Some(f) => f(state, ctx, calldata),
            None => Err(ModuleError::NotImplemented(ctx.selector)),
        }
    }
}
