//! Dispatcher
//!
//! The fallback path of a router: read the selector, resolve it, forward the
//! whole call to the module with the router's state and the original caller.

use crate::domain::{Address, CallContext, ProxyError, Selector};
use crate::ports::inbound::RouteResolver;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, warn};

/// A router instance: its own address and state, routes from a resolver.
///
/// Several dispatchers may share one resolver, e.g. every loan token
/// instance resolving through the same beacon while keeping its own state.
pub struct Dispatcher<S> {
    address: Address,
    resolver: Arc<dyn RouteResolver<S>>,
    state: Mutex<S>,
}

impl<S> Dispatcher<S> {
    pub fn new(address: Address, resolver: Arc<dyn RouteResolver<S>>, state: S) -> Self {
        Self {
            address,
            resolver,
            state: Mutex::new(state),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Forward `calldata` to the module routed for its selector.
    ///
    /// Open to any caller. A module error leaves whatever the module wrote to
    /// the state before failing.
    pub fn dispatch(&self, caller: Address, calldata: &[u8]) -> Result<Vec<u8>, ProxyError> {
        let selector = Selector::from_calldata(calldata).ok_or(ProxyError::InvalidCalldata {
            len: calldata.len(),
        })?;

        let module = self.resolver.resolve(&selector).map_err(|e| {
            debug!(%selector, error = %e, "Dispatch unresolved");
            e
        })?;

        let ctx = CallContext {
            caller,
            proxy: self.address,
            selector,
        };

        let mut state = self.state.lock();
        module.call(&mut state, &ctx, calldata).map_err(|source| {
            warn!(%selector, module = ?module.address(), error = %source, "Module call failed");
            ProxyError::ModuleExecution {
                module: module.address(),
                source,
            }
        })
    }

    /// Read the router state.
    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.lock())
    }

    pub fn into_state(self) -> S {
        self.state.into_inner()
    }
}
