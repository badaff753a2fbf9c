//! Logic Beacon
//!
//! Name-keyed registry: each module name points at one implementation, and
//! selectors route to names. Many routers resolve through one beacon, so an
//! upgrade here reaches all of them at once.
//!
//! No clash detection: registering under a name is a governance decision on
//! that name alone.

use crate::adapters::SystemClock;
use crate::domain::{
    Address, LogIndex, ModuleName, ModuleRef, ProxyError, Selector, UpgradeLog, UpgradeLogEntry,
};
use crate::ports::inbound::{BeaconApi, RouteResolver};
use crate::ports::outbound::{Clock, EventPublisher, GovernanceAuthority, ModuleHandle};
use parking_lot::RwLock;
use shared_bus::RegistryEvent;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

struct BeaconState<S> {
    log: UpgradeLog<ModuleName>,
    implementations: HashMap<ModuleRef, ModuleHandle<S>>,
    routes: HashMap<Selector, ModuleName>,
    paused: bool,
}

impl<S> BeaconState<S> {
    /// Point every selector of `implementation` at `name`, dropping routes
    /// the name held before.
    fn reroute(&mut self, name: ModuleName, implementation: &ModuleHandle<S>) {
        self.routes.retain(|_, routed| *routed != name);
        for selector in implementation.selectors() {
            if let Some(previous) = self.routes.insert(selector, name) {
                warn!(%selector, %previous, %name, "Selector moved between beacon names");
            }
        }
    }

    fn resolve_name(&self, selector: &Selector) -> Result<ModuleName, ProxyError> {
        if self.paused {
            return Err(ProxyError::BeaconPaused);
        }
        self.routes
            .get(selector)
            .copied()
            .ok_or(ProxyError::UnroutedFunction {
                selector: *selector,
            })
    }

    fn active_for(&self, name: &ModuleName) -> Result<ModuleRef, ProxyError> {
        self.log
            .active_implementation(name)
            .ok_or(ProxyError::UnknownModuleName { name: *name })
    }
}

/// Shared logic beacon.
pub struct LogicBeacon<S> {
    address: Address,
    state: RwLock<BeaconState<S>>,
    authority: Arc<dyn GovernanceAuthority>,
    clock: Arc<dyn Clock>,
    events: Option<Arc<dyn EventPublisher>>,
}

impl<S: 'static> LogicBeacon<S> {
    pub fn new(address: Address, authority: Arc<dyn GovernanceAuthority>) -> Self {
        Self {
            address,
            state: RwLock::new(BeaconState {
                log: UpgradeLog::new(),
                implementations: HashMap::new(),
                routes: HashMap::new(),
                paused: false,
            }),
            authority,
            clock: Arc::new(SystemClock),
            events: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn authorize(&self, caller: &Address, operation: &'static str) -> Result<(), ProxyError> {
        if self.authority.is_authorized(caller) {
            return Ok(());
        }
        warn!(?caller, operation, "Unauthorized beacon mutation");
        Err(ProxyError::Unauthorized { caller: *caller })
    }

    /// Called with the state write guard held so events leave in log order.
    fn publish(&self, event: RegistryEvent) {
        if let Some(events) = &self.events {
            events.publish(event);
        }
    }

    fn set_paused(&self, caller: &Address, paused: bool) -> Result<(), ProxyError> {
        let mut state = self.state.write();
        self.authorize(caller, if paused { "pause" } else { "unpause" })?;
        if state.paused == paused {
            return Ok(());
        }
        state.paused = paused;
        info!(paused, "Beacon pause state changed");
        self.publish(RegistryEvent::BeaconPauseChanged {
            proxy: self.address,
            paused,
        });
        Ok(())
    }
}

impl<S: 'static> BeaconApi<S> for LogicBeacon<S> {
    fn register_module(
        &self,
        caller: &Address,
        name: ModuleName,
        implementation: ModuleHandle<S>,
    ) -> Result<LogIndex, ProxyError> {
        let mut state = self.state.write();
        self.authorize(caller, "register_module")?;

        let address = implementation.address();
        if state.log.active_implementation(&name) == Some(address) {
            debug!(%name, "Implementation already active");
            return Ok(state.log.active_index(&name));
        }

        let index = state.log.append(name, Some(address), self.clock.now());
        state.reroute(name, &implementation);
        state.implementations.insert(address, implementation);
        info!(%name, implementation = ?address, index, "Beacon module registered");
        self.publish(RegistryEvent::BeaconModuleRegistered {
            proxy: self.address,
            name,
            implementation: address,
            index,
        });
        Ok(index)
    }

    fn rollback(
        &self,
        caller: &Address,
        name: ModuleName,
        index: LogIndex,
    ) -> Result<LogIndex, ProxyError> {
        let mut state = self.state.write();
        self.authorize(caller, "rollback")?;

        let len = state.log.len_for(&name);
        if len == 0 {
            return Err(ProxyError::UnknownModuleName { name });
        }
        let target = state
            .log
            .entry(&name, index)
            .and_then(|entry| entry.implementation)
            .ok_or(ProxyError::LogIndexOutOfRange { index, len })?;

        if state.log.active_implementation(&name) == Some(target) {
            return Ok(state.log.active_index(&name));
        }

        let handle = state
            .implementations
            .get(&target)
            .cloned()
            .ok_or(ProxyError::UnknownModuleAddress { address: target })?;
        let new_index = state.log.append(name, Some(target), self.clock.now());
        state.reroute(name, &handle);
        info!(%name, from_index = index, new_index, "Beacon module rolled back");
        self.publish(RegistryEvent::BeaconModuleRegistered {
            proxy: self.address,
            name,
            implementation: target,
            index: new_index,
        });
        Ok(new_index)
    }

    fn pause(&self, caller: &Address) -> Result<(), ProxyError> {
        self.set_paused(caller, true)
    }

    fn unpause(&self, caller: &Address) -> Result<(), ProxyError> {
        self.set_paused(caller, false)
    }

    fn get_target(&self, selector: &Selector) -> Result<ModuleRef, ProxyError> {
        let state = self.state.read();
        let name = state.resolve_name(selector)?;
        state.active_for(&name)
    }

    fn is_paused(&self) -> bool {
        self.state.read().paused
    }

    fn active_implementation(&self, name: &ModuleName) -> Option<ModuleRef> {
        self.state.read().log.active_implementation(name)
    }

    fn active_module_index(&self, name: &ModuleName) -> LogIndex {
        self.state.read().log.active_index(name)
    }

    fn module_upgrade_log(
        &self,
        name: &ModuleName,
        index: LogIndex,
    ) -> Result<UpgradeLogEntry<ModuleName>, ProxyError> {
        let state = self.state.read();
        state
            .log
            .entry(name, index)
            .cloned()
            .ok_or(ProxyError::LogIndexOutOfRange {
                index,
                len: state.log.len_for(name),
            })
    }
}

impl<S: 'static> RouteResolver<S> for LogicBeacon<S> {
    fn resolve(&self, selector: &Selector) -> Result<ModuleHandle<S>, ProxyError> {
        let state = self.state.read();
        let name = state.resolve_name(selector)?;
        let address = state.active_for(&name)?;
        state
            .implementations
            .get(&address)
            .cloned()
            .ok_or(ProxyError::UnknownModuleAddress { address })
    }
}
