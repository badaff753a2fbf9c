//! Modules Proxy Service
//!
//! Main service implementing `ModulesProxyApi` and the selector half of
//! `RouteResolver`.

use crate::adapters::SystemClock;
use crate::algorithms::ReservedSelectors;
use crate::application::snapshot::{MutationRules, RegistryChange, RegistrySnapshot};
use crate::config::ProxyConfig;
use crate::domain::{
    Address, ClashReport, LogIndex, ModuleRef, ProxyError, Selector, UpgradeLogEntry,
};
use crate::ports::inbound::{ModulesProxyApi, RouteResolver};
use crate::ports::outbound::{Clock, EventPublisher, GovernanceAuthority, ModuleHandle};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use shared_bus::RegistryEvent;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Modules Proxy Service
///
/// Every mutation follows the same pipeline:
/// 1. Take the writer lock
/// 2. Check the caller against the governance authority
/// 3. Validate and apply on a private copy of the current snapshot
/// 4. Publish the copy with one atomic store
/// 5. Emit events
///
/// Readers never take the lock.
pub struct ModulesProxyService<S> {
    proxy: Address,
    config: ProxyConfig,
    reserved: ReservedSelectors,
    snapshot: ArcSwap<RegistrySnapshot<S>>,
    write_lock: Mutex<()>,
    authority: Arc<dyn GovernanceAuthority>,
    clock: Arc<dyn Clock>,
    events: Option<Arc<dyn EventPublisher>>,
}

impl<S: 'static> ModulesProxyService<S> {
    /// Create an empty proxy at `proxy` governed by `authority`.
    pub fn new(proxy: Address, authority: Arc<dyn GovernanceAuthority>) -> Self {
        Self {
            proxy,
            config: ProxyConfig::default(),
            reserved: ReservedSelectors::router_defaults(),
            snapshot: ArcSwap::from_pointee(RegistrySnapshot::default()),
            write_lock: Mutex::new(()),
            authority,
            clock: Arc::new(SystemClock),
            events: None,
        }
    }

    /// Replace the configuration; extra reserved selectors extend the
    /// router's own.
    pub fn with_config(mut self, config: ProxyConfig) -> Self {
        self.reserved = ReservedSelectors::with_extra(config.extra_reserved_selectors.clone());
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Publish committed changes to `events`.
    pub fn with_events(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn address(&self) -> Address {
        self.proxy
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn reserved(&self) -> &ReservedSelectors {
        &self.reserved
    }

    /// Current immutable snapshot.
    pub fn snapshot(&self) -> Arc<RegistrySnapshot<S>> {
        self.snapshot.load_full()
    }

    fn check_batch_size(&self, size: usize) -> Result<(), ProxyError> {
        if size > self.config.max_batch_size {
            return Err(ProxyError::BatchTooLarge {
                size,
                max: self.config.max_batch_size,
            });
        }
        Ok(())
    }

    /// Run `apply` against a private copy and publish the result.
    fn commit<F>(&self, caller: &Address, operation: &'static str, apply: F) -> Result<(), ProxyError>
    where
        F: FnOnce(&mut RegistrySnapshot<S>, &MutationRules<'_>) -> Result<Vec<RegistryChange>, ProxyError>,
    {
        let _guard = self.write_lock.lock();

        if !self.authority.is_authorized(caller) {
            warn!(?caller, operation, "Unauthorized registry mutation");
            return Err(ProxyError::Unauthorized { caller: *caller });
        }

        let rules = MutationRules {
            reserved: &self.reserved,
            max_selectors_per_module: self.config.max_selectors_per_module,
            now: self.clock.now(),
        };

        let mut draft = RegistrySnapshot::clone(&self.snapshot.load());
        let changes = match apply(&mut draft, &rules) {
            Ok(changes) => changes,
            Err(e) => {
                warn!(operation, error = %e, "Registry mutation rejected");
                return Err(e);
            }
        };

        if changes.is_empty() {
            debug!(operation, "Registry mutation was a no-op");
            return Ok(());
        }

        self.snapshot.store(Arc::new(draft));
        info!(
            operation,
            changes = changes.len(),
            routed = self.snapshot.load().table().len(),
            "Registry mutation committed"
        );

        for change in changes {
            for event in change.into_events(self.proxy) {
                self.publish(event);
            }
        }
        Ok(())
    }

    fn publish(&self, event: RegistryEvent) {
        if let Some(events) = &self.events {
            let receivers = events.publish(event);
            debug!(receivers, "Registry event published");
        }
    }
}

impl<S: 'static> ModulesProxyApi<S> for ModulesProxyService<S> {
    fn add_module(&self, caller: &Address, module: ModuleHandle<S>) -> Result<(), ProxyError> {
        self.commit(caller, "add_module", |draft, rules| {
            Ok(draft.apply_add(module, rules)?.into_iter().collect())
        })
    }

    fn add_modules(
        &self,
        caller: &Address,
        modules: Vec<ModuleHandle<S>>,
    ) -> Result<(), ProxyError> {
        self.commit(caller, "add_modules", |draft, rules| {
            self.check_batch_size(modules.len())?;
            let mut changes = Vec::with_capacity(modules.len());
            for (index, module) in modules.into_iter().enumerate() {
                let change = draft
                    .apply_add(module, rules)
                    .map_err(|e| ProxyError::batch_abort(index, e))?;
                changes.extend(change);
            }
            Ok(changes)
        })
    }

    fn remove_module(&self, caller: &Address, module: ModuleRef) -> Result<(), ProxyError> {
        self.commit(caller, "remove_module", |draft, rules| {
            Ok(vec![draft.apply_remove(module, rules)?])
        })
    }

    fn remove_modules(&self, caller: &Address, modules: Vec<ModuleRef>) -> Result<(), ProxyError> {
        self.commit(caller, "remove_modules", |draft, rules| {
            self.check_batch_size(modules.len())?;
            modules
                .into_iter()
                .enumerate()
                .map(|(index, module)| {
                    draft
                        .apply_remove(module, rules)
                        .map_err(|e| ProxyError::batch_abort(index, e))
                })
                .collect()
        })
    }

    fn replace_module(
        &self,
        caller: &Address,
        from: ModuleRef,
        to: ModuleHandle<S>,
    ) -> Result<(), ProxyError> {
        self.commit(caller, "replace_module", |draft, rules| {
            Ok(draft.apply_replace(from, to, rules)?.into_iter().collect())
        })
    }

    fn replace_modules(
        &self,
        caller: &Address,
        from: Vec<ModuleRef>,
        to: Vec<ModuleHandle<S>>,
    ) -> Result<(), ProxyError> {
        self.commit(caller, "replace_modules", |draft, rules| {
            if from.len() != to.len() {
                return Err(ProxyError::BatchLengthMismatch {
                    from: from.len(),
                    to: to.len(),
                });
            }
            self.check_batch_size(from.len())?;

            let mut changes = Vec::with_capacity(from.len());
            for (index, (from, to)) in from.into_iter().zip(to).enumerate() {
                let change = draft
                    .apply_replace(from, to, rules)
                    .map_err(|e| ProxyError::batch_abort(index, e))?;
                changes.extend(change);
            }
            Ok(changes)
        })
    }

    fn can_add_module(&self, module: &ModuleHandle<S>) -> bool {
        let snapshot = self.snapshot.load();
        let descriptor = snapshot.descriptor_for(module);
        if descriptor.is_empty() || descriptor.len() > self.config.max_selectors_per_module {
            return false;
        }
        snapshot.clash_report(module, &self.reserved).can_add()
    }

    fn can_not_add_modules(&self, modules: &[ModuleHandle<S>]) -> Vec<ModuleRef> {
        modules
            .iter()
            .filter(|m| !self.can_add_module(m))
            .map(|m| m.address())
            .collect()
    }

    fn check_clashing_func_selectors(&self, module: &ModuleHandle<S>) -> ClashReport {
        self.snapshot.load().clash_report(module, &self.reserved)
    }

    fn get_function_implementation(&self, selector: &Selector) -> Option<ModuleRef> {
        self.snapshot.load().table().get(selector)
    }

    fn active_module_index(&self, selector: &Selector) -> LogIndex {
        self.snapshot.load().log().active_index(selector)
    }

    fn module_upgrade_log(
        &self,
        selector: &Selector,
        index: LogIndex,
    ) -> Result<UpgradeLogEntry<Selector>, ProxyError> {
        let snapshot = self.snapshot.load();
        let log = snapshot.log();
        log.entry(selector, index)
            .cloned()
            .ok_or(ProxyError::LogIndexOutOfRange {
                index,
                len: log.len_for(selector),
            })
    }

    fn registered_modules(&self) -> Vec<ModuleRef> {
        let mut modules: Vec<_> = self.snapshot.load().active_modules().copied().collect();
        modules.sort();
        modules
    }

    fn module_selectors(&self, module: &ModuleRef) -> Option<BTreeSet<Selector>> {
        self.snapshot
            .load()
            .descriptor(module)
            .map(|d| d.selectors.clone())
    }

    fn is_module_active(&self, module: &ModuleRef) -> bool {
        self.snapshot.load().is_active(module)
    }

    fn proxy_owner(&self) -> Address {
        self.authority.owner()
    }

    fn transfer_ownership(&self, caller: &Address, new_owner: Address) -> Result<(), ProxyError> {
        let _guard = self.write_lock.lock();
        let previous = self.authority.transfer(caller, new_owner)?;
        self.publish(RegistryEvent::OwnershipTransferred {
            proxy: self.proxy,
            previous,
            new_owner,
        });
        Ok(())
    }
}

impl<S: 'static> RouteResolver<S> for ModulesProxyService<S> {
    fn resolve(&self, selector: &Selector) -> Result<ModuleHandle<S>, ProxyError> {
        self.snapshot
            .load()
            .handle_for(selector)
            .ok_or(ProxyError::UnroutedFunction {
                selector: *selector,
            })
    }
}
