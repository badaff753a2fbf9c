//! Registry Snapshot
//!
//! The complete routing state of one proxy. Readers hold an immutable
//! snapshot; writers mutate a private clone and publish it in one store.

use crate::algorithms::{check_clashes, coverage_diff, ReservedSelectors};
use crate::domain::{
    ClashReport, ClashVerdict, ModuleDescriptor, ModuleRef, ProxyError, Selector, SelectorTable,
    Timestamp, UpgradeLog,
};
use crate::ports::outbound::ModuleHandle;
use shared_bus::RegistryEvent;
use shared_types::Address;
use std::collections::HashMap;

/// A committed change, turned into bus events after publication.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryChange {
    Added {
        module: ModuleRef,
        selectors: Vec<Selector>,
    },
    Removed {
        module: ModuleRef,
        selectors: Vec<Selector>,
    },
    Replaced {
        from: ModuleRef,
        to: ModuleRef,
        selectors: Vec<Selector>,
    },
}

impl RegistryChange {
    /// Events announcing this change. A replacement is announced as a
    /// removal, an addition, and the replacement itself.
    pub fn into_events(self, proxy: Address) -> Vec<RegistryEvent> {
        match self {
            RegistryChange::Added { module, selectors } => vec![RegistryEvent::ModuleAdded {
                proxy,
                module,
                selectors,
            }],
            RegistryChange::Removed { module, selectors } => vec![RegistryEvent::ModuleRemoved {
                proxy,
                module,
                selectors,
            }],
            RegistryChange::Replaced {
                from,
                to,
                selectors,
            } => vec![
                RegistryEvent::ModuleRemoved {
                    proxy,
                    module: from,
                    selectors: selectors.clone(),
                },
                RegistryEvent::ModuleAdded {
                    proxy,
                    module: to,
                    selectors,
                },
                RegistryEvent::ModuleReplaced { proxy, from, to },
            ],
        }
    }
}

/// Limits applied while validating a mutation.
#[derive(Clone, Copy, Debug)]
pub struct MutationRules<'a> {
    pub reserved: &'a ReservedSelectors,
    pub max_selectors_per_module: usize,
    pub now: Timestamp,
}

/// Routing state of one proxy.
pub struct RegistrySnapshot<S> {
    table: SelectorTable,
    log: UpgradeLog<Selector>,
    /// Every module ever registered, with the selector set read at first
    /// registration.
    descriptors: HashMap<ModuleRef, ModuleDescriptor>,
    /// Modules currently owning their declared set.
    active: HashMap<ModuleRef, ModuleHandle<S>>,
}

impl<S> Clone for RegistrySnapshot<S> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            log: self.log.clone(),
            descriptors: self.descriptors.clone(),
            active: self.active.clone(),
        }
    }
}

impl<S> Default for RegistrySnapshot<S> {
    fn default() -> Self {
        Self {
            table: SelectorTable::new(),
            log: UpgradeLog::new(),
            descriptors: HashMap::new(),
            active: HashMap::new(),
        }
    }
}

impl<S> RegistrySnapshot<S> {
    pub fn table(&self) -> &SelectorTable {
        &self.table
    }

    pub fn log(&self) -> &UpgradeLog<Selector> {
        &self.log
    }

    /// Handle routed for `selector`.
    pub fn handle_for(&self, selector: &Selector) -> Option<ModuleHandle<S>> {
        let module = self.table.get(selector)?;
        self.active.get(&module).cloned()
    }

    /// Recorded descriptor, whether or not the module is active.
    pub fn descriptor(&self, module: &ModuleRef) -> Option<&ModuleDescriptor> {
        self.descriptors.get(module)
    }

    pub fn is_active(&self, module: &ModuleRef) -> bool {
        self.active.contains_key(module)
    }

    pub fn active_modules(&self) -> impl Iterator<Item = &ModuleRef> {
        self.active.keys()
    }

    /// Descriptors of active modules only.
    pub fn active_descriptors(&self) -> HashMap<ModuleRef, ModuleDescriptor> {
        self.active
            .keys()
            .filter_map(|m| self.descriptors.get(m).map(|d| (*m, d.clone())))
            .collect()
    }

    /// Recorded descriptor for a known module, otherwise read from the
    /// module itself.
    pub fn descriptor_for(&self, handle: &ModuleHandle<S>) -> ModuleDescriptor {
        let module = handle.address();
        match self.descriptors.get(&module) {
            Some(descriptor) => descriptor.clone(),
            None => ModuleDescriptor::new(module, handle.selectors()),
        }
    }

    /// Classify `handle` against the current table.
    pub fn clash_report(
        &self,
        handle: &ModuleHandle<S>,
        reserved: &ReservedSelectors,
    ) -> ClashReport {
        check_clashes(&self.descriptor_for(handle), &self.table, reserved)
    }

    fn validated_descriptor(
        &self,
        handle: &ModuleHandle<S>,
        max_selectors: usize,
    ) -> Result<ModuleDescriptor, ProxyError> {
        let descriptor = self.descriptor_for(handle);
        if descriptor.is_empty() {
            return Err(ProxyError::EmptyModule {
                module: descriptor.module,
            });
        }
        if descriptor.len() > max_selectors {
            return Err(ProxyError::TooManySelectors {
                module: descriptor.module,
                count: descriptor.len(),
                max: max_selectors,
            });
        }
        Ok(descriptor)
    }

    /// Route `handle`'s whole declared set to it.
    ///
    /// `Ok(None)` when the module is already fully active.
    pub fn apply_add(
        &mut self,
        handle: ModuleHandle<S>,
        rules: &MutationRules<'_>,
    ) -> Result<Option<RegistryChange>, ProxyError> {
        let descriptor = self.validated_descriptor(&handle, rules.max_selectors_per_module)?;
        let report = check_clashes(&descriptor, &self.table, rules.reserved);
        let module = descriptor.module;

        match report.verdict() {
            ClashVerdict::CleanAdd => {}
            ClashVerdict::AlreadyActive => return Ok(None),
            ClashVerdict::PartialOverlap { owner } => {
                return Err(ProxyError::PartialOverlap {
                    module,
                    owner,
                    report: Box::new(report),
                })
            }
            ClashVerdict::ReplaceCandidate { .. }
            | ClashVerdict::MultiOwnerClash
            | ClashVerdict::ReservedClash => {
                return Err(ProxyError::Clash {
                    module,
                    report: Box::new(report),
                })
            }
        }

        let selectors: Vec<Selector> = descriptor.selectors.iter().copied().collect();
        for selector in &selectors {
            self.table.assign(*selector, module);
            self.log.append(*selector, Some(module), rules.now);
        }
        self.descriptors.insert(module, descriptor);
        self.active.insert(module, handle);

        Ok(Some(RegistryChange::Added { module, selectors }))
    }

    /// Unroute everything `module` owns.
    pub fn apply_remove(
        &mut self,
        module: ModuleRef,
        rules: &MutationRules<'_>,
    ) -> Result<RegistryChange, ProxyError> {
        if self.active.remove(&module).is_none() {
            return Err(ProxyError::ModuleNotRegistered { module });
        }

        let selectors: Vec<Selector> = self.table.owned_by(&module).into_iter().collect();
        for selector in &selectors {
            self.table.clear(selector);
            self.log.append(*selector, None, rules.now);
        }

        Ok(RegistryChange::Removed { module, selectors })
    }

    /// Move `from`'s coverage to `to`, which must declare exactly that
    /// coverage. `Ok(None)` when both are the same module.
    pub fn apply_replace(
        &mut self,
        from: ModuleRef,
        to: ModuleHandle<S>,
        rules: &MutationRules<'_>,
    ) -> Result<Option<RegistryChange>, ProxyError> {
        if !self.active.contains_key(&from) {
            return Err(ProxyError::ModuleNotRegistered { module: from });
        }

        let to_ref = to.address();
        if to_ref == from {
            return Ok(None);
        }

        let descriptor = self.validated_descriptor(&to, rules.max_selectors_per_module)?;
        let owned = self.table.owned_by(&from);
        let (missing, extra) = coverage_diff(&owned, &descriptor.selectors);
        if !missing.is_empty() || !extra.is_empty() {
            return Err(ProxyError::CoverageMismatch {
                from,
                to: to_ref,
                missing,
                extra,
            });
        }

        let selectors: Vec<Selector> = owned.into_iter().collect();
        for selector in &selectors {
            self.table.assign(*selector, to_ref);
            self.log.append(*selector, Some(to_ref), rules.now);
        }
        self.active.remove(&from);
        self.descriptors.insert(to_ref, descriptor);
        self.active.insert(to_ref, to);

        Ok(Some(RegistryChange::Replaced {
            from,
            to: to_ref,
            selectors,
        }))
    }
}
