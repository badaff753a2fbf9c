//! Inbound Ports (Driving Ports / API)

use crate::domain::entities::ClashReport;
use crate::domain::errors::ProxyError;
use crate::domain::upgrade_log::UpgradeLogEntry;
use crate::domain::value_objects::{Address, LogIndex, ModuleName, ModuleRef, Selector};
use crate::ports::outbound::ModuleHandle;
use std::collections::BTreeSet;

/// Selector-routed registry surface consumed by governance and deployment
/// tooling.
///
/// Mutations take the caller explicitly and check it before touching any
/// state. Queries are open to everyone.
pub trait ModulesProxyApi<S>: Send + Sync {
    /// Add one module. A no-op when the module is already fully active.
    fn add_module(&self, caller: &Address, module: ModuleHandle<S>) -> Result<(), ProxyError>;

    /// Add several modules, all or nothing.
    fn add_modules(&self, caller: &Address, modules: Vec<ModuleHandle<S>>)
        -> Result<(), ProxyError>;

    /// Remove a module's full coverage.
    fn remove_module(&self, caller: &Address, module: ModuleRef) -> Result<(), ProxyError>;

    /// Remove several modules, all or nothing.
    fn remove_modules(&self, caller: &Address, modules: Vec<ModuleRef>) -> Result<(), ProxyError>;

    /// Swap `from` for `to`; `to` must declare exactly `from`'s coverage.
    fn replace_module(
        &self,
        caller: &Address,
        from: ModuleRef,
        to: ModuleHandle<S>,
    ) -> Result<(), ProxyError>;

    /// Swap several pairs, all or nothing.
    fn replace_modules(
        &self,
        caller: &Address,
        from: Vec<ModuleRef>,
        to: Vec<ModuleHandle<S>>,
    ) -> Result<(), ProxyError>;

    /// Pure clash pre-check.
    fn can_add_module(&self, module: &ModuleHandle<S>) -> bool;

    /// Batched pre-check: the modules that could not be added.
    fn can_not_add_modules(&self, modules: &[ModuleHandle<S>]) -> Vec<ModuleRef>;

    /// Diagnostic detail behind `can_add_module`.
    fn check_clashing_func_selectors(&self, module: &ModuleHandle<S>) -> ClashReport;

    /// Active implementation, `None` when unrouted.
    fn get_function_implementation(&self, selector: &Selector) -> Option<ModuleRef>;

    /// Current upgrade log pointer, `0` if never registered.
    fn active_module_index(&self, selector: &Selector) -> LogIndex;

    /// Audit history row.
    fn module_upgrade_log(
        &self,
        selector: &Selector,
        index: LogIndex,
    ) -> Result<UpgradeLogEntry<Selector>, ProxyError>;

    /// Modules owning at least one selector.
    fn registered_modules(&self) -> Vec<ModuleRef>;

    /// Selectors recorded for `module` at registration, `None` if unknown.
    fn module_selectors(&self, module: &ModuleRef) -> Option<BTreeSet<Selector>>;

    /// Whether `module` currently routes its whole declared set.
    fn is_module_active(&self, module: &ModuleRef) -> bool;

    /// Current governance holder.
    fn proxy_owner(&self) -> Address;

    /// Hand governance to `new_owner`.
    fn transfer_ownership(&self, caller: &Address, new_owner: Address) -> Result<(), ProxyError>;
}

/// Name-keyed registry surface.
pub trait BeaconApi<S>: Send + Sync {
    /// Point `name` at `implementation`. Returns the active index.
    fn register_module(
        &self,
        caller: &Address,
        name: ModuleName,
        implementation: ModuleHandle<S>,
    ) -> Result<LogIndex, ProxyError>;

    /// Re-activate the implementation recorded at `index`. Returns the new
    /// active index.
    fn rollback(&self, caller: &Address, name: ModuleName, index: LogIndex)
        -> Result<LogIndex, ProxyError>;

    /// Stop resolving targets.
    fn pause(&self, caller: &Address) -> Result<(), ProxyError>;

    /// Resume resolving targets.
    fn unpause(&self, caller: &Address) -> Result<(), ProxyError>;

    /// Route `selector` to the implementation active for its module name.
    fn get_target(&self, selector: &Selector) -> Result<ModuleRef, ProxyError>;

    /// Whether target resolution is paused.
    fn is_paused(&self) -> bool;

    /// Implementation active for `name`.
    fn active_implementation(&self, name: &ModuleName) -> Option<ModuleRef>;

    /// Current log pointer for `name`.
    fn active_module_index(&self, name: &ModuleName) -> LogIndex;

    /// Audit history row for `name`.
    fn module_upgrade_log(
        &self,
        name: &ModuleName,
        index: LogIndex,
    ) -> Result<UpgradeLogEntry<ModuleName>, ProxyError>;
}

/// Resolution step of the dispatch path.
pub trait RouteResolver<S>: Send + Sync {
    /// Module that must handle `selector`.
    fn resolve(&self, selector: &Selector) -> Result<ModuleHandle<S>, ProxyError>;
}
