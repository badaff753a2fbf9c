//! # Modules Proxy
//!
//! Selector-routed dispatch registry: one proxy address behaves as the union
//! of several independently deployed modules, chosen by function selector,
//! with clash detection, atomic batch upgrades and a per-function upgrade
//! history. A name-keyed logic beacon shares the same history store.
//!
//! ## Architecture
//!
//! - **Domain**: Selector table, upgrade log, clash report, errors, invariants
//! - **Algorithms**: Clash detection, coverage diff, reserved router selectors
//! - **Ports**: Inbound (ModulesProxyApi, BeaconApi, RouteResolver) and
//!   Outbound (Module, GovernanceAuthority, Clock, ModuleSource, EventPublisher)
//! - **Adapters**: Single-owner authority, clocks, module directory, closure modules
//! - **Application**: Registry service, dispatcher, beacon
//! - **IPC**: Handler for governance envelopes
//!
//! ## Concurrency
//!
//! Mutations are serialized by one writer lock and build a complete
//! replacement snapshot; readers load the current snapshot without locking
//! and never observe a half-applied batch.

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ipc;
pub mod ports;

pub use adapters::{FnModule, InMemoryModuleSource, ManualClock, SingleOwnerAuthority, SystemClock};
pub use algorithms::{can_add, check_clashes, coverage_diff, ReservedSelectors};
pub use application::{Dispatcher, LogicBeacon, ModulesProxyService, RegistrySnapshot};
pub use config::{ConfigError, ProxyConfig};
pub use domain::entities::*;
pub use domain::errors::{ModuleError, ProxyError};
pub use domain::value_objects::*;
pub use domain::{SelectorTable, UpgradeLog, UpgradeLogEntry};
pub use ipc::{ModulesProxyHandler, ProxyRequest, ProxyResponse};
pub use ports::inbound::{BeaconApi, ModulesProxyApi, RouteResolver};
pub use ports::outbound::{Clock, GovernanceAuthority, Module, ModuleHandle, ModuleSource};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
