//! Ports module for the Modules Proxy
//!
//! Defines inbound (API) and outbound (SPI) port traits.

pub mod inbound;
pub mod outbound;

pub use inbound::{BeaconApi, ModulesProxyApi, RouteResolver};
pub use outbound::{
    Clock, EventPublisher, GovernanceAuthority, Module, ModuleHandle, ModuleSource,
};
