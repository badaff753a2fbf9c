//! Application layer
//!
//! Services orchestrating the domain behind the inbound ports.

pub mod beacon;
pub mod dispatcher;
pub mod registry;
pub mod snapshot;

pub use beacon::LogicBeacon;
pub use dispatcher::Dispatcher;
pub use registry::ModulesProxyService;
pub use snapshot::{RegistryChange, RegistrySnapshot};
