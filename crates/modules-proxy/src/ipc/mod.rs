//! IPC layer for the Modules Proxy
//!
//! Governance requests arrive wrapped in a `GovernanceEnvelope`.

pub mod handler;
pub mod payloads;

pub use handler::ModulesProxyHandler;
pub use payloads::{ProxyRequest, ProxyResponse, UpgradeLogRecord};
