//! IPC Payloads for the Modules Proxy
//!
//! ## Security (Envelope-Only Identity)
//!
//! Payloads contain NO caller identity fields. The caller is taken solely
//! from the `GovernanceEnvelope` sender.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================
// INCOMING REQUESTS
// ============================================================

/// Governance and tooling requests, one per router entry point.
///
/// Modules are named by deployed address and resolved through the
/// handler's module directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProxyRequest {
    AddModule { module: [u8; 20] },
    AddModules { modules: Vec<[u8; 20]> },
    RemoveModule { module: [u8; 20] },
    RemoveModules { modules: Vec<[u8; 20]> },
    ReplaceModule { from: [u8; 20], to: [u8; 20] },
    ReplaceModules { from: Vec<[u8; 20]>, to: Vec<[u8; 20]> },
    SetProxyOwner { new_owner: [u8; 20] },
    GetProxyOwner,
    CanAddModule { module: [u8; 20] },
    CanNotAddModules { modules: Vec<[u8; 20]> },
    GetFunctionImplementation { selector: [u8; 4] },
    ActiveModuleIndex { selector: [u8; 4] },
    ModuleUpgradeLog { selector: [u8; 4], index: u64 },
}

impl ProxyRequest {
    /// Whether the request changes registry state.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            ProxyRequest::AddModule { .. }
                | ProxyRequest::AddModules { .. }
                | ProxyRequest::RemoveModule { .. }
                | ProxyRequest::RemoveModules { .. }
                | ProxyRequest::ReplaceModule { .. }
                | ProxyRequest::ReplaceModules { .. }
                | ProxyRequest::SetProxyOwner { .. }
        )
    }
}

// ============================================================
// OUTGOING RESPONSES
// ============================================================

/// Response to a `ProxyRequest`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyResponse {
    /// Correlation ID from the request envelope
    pub correlation_id: Uuid,
    /// Whether the request succeeded
    pub success: bool,
    /// Error message (if failed)
    pub error: Option<String>,
    /// Modules that could not be added, or that clash with the candidate
    pub offending_modules: Vec<[u8; 20]>,
    /// Router selectors the candidate tried to claim
    pub reserved_selectors: Vec<[u8; 4]>,
    /// Address answer (implementation or owner)
    pub address: Option<[u8; 20]>,
    /// Numeric answer (active index)
    pub index: Option<u64>,
    /// Log row answer
    pub log_entry: Option<UpgradeLogRecord>,
}

impl ProxyResponse {
    pub fn ok(correlation_id: Uuid) -> Self {
        Self {
            correlation_id,
            success: true,
            ..Default::default()
        }
    }

    pub fn failed(correlation_id: Uuid, error: impl ToString) -> Self {
        Self {
            correlation_id,
            success: false,
            error: Some(error.to_string()),
            ..Default::default()
        }
    }
}

/// Wire form of one upgrade log row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLogRecord {
    pub selector: [u8; 4],
    pub index: u64,
    /// `None` marks a removal.
    pub implementation: Option<[u8; 20]>,
    pub timestamp: u64,
}
