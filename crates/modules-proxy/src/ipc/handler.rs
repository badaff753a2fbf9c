//! IPC Handler for the Modules Proxy
//!
//! ## Security Boundaries
//!
//! - MUST reject envelopes with an unsupported version
//! - MUST take the caller from the envelope sender only
//! - Governance checks happen in the service, before any validation

use crate::application::registry::ModulesProxyService;
use crate::domain::{Address, ProxyError, Selector};
use crate::ipc::payloads::{ProxyRequest, ProxyResponse, UpgradeLogRecord};
use crate::ports::inbound::ModulesProxyApi;
use crate::ports::outbound::{ModuleHandle, ModuleSource};
use shared_types::GovernanceEnvelope;
use std::sync::Arc;
use tracing::{debug, info, warn, Level};
use uuid::Uuid;

/// IPC Handler for the Modules Proxy.
///
/// Validates the envelope, resolves module addresses and delegates to the
/// service.
pub struct ModulesProxyHandler<S> {
    service: Arc<ModulesProxyService<S>>,
    modules: Arc<dyn ModuleSource<S>>,
}

impl<S: 'static> ModulesProxyHandler<S> {
    pub fn new(service: Arc<ModulesProxyService<S>>, modules: Arc<dyn ModuleSource<S>>) -> Self {
        Self { service, modules }
    }

    /// Handle one governance request.
    pub fn handle(&self, envelope: GovernanceEnvelope<ProxyRequest>) -> ProxyResponse {
        let correlation_id = envelope.correlation_id;

        if let Err(e) = envelope.verify().into_result() {
            warn!("[mp] Rejected envelope {}: {}", correlation_id, e);
            return ProxyResponse::failed(correlation_id, e);
        }

        let caller = envelope.sender;
        let mutation = envelope.payload.is_mutation();
        if mutation {
            info!(
                "[mp] Processing {:?} from {:?}",
                envelope.payload, caller
            );
        }

        match self.dispatch(correlation_id, &caller, envelope.payload) {
            Ok(response) => {
                if mutation {
                    info!("[mp] ✓ Request {} committed", correlation_id);
                }
                response
            }
            Err(e) => {
                if failure_level(mutation) == Level::WARN {
                    warn!("[mp] ❌ Request {} rejected: {}", correlation_id, e);
                } else {
                    debug!("[mp] Query {} failed: {}", correlation_id, e);
                }
                failure_response(correlation_id, &e)
            }
        }
    }

    fn resolve(&self, raw: [u8; 20]) -> Result<ModuleHandle<S>, ProxyError> {
        let address = Address::from(raw);
        self.modules
            .resolve(&address)
            .ok_or(ProxyError::UnknownModuleAddress { address })
    }

    fn resolve_all(&self, raw: &[[u8; 20]]) -> Result<Vec<ModuleHandle<S>>, ProxyError> {
        raw.iter().map(|r| self.resolve(*r)).collect()
    }

    fn dispatch(
        &self,
        correlation_id: Uuid,
        caller: &Address,
        request: ProxyRequest,
    ) -> Result<ProxyResponse, ProxyError> {
        let service = self.service.as_ref();
        let mut response = ProxyResponse::ok(correlation_id);

        match request {
            ProxyRequest::AddModule { module } => {
                service.add_module(caller, self.resolve(module)?)?;
            }
            ProxyRequest::AddModules { modules } => {
                service.add_modules(caller, self.resolve_all(&modules)?)?;
            }
            ProxyRequest::RemoveModule { module } => {
                service.remove_module(caller, Address::from(module))?;
            }
            ProxyRequest::RemoveModules { modules } => {
                service.remove_modules(caller, modules.into_iter().map(Address::from).collect())?;
            }
            ProxyRequest::ReplaceModule { from, to } => {
                service.replace_module(caller, Address::from(from), self.resolve(to)?)?;
            }
            ProxyRequest::ReplaceModules { from, to } => {
                let to = self.resolve_all(&to)?;
                service.replace_modules(caller, from.into_iter().map(Address::from).collect(), to)?;
            }
            ProxyRequest::SetProxyOwner { new_owner } => {
                service.transfer_ownership(caller, Address::from(new_owner))?;
            }
            ProxyRequest::GetProxyOwner => {
                response.address = Some(service.proxy_owner().0);
            }
            ProxyRequest::CanAddModule { module } => {
                let handle = self.resolve(module)?;
                let report = service.check_clashing_func_selectors(&handle);
                response.success = service.can_add_module(&handle);
                response.offending_modules = report.clashing_modules().into_iter().map(|m| m.0).collect();
                response.reserved_selectors =
                    report.clashing_reserved_selectors().into_iter().map(|s| s.0).collect();
            }
            ProxyRequest::CanNotAddModules { modules } => {
                let handles = self.resolve_all(&modules)?;
                response.offending_modules = service
                    .can_not_add_modules(&handles)
                    .into_iter()
                    .map(|m| m.0)
                    .collect();
            }
            ProxyRequest::GetFunctionImplementation { selector } => {
                response.address = service
                    .get_function_implementation(&Selector::new(selector))
                    .map(|m| m.0);
            }
            ProxyRequest::ActiveModuleIndex { selector } => {
                response.index = Some(service.active_module_index(&Selector::new(selector)));
            }
            ProxyRequest::ModuleUpgradeLog { selector, index } => {
                let entry = service.module_upgrade_log(&Selector::new(selector), index)?;
                response.log_entry = Some(UpgradeLogRecord {
                    selector: entry.key.0,
                    index: entry.index,
                    implementation: entry.implementation.map(|m| m.0),
                    timestamp: entry.timestamp,
                });
            }
        }

        Ok(response)
    }
}

/// Rejected mutations are worth an operator's attention; failed queries
/// (unrouted selector, index past the log) are routine.
fn failure_level(mutation: bool) -> Level {
    if mutation {
        Level::WARN
    } else {
        Level::DEBUG
    }
}

/// Error response, carrying offending modules where the error names them.
fn failure_response(correlation_id: Uuid, error: &ProxyError) -> ProxyResponse {
    let mut response = ProxyResponse::failed(correlation_id, error);
    match error.root() {
        ProxyError::Clash { report, .. } | ProxyError::PartialOverlap { report, .. } => {
            response.offending_modules = report.clashing_modules().into_iter().map(|m| m.0).collect();
            response.reserved_selectors =
                report.clashing_reserved_selectors().into_iter().map(|s| s.0).collect();
        }
        _ => {}
    }
    response
}
