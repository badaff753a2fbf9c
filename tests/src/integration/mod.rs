//! # Integration Flows
//!
//! Shared fixtures for the cross-crate tests.

pub mod beacon_flows;
pub mod concurrency;
pub mod governance_flows;

use modules_proxy::{Address, FnModule, ModuleHandle};
use std::sync::Arc;

/// Governance account used across the suite.
pub fn governance() -> Address {
    Address::repeat_byte(0xEE)
}

/// Module at `0x{b}{b}..` answering every signature with its own tag.
pub fn tagged_module<S: 'static>(b: u8, signatures: &[&str]) -> ModuleHandle<S> {
    let mut module = FnModule::<S>::new(Address::repeat_byte(b));
    for sig in signatures {
        module = module.with_function(sig, move |_, _, _| Ok(vec![b]));
    }
    Arc::new(module)
}

/// Call data for `signature` with no arguments.
pub fn calldata(signature: &str) -> Vec<u8> {
    modules_proxy::Selector::from_signature(signature).0.to_vec()
}

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
