//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound ports: governance authority, clocks, a module
//! directory, and closure-backed modules.

mod authority;
mod clock;
mod fn_module;
mod module_source;

pub use authority::SingleOwnerAuthority;
pub use clock::{ManualClock, SystemClock};
pub use fn_module::{FnModule, ModuleFn};
pub use module_source::InMemoryModuleSource;
