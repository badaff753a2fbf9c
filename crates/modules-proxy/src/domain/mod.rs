//! Domain module for the Modules Proxy
//!
//! Contains identifiers, the selector table, the upgrade log, errors, and
//! invariants.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod selector_table;
pub mod upgrade_log;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use selector_table::SelectorTable;
pub use upgrade_log::{UpgradeLog, UpgradeLogEntry};
pub use value_objects::*;
