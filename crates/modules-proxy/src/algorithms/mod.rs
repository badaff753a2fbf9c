//! Algorithms for the Modules Proxy
//!
//! - Reserved selector denylist
//! - Clash detection (pure query over the selector table)

pub mod clash_detector;
pub mod reserved;

pub use clash_detector::{can_add, check_clashes, coverage_diff};
pub use reserved::{ReservedSelectors, ROUTER_FUNCTION_SIGNATURES};
