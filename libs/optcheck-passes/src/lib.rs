//! Reference optimization passes for the fixture harness.
//!
//! These operate on a line-oriented three-address IR text (see [`ir`]).
//! The harness itself treats them as opaque [`OptimizationPass`]
//! implementations; nothing in `optcheck-core` depends on this crate.

pub mod ir;

mod cse;
mod tran;

pub use cse::CommonSubexprElimination;
pub use tran::TranToTranElimination;

use optcheck_core::OptimizationPass;
use std::sync::Arc;

/// Look up a pass by the name used in the suite table.
pub fn lookup(name: &str) -> Option<Arc<dyn OptimizationPass>> {
    match name {
        "common-subexpr" => Some(Arc::new(CommonSubexprElimination)),
        "tran-to-tran" => Some(Arc::new(TranToTranElimination)),
        _ => None,
    }
}

/// Names accepted by [`lookup`], for error messages.
pub fn known_passes() -> &'static [&'static str] {
    &["common-subexpr", "tran-to-tran"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_knows_both_kinds() {
        for name in known_passes() {
            let pass = lookup(name).expect("registered pass");
            assert_eq!(pass.name(), *name);
        }
        assert!(lookup("loop-unroll").is_none());
    }
}
