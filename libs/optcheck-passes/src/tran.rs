//! Translation-to-translation elimination over the textual IR.
//!
//! A `tran` whose source is itself the destination of an earlier `tran`
//! is redundant: the chain collapses onto the original value. Sources
//! are resolved to their chain root at definition time, so one
//! application already reaches the fixed point.

use crate::ir::{parse_program, render_program, Statement};
use optcheck_core::OptimizationPass;
use std::collections::HashMap;

pub struct TranToTranElimination;

impl OptimizationPass for TranToTranElimination {
    fn name(&self) -> &str {
        "tran-to-tran"
    }

    fn apply(&self, input: &str) -> anyhow::Result<String> {
        let mut statements = parse_program(input)?;
        eliminate(&mut statements);
        Ok(render_program(&statements))
    }
}

fn eliminate(statements: &mut [Statement]) {
    // tran destination -> chain root of its source. Values are always
    // fully resolved, so a lookup never needs to walk a chain.
    let mut roots: HashMap<String, String> = HashMap::new();

    for stmt in statements.iter_mut() {
        let Some(dest) = stmt.dest().map(str::to_string) else {
            continue;
        };

        // Any redefinition stales both the destination's own entry and
        // every chain rooted at it.
        roots.retain(|_, root| *root != dest);
        roots.remove(&dest);

        if let Statement::Tran { src, .. } = stmt {
            if let Some(root) = roots.get(src.as_str()) {
                *src = root.clone();
            }
            if *src != dest {
                roots.insert(dest, src.clone());
            }
        }
    }
}
