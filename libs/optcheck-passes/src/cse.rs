//! Common-subexpression elimination over the textual IR.
//!
//! Forward scan with a table of available expressions. The first
//! definition of a pure binary expression is remembered; a later
//! identical right-hand side is rewritten into a copy of the first
//! destination. Redefining any variable kills every remembered
//! expression that mentions it.
//!
//! Idempotent: a rewritten statement is a copy, which never matches a
//! remembered binary expression, so a second application changes nothing.

use crate::ir::{parse_program, render_program, Statement};
use optcheck_core::OptimizationPass;
use std::collections::HashMap;

pub struct CommonSubexprElimination;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ExprKey {
    op: String,
    lhs: String,
    rhs: String,
}

impl OptimizationPass for CommonSubexprElimination {
    fn name(&self) -> &str {
        "common-subexpr"
    }

    fn apply(&self, input: &str) -> anyhow::Result<String> {
        let mut statements = parse_program(input)?;
        eliminate(&mut statements);
        Ok(render_program(&statements))
    }
}

fn eliminate(statements: &mut [Statement]) {
    // Expression -> destination of its first (still valid) computation.
    let mut available: HashMap<ExprKey, String> = HashMap::new();

    for stmt in statements.iter_mut() {
        let Some(dest) = stmt.dest().map(str::to_string) else {
            continue;
        };

        let replacement = match stmt {
            Statement::Binary { op, lhs, rhs, .. } => {
                let key = ExprKey {
                    op: op.clone(),
                    lhs: lhs.clone(),
                    rhs: rhs.clone(),
                };
                available.get(&key).cloned().map(|src| (key, src))
            }
            _ => None,
        };

        // Redefining `dest` invalidates every expression mentioning it,
        // including the one it previously computed.
        available
            .retain(|key, value| key.lhs != dest && key.rhs != dest && *value != dest);

        match replacement {
            Some((_, src)) => {
                *stmt = Statement::Copy {
                    dest: dest.clone(),
                    src,
                };
            }
            None => {
                if let Statement::Binary { op, lhs, rhs, .. } = stmt {
                    // A self-referential expression computes a new value,
                    // so it must not become available under its own name.
                    if *lhs != dest && *rhs != dest {
                        available.insert(
                            ExprKey {
                                op: op.clone(),
                                lhs: lhs.clone(),
                                rhs: rhs.clone(),
                            },
                            dest,
                        );
                    }
                }
            }
        }
    }
}
