//! Line-oriented three-address IR text.
//!
//! Statement forms, one per line:
//! - `dest = lhs <op> rhs` with `<op>` one of `+ - * /`
//! - `dest = tran src` (type translation)
//! - `dest = src` (copy)
//!
//! Blank lines and `#` comment lines pass through untouched. Anything
//! else is a parse error naming its line number, which the harness
//! surfaces as a transformation error for that case.

use std::fmt;
use thiserror::Error;

const BINARY_OPS: [&str; 4] = ["+", "-", "*", "/"];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed statement at line {line}: {text}")]
pub struct ParseError {
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Blank or comment line, preserved verbatim.
    Verbatim(String),
    Copy {
        dest: String,
        src: String,
    },
    Tran {
        dest: String,
        src: String,
    },
    Binary {
        dest: String,
        op: String,
        lhs: String,
        rhs: String,
    },
}

impl Statement {
    /// Variable this statement defines, if any.
    pub fn dest(&self) -> Option<&str> {
        match self {
            Statement::Verbatim(_) => None,
            Statement::Copy { dest, .. }
            | Statement::Tran { dest, .. }
            | Statement::Binary { dest, .. } => Some(dest),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Verbatim(text) => write!(f, "{}", text),
            Statement::Copy { dest, src } => write!(f, "{} = {}", dest, src),
            Statement::Tran { dest, src } => write!(f, "{} = tran {}", dest, src),
            Statement::Binary { dest, op, lhs, rhs } => {
                write!(f, "{} = {} {} {}", dest, lhs, op, rhs)
            }
        }
    }
}

fn is_identifier(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Parse a whole program. Fails on the first malformed line.
pub fn parse_program(text: &str) -> Result<Vec<Statement>, ParseError> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| parse_line(line).ok_or_else(|| ParseError {
            line: idx + 1,
            text: line.trim().to_string(),
        }))
        .collect()
}

fn parse_line(line: &str) -> Option<Statement> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Some(Statement::Verbatim(line.trim_end().to_string()));
    }

    let (dest, rhs) = trimmed.split_once('=')?;
    let dest = dest.trim();
    if !is_identifier(dest) {
        return None;
    }

    let tokens: Vec<&str> = rhs.split_whitespace().collect();
    match tokens.as_slice() {
        [src] if is_identifier(src) => Some(Statement::Copy {
            dest: dest.to_string(),
            src: (*src).to_string(),
        }),
        ["tran", src] if is_identifier(src) => Some(Statement::Tran {
            dest: dest.to_string(),
            src: (*src).to_string(),
        }),
        [lhs, op, rhs] if BINARY_OPS.contains(op) && is_identifier(lhs) && is_identifier(rhs) => {
            Some(Statement::Binary {
                dest: dest.to_string(),
                op: (*op).to_string(),
                lhs: (*lhs).to_string(),
                rhs: (*rhs).to_string(),
            })
        }
        _ => None,
    }
}

/// Render a program back to text, one statement per line, with a
/// trailing newline.
pub fn render_program(statements: &[Statement]) -> String {
    let mut out = String::new();
    for stmt in statements {
        out.push_str(&stmt.to_string());
        out.push('\n');
    }
    out
}
