//! Placeholder rewriting shared by the descriptors' `bind_parameters`.
//!
//! Generated SQL always uses `?` for a bound value. Engines that number their
//! parameters (`$1` for PostgreSQL, `@P1` for SQL Server) rewrite each `?`
//! in left-to-right order, skipping anything inside quoted literals, quoted
//! identifiers and comments.

use crate::error::{CriteriaError, Result};

use super::traits::BoundCommand;
use super::value::Value;

/// Where the scanner is while walking the statement text.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    Code,
    Quoted(char),
    LineComment,
    BlockComment,
}

/// Byte offsets of every `?` placeholder outside quotes and comments.
fn placeholder_positions(sql: &str) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut state = Scan::Code;
    let mut chars = sql.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        let next = chars.peek().map(|&(_, c)| c);
        state = match state {
            // A doubled quote inside a literal closes and immediately reopens,
            // which this toggle handles without lookahead.
            Scan::Quoted(q) if ch == q => Scan::Code,
            Scan::Quoted(q) => Scan::Quoted(q),
            Scan::LineComment if ch == '\n' => Scan::Code,
            Scan::LineComment => Scan::LineComment,
            Scan::BlockComment if ch == '*' && next == Some('/') => {
                chars.next();
                Scan::Code
            }
            Scan::BlockComment => Scan::BlockComment,
            Scan::Code => match ch {
                '\'' | '"' | '`' => Scan::Quoted(ch),
                '[' => Scan::Quoted(']'),
                '-' if next == Some('-') => {
                    chars.next();
                    Scan::LineComment
                }
                '/' if next == Some('*') => {
                    chars.next();
                    Scan::BlockComment
                }
                '?' => {
                    positions.push(idx);
                    Scan::Code
                }
                _ => Scan::Code,
            },
        };
    }

    positions
}

/// Count the `?` placeholders in `sql`.
pub fn count_placeholders(sql: &str) -> usize {
    placeholder_positions(sql).len()
}

/// Rewrite `?` placeholders using `placeholder(n)` for the 1-based position `n`.
///
/// # Errors
///
/// Returns `CriteriaError::ParameterMismatch` when the number of placeholders
/// differs from the number of values.
pub fn bind_positional<F>(sql: &str, params: &[Value], placeholder: F) -> Result<BoundCommand>
where
    F: Fn(usize) -> String,
{
    let positions = placeholder_positions(sql);
    if positions.len() != params.len() {
        return Err(CriteriaError::ParameterMismatch {
            placeholders: positions.len(),
            values: params.len(),
        });
    }

    let mut out = String::with_capacity(sql.len() + positions.len() * 3);
    let mut last = 0;
    for (n, pos) in positions.iter().enumerate() {
        out.push_str(&sql[last..*pos]);
        out.push_str(&placeholder(n + 1));
        last = pos + 1;
    }
    out.push_str(&sql[last..]);

    Ok(BoundCommand {
        sql: out,
        params: params.to_vec(),
    })
}
