//! Line-per-token report
//!
//! ```text
//! Macro.Start "{{" @0..2 0:0
//! Macro.Identifier "name" @2..6 0:2
//! error @6..6: unterminated construct: identifier_end still open at 0:6
//! ```
//!
//! Lexemes are quoted with Rust string escapes so whitespace and newlines stay visible. The
//! trailing `line:col` is omitted when positions are not tracked. Lines are joined with `\n`
//! and there is no trailing newline.

use std::fmt::Write;

use super::registry::{FormatError, Formatter};
use crate::macrolex::engine::{LexResult, Token};
use crate::macrolex::error::LexicalError;

pub struct TagFormatter;

impl Formatter for TagFormatter {
    fn name(&self) -> &str {
        "tag"
    }

    fn serialize(&self, result: &LexResult<'_>) -> Result<String, FormatError> {
        Ok(serialize_tags(result))
    }

    fn description(&self) -> &str {
        "One line per token and error"
    }
}

/// Render a result in the tag format
pub fn serialize_tags(result: &LexResult<'_>) -> String {
    let mut lines: Vec<String> = result.tokens.iter().map(token_line).collect();
    lines.extend(result.errors.iter().map(error_line));
    lines.join("\n")
}

fn token_line(token: &Token<'_>) -> String {
    let mut line = format!(
        "{} {:?} @{}..{}",
        token.kind, token.text, token.span.start, token.span.end
    );
    if let Some(position) = token.position {
        let _ = write!(line, " {}", position);
    }
    line
}

fn error_line(error: &LexicalError) -> String {
    format!(
        "error @{}..{}: {}",
        error.span.start, error.span.end, error
    )
}
