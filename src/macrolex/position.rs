//! Position tracking for tokens
//!
//! ## Types
//!
//! - [`Position`] - A line:column position in source text (0-based, byte column)
//! - [`Cursor`] - Incremental tracker used by the engine while it scans
//! - [`SourceLocation`] - Random access byte offset to position conversion
//!
//! The engine only rescans lexemes of kinds flagged with `line_breaks`; every other lexeme is
//! assumed to stay on one line. [`SourceLocation`] does the full computation and is what tests
//! compare the incremental result against.

use std::fmt;

use serde::Serialize;

/// 0-based line and byte column of a token or error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Incremental line tracker
#[derive(Debug, Clone, Copy, Default)]
pub struct Cursor {
    line: usize,
    line_start: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of `offset`, assuming no newline between the last advance and `offset`
    pub fn position(&self, offset: usize) -> Position {
        Position::new(self.line, offset - self.line_start)
    }

    /// Account for `text`, which starts at byte `offset` of the source
    pub fn advance(&mut self, offset: usize, text: &str, line_breaks: bool) {
        if !line_breaks {
            return;
        }
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                self.line += 1;
                self.line_start = offset + i + 1;
            }
        }
    }
}

/// Full recomputation of positions from the source text
///
/// Used to check [`Cursor`]; the engine itself never needs random access.
pub struct SourceLocation {
    /// Offset just past every `\n`, plus 0 for the first line
    line_starts: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(at, _)| at + 1))
            .collect();
        Self { line_starts }
    }

    pub fn byte_to_position(&self, offset: usize) -> Position {
        // Number of lines starting at or before `offset`, never 0 since line 0 starts at 0
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Position::new(line, offset - self.line_starts[line])
    }
}
