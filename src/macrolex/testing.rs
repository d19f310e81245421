//! Testing utilities for token assertions
//!
//! Lexer tests should compare the whole token stream, not counts. Two tools cover most cases:
//!
//! 1. [`tag_snapshot`] renders the built-in grammar's output in the `tag` format, ready for an
//!    inline `insta::assert_snapshot!`.
//! 2. [`kinds_of`] extracts just the kind names for compact `assert_eq!` comparisons (for a
//!    custom grammar, use [`LexResult::kinds`] directly).
//!
//! ```rust-example
//! use macrolex::macrolex::testing::tag_snapshot;
//!
//! insta::assert_snapshot!(tag_snapshot("{{a}}"), @r#"
//! Macro.Start "{{" @0..2 0:0
//! Macro.Identifier "a" @2..3 0:2
//! Macro.End "}}" @3..5 0:3
//! "#);
//! ```
//!
//! [`assert_positions_consistent`] checks the incremental line tracking against a full
//! recomputation and is meant for property tests.

use crate::macrolex::engine::LexResult;
use crate::macrolex::formats::serialize_tags;
use crate::macrolex::macro_syntax::tokenize;
use crate::macrolex::position::SourceLocation;

/// Tokenize with the built-in grammar and render the tag format
pub fn tag_snapshot(input: &str) -> String {
    serialize_tags(&tokenize(input))
}

/// Tokenize with the built-in grammar and return the kind names
pub fn kinds_of(input: &str) -> Vec<&str> {
    tokenize(input).kinds()
}

/// Panics if any token or error position disagrees with a full recomputation from `input`
pub fn assert_positions_consistent(input: &str, result: &LexResult<'_>) {
    let location = SourceLocation::new(input);
    for token in &result.tokens {
        if let Some(position) = token.position {
            assert_eq!(
                position,
                location.byte_to_position(token.span.start),
                "position of {} {:?} at byte {}",
                token.kind,
                token.text,
                token.span.start
            );
        }
    }
    for error in &result.errors {
        if let Some(position) = error.position {
            assert_eq!(
                position,
                location.byte_to_position(error.span.start),
                "position of error at byte {}",
                error.span.start
            );
        }
    }
}
