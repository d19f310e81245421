//! Error types for grammar definition and lexing
//!
//! There are two families:
//! - [`DefinitionError`]: raised while building a catalog, mode table or grammar. These are
//!   programming errors in the grammar and are meant to fail fast at startup.
//! - [`LexicalError`]: collected per `tokenize` call next to the tokens. They describe problems
//!   with a particular input (or a grammar that misbehaves at runtime) and are never thrown.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::macrolex::position::Position;

/// Errors that can occur while defining token kinds and modes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// A kind name was registered twice with different push targets
    ConflictingPushMode {
        kind: String,
        existing: Option<String>,
        requested: Option<String>,
    },
    /// A kind name was registered twice with different patterns or flags
    ConflictingDefinition { kind: String },
    /// A regex pattern failed to compile
    InvalidPattern { kind: String, message: String },
    /// A mode lists a kind that the catalog does not define
    UndefinedKind { mode: String, kind: String },
    /// A kind pushes a mode that the mode table does not define
    UndefinedMode { kind: String, mode: String },
    /// Two modes share a name
    DuplicateMode(String),
    /// The default mode is not one of the defined modes
    UnknownDefaultMode(String),
    /// A mode has no candidates at all
    EmptyMode(String),
    /// A kind can never be tried because an earlier candidate always matches first
    UnreachableKind {
        mode: String,
        kind: String,
        shadowed_by: String,
    },
    /// A kind can match without consuming input and performs no mode transition
    StallingKind { kind: String },
    /// The mode table was built against a different catalog than the one it is paired with
    ForeignModeTable,
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefinitionError::ConflictingPushMode {
                kind,
                existing,
                requested,
            } => write!(
                f,
                "token kind '{}' already pushes {}, cannot redefine it to push {}",
                kind,
                describe_target(existing),
                describe_target(requested)
            ),
            DefinitionError::ConflictingDefinition { kind } => {
                write!(f, "token kind '{}' is already defined differently", kind)
            }
            DefinitionError::InvalidPattern { kind, message } => {
                write!(f, "invalid pattern for token kind '{}': {}", kind, message)
            }
            DefinitionError::UndefinedKind { mode, kind } => {
                write!(f, "mode '{}' references undefined token kind '{}'", mode, kind)
            }
            DefinitionError::UndefinedMode { kind, mode } => {
                write!(f, "token kind '{}' pushes undefined mode '{}'", kind, mode)
            }
            DefinitionError::DuplicateMode(name) => write!(f, "mode '{}' is defined twice", name),
            DefinitionError::UnknownDefaultMode(name) => {
                write!(f, "default mode '{}' is not defined", name)
            }
            DefinitionError::EmptyMode(name) => write!(f, "mode '{}' has no token kinds", name),
            DefinitionError::UnreachableKind {
                mode,
                kind,
                shadowed_by,
            } => write!(
                f,
                "token kind '{}' in mode '{}' is unreachable, '{}' always matches first",
                kind, mode, shadowed_by
            ),
            DefinitionError::StallingKind { kind } => write!(
                f,
                "token kind '{}' can match empty input without changing mode",
                kind
            ),
            DefinitionError::ForeignModeTable => {
                write!(f, "mode table was built against a different catalog")
            }
        }
    }
}

impl std::error::Error for DefinitionError {}

fn describe_target(target: &Option<String>) -> String {
    match target {
        Some(mode) => format!("mode '{}'", mode),
        None => "no mode".to_string(),
    }
}

/// What went wrong during a `tokenize` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LexicalErrorKind {
    /// No candidate of the current mode matched
    NoViableToken,
    /// Input ended while modes other than the default one were still open
    UnterminatedConstruct { open_modes: Vec<String> },
    /// A kind tried to pop the base mode
    StackUnderflow { kind: String },
    /// The engine stopped making progress (zero-width matches without effect)
    Stalled { kind: String },
}

/// A problem found while lexing one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LexicalError {
    pub kind: LexicalErrorKind,
    /// Byte range the error covers (empty for errors tied to a single offset)
    pub span: Range<usize>,
    /// Mode on top of the stack when the error was recorded
    pub mode: String,
    pub position: Option<Position>,
}

impl LexicalError {
    /// Errors after which the engine stops scanning
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            LexicalErrorKind::StackUnderflow { .. } | LexicalErrorKind::Stalled { .. }
        )
    }

    /// Human readable message, without location
    pub fn message(&self) -> String {
        match &self.kind {
            LexicalErrorKind::NoViableToken => format!("no viable token in mode {}", self.mode),
            LexicalErrorKind::UnterminatedConstruct { open_modes } => format!(
                "unterminated construct: {} still open",
                open_modes.join(" > ")
            ),
            LexicalErrorKind::StackUnderflow { kind } => format!(
                "stack underflow: '{}' tried to pop the base mode {}",
                kind, self.mode
            ),
            LexicalErrorKind::Stalled { kind } => format!(
                "engine stalled in mode {}: '{}' matched without consuming input or changing mode",
                self.mode, kind
            ),
        }
    }
}

impl fmt::Display for LexicalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(pos) => write!(f, "{} at {}", self.message(), pos),
            None => write!(f, "{} at byte {}", self.message(), self.span.start),
        }
    }
}

impl std::error::Error for LexicalError {}
