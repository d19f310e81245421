//! Token kinds
//!
//! A token kind is a named pattern plus what happens to the mode stack when it matches. Its
//! push target is part of its identity: a kind pushes the same mode (or none) wherever it is
//! listed.

use std::fmt;

use super::pattern::{Matcher, Pattern};

/// Index of a kind inside its catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KindId(pub(crate) usize);

impl KindId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Flags and transitions of a kind, as given to `CatalogBuilder::define`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindOptions {
    pub emits: bool,
    pub line_breaks: bool,
    pub push_mode: Option<String>,
    pub pop_mode: bool,
}

impl Default for KindOptions {
    fn default() -> Self {
        Self {
            emits: true,
            line_breaks: false,
            push_mode: None,
            pop_mode: false,
        }
    }
}

impl KindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the match but never emit it
    pub fn skipped(mut self) -> Self {
        self.emits = false;
        self
    }

    /// The lexeme may contain newlines
    pub fn line_breaks(mut self) -> Self {
        self.line_breaks = true;
        self
    }

    pub fn push_mode(mut self, mode: impl Into<String>) -> Self {
        self.push_mode = Some(mode.into());
        self
    }

    pub fn pop_mode(mut self) -> Self {
        self.pop_mode = true;
        self
    }
}

/// A defined token kind
#[derive(Debug, Clone)]
pub struct TokenKind {
    pub(crate) id: KindId,
    pub(crate) name: String,
    pub(crate) pattern: Pattern,
    pub(crate) matcher: Matcher,
    pub(crate) options: KindOptions,
}

impl TokenKind {
    pub fn id(&self) -> KindId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn emits(&self) -> bool {
        self.options.emits
    }

    pub fn line_breaks(&self) -> bool {
        self.options.line_breaks
    }

    pub fn push_mode(&self) -> Option<&str> {
        self.options.push_mode.as_deref()
    }

    pub fn pop_mode(&self) -> bool {
        self.options.pop_mode
    }

    /// Whether matching this kind changes the mode stack
    pub fn transitions(&self) -> bool {
        self.options.pop_mode || self.options.push_mode.is_some()
    }

    pub(crate) fn match_at(&self, input: &str, offset: usize) -> Option<usize> {
        self.matcher.match_at(input, offset)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.pattern)?;
        if !self.options.emits {
            write!(f, " skip")?;
        }
        if self.options.pop_mode {
            write!(f, " pop")?;
        }
        if let Some(mode) = &self.options.push_mode {
            write!(f, " push({})", mode)?;
        }
        Ok(())
    }
}
