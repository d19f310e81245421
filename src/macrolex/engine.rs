//! Mode stack machine
//!
//! The runtime half of the lexer. [`Lexer::tokenize`] scans one complete input:
//!
//! 1. Start with the default mode on the stack at offset 0.
//! 2. Try the candidates of the mode on top of the stack, in order. The first match wins.
//! 3. Emit the match unless its kind is skipped, then apply its transition: pop, push, or
//!    both (replace the top entry).
//! 4. When nothing matches, record a `NoViableToken` error and either skip one character or
//!    stop, depending on [`RecoveryPolicy`].
//! 5. At end of input, report every mode still open above the base as an unterminated
//!    construct.
//!
//! All state lives in a per-call [`Scan`]; the grammar is only read. Errors are collected in
//! the returned [`LexResult`], never thrown.
//!
//! Forward progress
//!
//!     A match of length zero must change the stack. Zero-width transitions at a single offset
//!     are also capped (mode count times stack depth), which rules out push cycles that never
//!     consume input. Breaking either rule records a fatal `Stalled` error.

pub mod stack;

use std::ops::{ControlFlow, Range};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace, warn};

use crate::macrolex::catalog::KindId;
use crate::macrolex::error::{LexicalError, LexicalErrorKind};
use crate::macrolex::grammar::Grammar;
use crate::macrolex::modes::ModeId;
use crate::macrolex::position::{Cursor, Position};

use stack::{ModeStack, StackUnderflow};

/// What to do when no candidate matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecoveryPolicy {
    /// Record the error, skip one character and keep going
    #[default]
    Skip,
    /// Record the error and return what was lexed so far
    Abort,
}

impl FromStr for RecoveryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(RecoveryPolicy::Skip),
            "abort" => Ok(RecoveryPolicy::Abort),
            other => Err(format!(
                "unknown recovery policy '{}' (expected 'skip' or 'abort')",
                other
            )),
        }
    }
}

/// Per-lexer knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LexerOptions {
    pub recovery: RecoveryPolicy,
    /// Attach line/column positions to tokens and errors
    pub track_positions: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            recovery: RecoveryPolicy::Skip,
            track_positions: true,
        }
    }
}

/// An emitted token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    /// Name of the token kind
    pub kind: &'a str,
    /// The lexeme
    pub text: &'a str,
    /// Byte range in the input
    pub span: Range<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Token<'_> {
    pub fn offset(&self) -> usize {
        self.span.start
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }
}

/// Everything one `tokenize` call produced
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LexResult<'a> {
    pub tokens: Vec<Token<'a>>,
    pub errors: Vec<LexicalError>,
    /// Stack depth when scanning stopped (1 means every construct was closed)
    pub final_depth: usize,
    /// Deepest the stack got
    pub max_depth: usize,
}

impl<'a> LexResult<'a> {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Kind names of the emitted tokens, in order
    pub fn kinds(&self) -> Vec<&'a str> {
        self.tokens.iter().map(|t| t.kind).collect()
    }
}

/// Runs a grammar over inputs
///
/// Cheap to create and `Sync`: any number of threads may call `tokenize` on the same lexer.
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'g> {
    grammar: &'g Grammar,
    options: LexerOptions,
}

impl<'g> Lexer<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self::with_options(grammar, LexerOptions::default())
    }

    pub fn with_options(grammar: &'g Grammar, options: LexerOptions) -> Self {
        Self { grammar, options }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    pub fn options(&self) -> LexerOptions {
        self.options
    }

    /// Tokenize one complete input
    pub fn tokenize<'a>(&self, input: &'a str) -> LexResult<'a>
    where
        'g: 'a,
    {
        let _span = debug_span!("tokenize", bytes = input.len()).entered();
        let mut scan = Scan::new(self.grammar, self.options, input);
        let reached_end = scan.run().is_continue();
        scan.finish(reached_end)
    }
}

/// Mutable state of a single `tokenize` call
struct Scan<'a> {
    grammar: &'a Grammar,
    options: LexerOptions,
    input: &'a str,
    offset: usize,
    stack: ModeStack,
    cursor: Cursor,
    tokens: Vec<Token<'a>>,
    errors: Vec<LexicalError>,
    max_depth: usize,
    /// Zero-width steps taken at the current offset
    idle_steps: usize,
    idle_budget: usize,
}

impl<'a> Scan<'a> {
    fn new(grammar: &'a Grammar, options: LexerOptions, input: &'a str) -> Self {
        Self {
            grammar,
            options,
            input,
            offset: 0,
            stack: ModeStack::new(grammar.default_mode()),
            cursor: Cursor::new(),
            tokens: Vec::new(),
            errors: Vec::new(),
            max_depth: 1,
            idle_steps: 0,
            idle_budget: 0,
        }
    }

    fn run(&mut self) -> ControlFlow<()> {
        let grammar = self.grammar;
        while self.offset < self.input.len() {
            let mode = self.stack.top();
            let hit = grammar
                .mode(mode)
                .candidates()
                .iter()
                .find_map(|&id| {
                    grammar
                        .kind(id)
                        .match_at(self.input, self.offset)
                        .map(|len| (id, len))
                });

            match hit {
                Some((id, len)) => self.accept(id, len)?,
                None => self.recover(mode)?,
            }
        }
        ControlFlow::Continue(())
    }

    fn accept(&mut self, id: KindId, len: usize) -> ControlFlow<()> {
        let grammar = self.grammar;
        let kind = grammar.kind(id);
        let start = self.offset;
        let end = start + len;
        trace!(
            kind = kind.name(),
            start,
            end,
            mode = grammar.mode(self.stack.top()).name(),
            "matched"
        );

        let before = (self.stack.depth(), self.stack.top());
        if self.transition(id).is_err() {
            self.record(
                LexicalErrorKind::StackUnderflow {
                    kind: kind.name().to_string(),
                },
                start..start,
            );
            return ControlFlow::Break(());
        }

        if len == 0 {
            if self.idle_steps == 0 {
                self.idle_budget = grammar.modes().len() * (before.0 + 1);
            }
            self.idle_steps += 1;
            let unchanged = (self.stack.depth(), self.stack.top()) == before;
            if unchanged || self.idle_steps > self.idle_budget {
                self.record(
                    LexicalErrorKind::Stalled {
                        kind: kind.name().to_string(),
                    },
                    start..start,
                );
                return ControlFlow::Break(());
            }
        }

        let text = &self.input[start..end];
        if kind.emits() {
            let position = self.position(start);
            self.tokens.push(Token {
                kind: kind.name(),
                text,
                span: start..end,
                position,
            });
        }

        if len > 0 {
            self.cursor.advance(start, text, kind.line_breaks());
            self.offset = end;
            self.idle_steps = 0;
        }
        ControlFlow::Continue(())
    }

    fn transition(&mut self, id: KindId) -> Result<(), StackUnderflow> {
        let grammar = self.grammar;
        let kind = grammar.kind(id);
        match (kind.pop_mode(), grammar.push_target(id)) {
            (true, Some(target)) => {
                let from = self.stack.replace_top(target);
                debug!(
                    from = grammar.mode(from).name(),
                    to = grammar.mode(target).name(),
                    depth = self.stack.depth(),
                    "replaced mode"
                );
            }
            (true, None) => {
                let from = self.stack.pop()?;
                debug!(
                    from = grammar.mode(from).name(),
                    depth = self.stack.depth(),
                    "popped mode"
                );
            }
            (false, Some(target)) => {
                self.stack.push(target);
                self.max_depth = self.max_depth.max(self.stack.depth());
                debug!(
                    to = grammar.mode(target).name(),
                    depth = self.stack.depth(),
                    "pushed mode"
                );
            }
            (false, None) => {}
        }
        Ok(())
    }

    fn recover(&mut self, mode: ModeId) -> ControlFlow<()> {
        let start = self.offset;
        let width = self.input[start..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        let end = start + width;

        match self.options.recovery {
            RecoveryPolicy::Abort => {
                self.record(LexicalErrorKind::NoViableToken, start..end);
                ControlFlow::Break(())
            }
            RecoveryPolicy::Skip => {
                let grammar = self.grammar;
                let mode_name = grammar.mode(mode).name();
                let extends_previous = matches!(
                    self.errors.last(),
                    Some(last) if last.kind == LexicalErrorKind::NoViableToken
                        && last.span.end == start
                        && last.mode == mode_name
                );
                if extends_previous {
                    if let Some(last) = self.errors.last_mut() {
                        last.span.end = end;
                    }
                } else {
                    self.record(LexicalErrorKind::NoViableToken, start..end);
                }

                self.cursor.advance(start, &self.input[start..end], true);
                self.offset = end;
                self.idle_steps = 0;
                ControlFlow::Continue(())
            }
        }
    }

    fn position(&self, offset: usize) -> Option<Position> {
        self.options
            .track_positions
            .then(|| self.cursor.position(offset))
    }

    fn record(&mut self, kind: LexicalErrorKind, span: Range<usize>) {
        let error = LexicalError {
            kind,
            position: self.position(span.start),
            mode: self.grammar.mode(self.stack.top()).name().to_string(),
            span,
        };
        warn!(
            start = error.span.start,
            end = error.span.end,
            mode = %error.mode,
            fatal = error.is_fatal(),
            "{}",
            error.message()
        );
        self.errors.push(error);
    }

    fn finish(mut self, reached_end: bool) -> LexResult<'a> {
        if reached_end && self.stack.depth() > 1 {
            let grammar = self.grammar;
            let open_modes = self
                .stack
                .open_modes()
                .iter()
                .map(|&id| grammar.mode(id).name().to_string())
                .collect();
            let end = self.input.len();
            self.record(LexicalErrorKind::UnterminatedConstruct { open_modes }, end..end);
        }

        debug!(
            tokens = self.tokens.len(),
            errors = self.errors.len(),
            final_depth = self.stack.depth(),
            max_depth = self.max_depth,
            "tokenize finished"
        );

        LexResult {
            final_depth: self.stack.depth(),
            max_depth: self.max_depth,
            tokens: self.tokens,
            errors: self.errors,
        }
    }
}
