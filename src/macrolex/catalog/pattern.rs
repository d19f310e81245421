//! Token patterns
//!
//! A pattern is a function from `(input, offset)` to an optional match length. The length may
//! be zero, which is how lookahead and fallback kinds work. All matching is anchored at the
//! offset: a pattern never searches forward for a later match.
//!
//! ## Variants
//!
//! ```text
//! Literal("}}")              matches exactly "}}"
//! Regex("[A-Za-z_][\w-]*")   compiled as \A(?:...) and run on the remaining input
//! Peek([Literal("}}")])      zero-width, matches if any alternative would match here
//! Always                     zero-width, always matches
//! ```
//!
//! [`Pattern`] is the declarative form kept for comparison and display. It is compiled into a
//! [`Matcher`] once, when the kind is defined.

use std::fmt;

use regex::Regex;

/// Declarative pattern of a token kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// An exact string
    Literal(String),
    /// A regular expression, anchored at the current offset
    Regex(String),
    /// Zero-width positive lookahead over ordered alternatives
    Peek(Vec<Pattern>),
    /// Zero-width, matches everywhere
    Always,
}

impl Pattern {
    pub fn literal(text: impl Into<String>) -> Self {
        Pattern::Literal(text.into())
    }

    pub fn regex(source: impl Into<String>) -> Self {
        Pattern::Regex(source.into())
    }

    pub fn peek(alternatives: Vec<Pattern>) -> Self {
        Pattern::Peek(alternatives)
    }

    pub fn always() -> Self {
        Pattern::Always
    }

    /// True when the pattern matches at every offset, so nothing listed after it is reachable
    pub fn is_unconditional(&self) -> bool {
        match self {
            Pattern::Always => true,
            Pattern::Literal(text) => text.is_empty(),
            Pattern::Peek(alternatives) => alternatives.iter().any(Pattern::is_unconditional),
            Pattern::Regex(source) => regex_matches_empty_everywhere(source),
        }
    }

    pub(crate) fn compile(&self) -> Result<Matcher, regex::Error> {
        Ok(match self {
            Pattern::Literal(text) => Matcher::Literal(text.clone()),
            Pattern::Regex(source) => Matcher::Regex(Regex::new(&format!(r"\A(?:{})", source))?),
            Pattern::Peek(alternatives) => Matcher::Peek(
                alternatives
                    .iter()
                    .map(Pattern::compile)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Pattern::Always => Matcher::Always,
        })
    }
}

/// A regex that can match nothing and has no assertions (`^`, `\b`, `\z`, ...) matches the
/// empty string at every offset.
fn regex_matches_empty_everywhere(source: &str) -> bool {
    regex_syntax::parse(source)
        .map(|hir| {
            let properties = hir.properties();
            properties.minimum_len() == Some(0) && properties.look_set().is_empty()
        })
        .unwrap_or(false)
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal(text) => write!(f, "{:?}", text),
            Pattern::Regex(source) => write!(f, "/{}/", source),
            Pattern::Peek(alternatives) => {
                write!(f, "(?=")?;
                for (i, alternative) in alternatives.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", alternative)?;
                }
                write!(f, ")")
            }
            Pattern::Always => write!(f, "<always>"),
        }
    }
}

/// Compiled pattern
#[derive(Debug, Clone)]
pub(crate) enum Matcher {
    Literal(String),
    Regex(Regex),
    Peek(Vec<Matcher>),
    Always,
}

impl Matcher {
    /// Length of the match starting at `offset`, if any
    ///
    /// `offset` must lie on a char boundary of `input`.
    pub(crate) fn match_at(&self, input: &str, offset: usize) -> Option<usize> {
        let rest = &input[offset..];
        match self {
            Matcher::Literal(text) => rest.starts_with(text.as_str()).then_some(text.len()),
            Matcher::Regex(regex) => regex.find(rest).map(|m| m.end()),
            Matcher::Peek(alternatives) => alternatives
                .iter()
                .any(|alternative| alternative.match_at(input, offset).is_some())
                .then_some(0),
            Matcher::Always => Some(0),
        }
    }

    /// Whether the pattern can succeed without consuming anything
    ///
    /// Exact for every variant except regexes, which are only probed against empty input.
    pub(crate) fn can_match_empty(&self) -> bool {
        match self {
            Matcher::Literal(text) => text.is_empty(),
            Matcher::Regex(regex) => regex.is_match(""),
            Matcher::Peek(_) | Matcher::Always => true,
        }
    }
}
