//! Built-in grammar for `{{macro}}` templates
//!
//! ```text
//! Hello {{user}}, today is {{date:format::short|upper}}. {{random:{{a}}::{{b}}}}
//! ```
//!
//! Modes:
//!
//! ```text
//! text            Macro.Start (push macro_header), Plaintext
//! macro_header    Macro.End (pop), Whitespace, Macro.Flag, Macro.Identifier (-> identifier_end)
//! identifier_end  Macro.BeforeEnd, Macro.Gap, Macro.EndOfIdentifier   (all -> macro_args)
//! macro_args      Macro.Start (push macro_header), Macro.End (pop), Whitespace,
//!                 Args.DoubleColon, Args.Colon, Args.Equals, Filter.Pipe, Args.Quote,
//!                 Identifier, Unknown, Args.Exit (pop)
//! ```
//!
//! `->` is a replacement of the top entry (pop + push): a macro keeps exactly one stack slot
//! from `{{` to `}}`. Only `Macro.Start` grows the stack, which is how macros nest inside
//! arguments.
//!
//! `identifier_end` enforces what may follow a macro name: the closing marker, whitespace, a
//! separator or the output-modifier pipe. Anything else is a lexical error, so `name!x` is
//! never split into a name and a stray argument.
//!
//! `macro_args` has no single terminator. `Args.Exit` is an unconditional zero-width fallback
//! listed last: when nothing else matches (a lone `{` or `}`), it pops back to the enclosing
//! mode without consuming anything.

use once_cell::sync::Lazy;

use crate::macrolex::catalog::{Catalog, KindOptions, Pattern};
use crate::macrolex::engine::{LexResult, Lexer};
use crate::macrolex::error::DefinitionError;
use crate::macrolex::grammar::Grammar;
use crate::macrolex::modes::ModeTableBuilder;

/// Mode names of the built-in grammar
pub mod modes {
    pub const TEXT: &str = "text";
    pub const MACRO_HEADER: &str = "macro_header";
    pub const IDENTIFIER_END: &str = "identifier_end";
    pub const MACRO_ARGS: &str = "macro_args";
}

/// Token kind names of the built-in grammar
pub mod kinds {
    pub const PLAINTEXT: &str = "Plaintext";
    pub const MACRO_START: &str = "Macro.Start";
    pub const MACRO_END: &str = "Macro.End";
    pub const MACRO_FLAG: &str = "Macro.Flag";
    pub const MACRO_IDENTIFIER: &str = "Macro.Identifier";
    pub const MACRO_BEFORE_END: &str = "Macro.BeforeEnd";
    pub const MACRO_GAP: &str = "Macro.Gap";
    pub const MACRO_END_OF_IDENTIFIER: &str = "Macro.EndOfIdentifier";
    pub const WHITESPACE: &str = "Whitespace";
    pub const DOUBLE_COLON: &str = "Args.DoubleColon";
    pub const COLON: &str = "Args.Colon";
    pub const EQUALS: &str = "Args.Equals";
    pub const QUOTE: &str = "Args.Quote";
    pub const PIPE: &str = "Filter.Pipe";
    pub const IDENTIFIER: &str = "Identifier";
    pub const UNKNOWN: &str = "Unknown";
    pub const ARGS_EXIT: &str = "Args.Exit";
}

/// Everything up to the next `{{`. A single `{` is text unless another `{` follows it.
const PLAINTEXT_PATTERN: &str = r"(?:[^{]|\{[^{])+\{?\z|(?:[^{]|\{[^{])+|\{\z";
const IDENTIFIER_PATTERN: &str = r"[A-Za-z_][\w-]*";
const FLAG_PATTERN: &str = r"[!?#~/.$>]";
const UNKNOWN_PATTERN: &str = r#"(?s)(?:[^{}:|="\s\\]|\\.)+"#;

static MACRO_GRAMMAR: Lazy<Grammar> =
    Lazy::new(|| build_macro_grammar().expect("built-in macro grammar must be valid"));

/// The shared built-in grammar, built on first use
pub fn macro_grammar() -> &'static Grammar {
    &MACRO_GRAMMAR
}

/// Tokenize with the built-in grammar and default options
pub fn tokenize(input: &str) -> LexResult<'_> {
    Lexer::new(macro_grammar()).tokenize(input)
}

/// Build a fresh copy of the built-in grammar
pub fn build_macro_grammar() -> Result<Grammar, DefinitionError> {
    use kinds::*;

    let mut catalog = Catalog::builder();

    catalog.define(
        MACRO_START,
        Pattern::literal("{{"),
        KindOptions::new().push_mode(modes::MACRO_HEADER),
    )?;
    catalog.define(
        MACRO_END,
        Pattern::literal("}}"),
        KindOptions::new().pop_mode(),
    )?;
    catalog.define(
        PLAINTEXT,
        Pattern::regex(PLAINTEXT_PATTERN),
        KindOptions::new().line_breaks(),
    )?;
    catalog.define(
        WHITESPACE,
        Pattern::regex(r"\s+"),
        KindOptions::new().skipped().line_breaks(),
    )?;
    catalog.define(MACRO_FLAG, Pattern::regex(FLAG_PATTERN), KindOptions::new())?;
    catalog.define(
        MACRO_IDENTIFIER,
        Pattern::regex(IDENTIFIER_PATTERN),
        KindOptions::new()
            .pop_mode()
            .push_mode(modes::IDENTIFIER_END),
    )?;

    // Identifier boundary, tried in this order
    catalog.define(
        MACRO_BEFORE_END,
        Pattern::peek(vec![Pattern::literal("}}")]),
        KindOptions::new()
            .skipped()
            .pop_mode()
            .push_mode(modes::MACRO_ARGS),
    )?;
    catalog.define(
        MACRO_GAP,
        Pattern::regex(r"\s+"),
        KindOptions::new()
            .skipped()
            .line_breaks()
            .pop_mode()
            .push_mode(modes::MACRO_ARGS),
    )?;
    catalog.define(
        MACRO_END_OF_IDENTIFIER,
        Pattern::peek(vec![
            Pattern::literal("::"),
            Pattern::literal(":"),
            Pattern::literal("|"),
        ]),
        KindOptions::new()
            .skipped()
            .pop_mode()
            .push_mode(modes::MACRO_ARGS),
    )?;

    catalog.define(DOUBLE_COLON, Pattern::literal("::"), KindOptions::new())?;
    catalog.define(COLON, Pattern::literal(":"), KindOptions::new())?;
    catalog.define(EQUALS, Pattern::literal("="), KindOptions::new())?;
    catalog.define(PIPE, Pattern::literal("|"), KindOptions::new())?;
    catalog.define(QUOTE, Pattern::literal("\""), KindOptions::new())?;
    catalog.define(
        IDENTIFIER,
        Pattern::regex(IDENTIFIER_PATTERN),
        KindOptions::new(),
    )?;
    catalog.define(
        UNKNOWN,
        Pattern::regex(UNKNOWN_PATTERN),
        KindOptions::new().line_breaks(),
    )?;
    catalog.define(
        ARGS_EXIT,
        Pattern::always(),
        KindOptions::new().skipped().pop_mode(),
    )?;

    let catalog = catalog.build();
    let table = ModeTableBuilder::new(modes::TEXT)
        .mode(modes::TEXT, &[MACRO_START, PLAINTEXT])
        .mode(
            modes::MACRO_HEADER,
            &[MACRO_END, WHITESPACE, MACRO_FLAG, MACRO_IDENTIFIER],
        )
        .mode(
            modes::IDENTIFIER_END,
            &[MACRO_BEFORE_END, MACRO_GAP, MACRO_END_OF_IDENTIFIER],
        )
        .mode(
            modes::MACRO_ARGS,
            &[
                MACRO_START,
                MACRO_END,
                WHITESPACE,
                DOUBLE_COLON,
                COLON,
                EQUALS,
                PIPE,
                QUOTE,
                IDENTIFIER,
                UNKNOWN,
                ARGS_EXIT,
            ],
        )
        .build(&catalog)?;

    Grammar::new(catalog, table)
}
