//! # macrolex
//!
//! A lexer for the `{{name:arg1::arg2|modifier}}` macro language embedded in plain text.
//!
//! File Layout
//!
//! The lexer is data driven. Token kinds are declared once in a catalog, grouped into modes
//! by a mode table, checked by a validator and then run by a mode stack engine:
//!
//! src/macrolex
//!   ├── catalog        Token kind definitions and their patterns
//!   ├── modes          Mode name -> ordered candidate kinds
//!   ├── validation     Definition-time consistency checks
//!   ├── grammar        The validated bundle handed to the engine
//!   ├── engine         The mode stack machine (`tokenize`)
//!   ├── macro_syntax   The built-in macro grammar
//!   └── formats        Token report serialization (tag, json, yaml)
//!
//! For testing helpers, see the [testing module](macrolex::testing).

pub mod macrolex;

pub use macrolex::engine::{LexResult, Lexer, LexerOptions, RecoveryPolicy, Token};
pub use macrolex::error::{DefinitionError, LexicalError, LexicalErrorKind};
pub use macrolex::grammar::Grammar;
pub use macrolex::macro_syntax::{macro_grammar, tokenize};
