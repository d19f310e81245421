//! Lexer
//!
//! This module holds the whole lexing stack for the macro language.
//!
//! Structure:
//!     Lexing is table driven. A [`catalog::Catalog`] owns every token kind (pattern plus
//!     mode-transition metadata), a [`modes::ModeTable`] lists which kinds are recognizable in
//!     each mode and in which order, and [`validation`] rejects inconsistent definitions before
//!     anything is lexed. The [`engine::Lexer`] then walks the input with a mode stack.
//!
//! Ordered alternation
//!
//!     At every offset the engine tries the candidates of the current mode strictly in listed
//!     order and commits to the first one whose pattern matches. This is not maximal munch:
//!     a two character closing marker listed before a greedy catch-all wins even when the
//!     catch-all could match more.
//!
//! Nesting
//!
//!     Every open macro owns one slot on the mode stack. The slot moves through
//!     `macro_header`, `identifier_end` and `macro_args` by replacing itself (pop + push), and
//!     the closing marker releases it. An opening marker inside arguments pushes a new slot on
//!     top, so macros nest to any depth.
//!
//! Errors
//!
//!     Definition problems ([`error::DefinitionError`]) surface once, when a grammar is built.
//!     Problems with the input ([`error::LexicalError`]) are collected next to the tokens and
//!     never abort the call with a panic.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod formats;
pub mod grammar;
pub mod macro_syntax;
pub mod modes;
pub mod position;
pub mod testing;
pub mod validation;
