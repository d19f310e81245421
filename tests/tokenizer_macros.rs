//! Tokenization tests for the built-in macro grammar
//!
//! Kind sequences are checked with rstest tables; full streams (lexemes, spans, positions and
//! errors) with inline tag snapshots.

use macrolex::macrolex::catalog::{Catalog, KindOptions, Pattern};
use macrolex::macrolex::macro_syntax::{kinds::*, modes};
use macrolex::macrolex::modes::ModeTableBuilder;
use macrolex::macrolex::testing::tag_snapshot;
use macrolex::{tokenize, Grammar, Lexer, LexicalErrorKind};
use rstest::rstest;

// ===== Kind sequences =====

#[rstest]
#[case::plain("just text", &[PLAINTEXT])]
#[case::simple("{{name}}", &[MACRO_START, MACRO_IDENTIFIER, MACRO_END])]
#[case::surrounded("a {{b}} c", &[PLAINTEXT, MACRO_START, MACRO_IDENTIFIER, MACRO_END, PLAINTEXT])]
#[case::flag("{{#if}}", &[MACRO_START, MACRO_FLAG, MACRO_IDENTIFIER, MACRO_END])]
#[case::spaced_header("{{  name  }}", &[MACRO_START, MACRO_IDENTIFIER, MACRO_END])]
#[case::separators(
    "{{name:a::b}}",
    &[MACRO_START, MACRO_IDENTIFIER, COLON, IDENTIFIER, DOUBLE_COLON, IDENTIFIER, MACRO_END]
)]
#[case::leading_double_colon(
    "{{name::a}}",
    &[MACRO_START, MACRO_IDENTIFIER, DOUBLE_COLON, IDENTIFIER, MACRO_END]
)]
#[case::modifier("{{name|upper}}", &[MACRO_START, MACRO_IDENTIFIER, PIPE, IDENTIFIER, MACRO_END])]
#[case::gap_then_args(
    "{{name a=1}}",
    &[MACRO_START, MACRO_IDENTIFIER, IDENTIFIER, EQUALS, UNKNOWN, MACRO_END]
)]
#[case::adjacent("{{a}}{{b}}", &[
    MACRO_START, MACRO_IDENTIFIER, MACRO_END,
    MACRO_START, MACRO_IDENTIFIER, MACRO_END,
])]
fn test_kind_sequences(#[case] input: &str, #[case] expected: &[&str]) {
    let result = tokenize(input);
    assert_eq!(result.kinds(), expected);
    assert!(result.is_clean(), "unexpected errors: {:?}", result.errors);
    assert_eq!(result.final_depth, 1);
}

#[test]
fn test_argument_identifiers_left_to_right() {
    let result = tokenize("{{name:a::b}}");
    let idents: Vec<&str> = result
        .tokens
        .iter()
        .filter(|t| t.kind == IDENTIFIER || t.kind == MACRO_IDENTIFIER)
        .map(|t| t.text)
        .collect();
    assert_eq!(idents, vec!["name", "a", "b"]);
}

#[test]
fn test_empty_input() {
    let result = tokenize("");
    assert!(result.tokens.is_empty());
    assert!(result.is_clean());
    assert_eq!(result.final_depth, 1);
}

// ===== Nesting =====

#[test]
fn test_nested_macro() {
    let result = tokenize("{{outer:{{inner}}}}");
    assert_eq!(
        result.kinds(),
        vec![
            MACRO_START,
            MACRO_IDENTIFIER,
            COLON,
            MACRO_START,
            MACRO_IDENTIFIER,
            MACRO_END,
            MACRO_END
        ]
    );
    assert_eq!(result.tokens[1].text, "outer");
    assert_eq!(result.tokens[4].text, "inner");
    assert!(result.is_clean());
    assert_eq!(result.max_depth, 3);
    assert_eq!(result.final_depth, 1);
}

#[test]
fn test_nesting_depth_is_unbounded() {
    let depth = 50;
    let input = format!("{}x{}", "{{m:".repeat(depth), "}}".repeat(depth));
    let result = tokenize(&input);
    assert!(result.is_clean());
    assert_eq!(result.max_depth, depth + 1);
    assert_eq!(result.final_depth, 1);
}

#[test]
fn test_nested_snapshot() {
    insta::assert_snapshot!(tag_snapshot("{{random:{{a}}::{{b}}}}"), @r#"
    Macro.Start "{{" @0..2 0:0
    Macro.Identifier "random" @2..8 0:2
    Args.Colon ":" @8..9 0:8
    Macro.Start "{{" @9..11 0:9
    Macro.Identifier "a" @11..12 0:11
    Macro.End "}}" @12..14 0:12
    Args.DoubleColon "::" @14..16 0:14
    Macro.Start "{{" @16..18 0:16
    Macro.Identifier "b" @18..19 0:18
    Macro.End "}}" @19..21 0:19
    Macro.End "}}" @21..23 0:21
    "#);
}

// ===== Errors =====

#[test]
fn test_unterminated_macro() {
    let result = tokenize("{{name");
    assert_eq!(result.kinds(), vec![MACRO_START, MACRO_IDENTIFIER]);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0]
        .to_string()
        .contains("unterminated construct"));
    assert!(!result.errors[0].is_fatal());
    assert_eq!(result.final_depth, 2);
}

#[test]
fn test_unterminated_nested_lists_open_modes() {
    let result = tokenize("{{a:{{b:c");
    assert_eq!(
        result.errors.last().map(|e| &e.kind),
        Some(&LexicalErrorKind::UnterminatedConstruct {
            open_modes: vec![modes::MACRO_ARGS.into(), modes::MACRO_ARGS.into()]
        })
    );
}

#[test]
fn test_identifier_boundary_rejects_stray_characters() {
    insta::assert_snapshot!(tag_snapshot("{{name!x}} ok"), @r#"
    Macro.Start "{{" @0..2 0:0
    Macro.Identifier "name" @2..6 0:2
    Macro.End "}}" @8..10 0:8
    Plaintext " ok" @10..13 0:10
    error @6..8: no viable token in mode identifier_end at 0:6
    "#);
}

#[test]
fn test_header_without_identifier() {
    let result = tokenize("{{:x}}");
    assert_eq!(result.errors[0].kind, LexicalErrorKind::NoViableToken);
    assert_eq!(result.errors[0].mode, modes::MACRO_HEADER);
    assert_eq!(result.errors[0].span, 2..3);
}

#[test]
fn test_stray_brace_in_arguments_falls_back_to_text() {
    insta::assert_snapshot!(tag_snapshot("{{a:b}c"), @r#"
    Macro.Start "{{" @0..2 0:0
    Macro.Identifier "a" @2..3 0:2
    Args.Colon ":" @3..4 0:3
    Identifier "b" @4..5 0:4
    Plaintext "}c" @5..7 0:5
    "#);
}

#[test]
fn test_positions_on_later_lines() {
    insta::assert_snapshot!(tag_snapshot("one\ntwo {{x:\n  y}}"), @r#"
    Plaintext "one\ntwo " @0..8 0:0
    Macro.Start "{{" @8..10 1:4
    Macro.Identifier "x" @10..11 1:6
    Args.Colon ":" @11..12 1:7
    Identifier "y" @15..16 2:2
    Macro.End "}}" @16..18 2:3
    "#);
}

// ===== Ordered alternation =====

fn overlapping_grammar(order: &[&str]) -> Grammar {
    let mut builder = Catalog::builder();
    builder
        .define("Short", Pattern::literal("ab"), KindOptions::new())
        .unwrap();
    builder
        .define("Long", Pattern::regex("[a-z]+"), KindOptions::new())
        .unwrap();
    let catalog = builder.build();
    let table = ModeTableBuilder::new("main")
        .mode("main", order)
        .build(&catalog)
        .unwrap();
    Grammar::new(catalog, table).unwrap()
}

#[rstest]
#[case::short_first(&["Short", "Long"], &[("Short", "ab"), ("Long", "c")])]
#[case::long_first(&["Long", "Short"], &[("Long", "abc")])]
fn test_earlier_declaration_wins(#[case] order: &[&str], #[case] expected: &[(&str, &str)]) {
    let grammar = overlapping_grammar(order);
    let result = Lexer::new(&grammar).tokenize("abc");
    let pairs: Vec<(&str, &str)> = result.tokens.iter().map(|t| (t.kind, t.text)).collect();
    assert_eq!(pairs, expected);
}

#[test]
fn test_double_colon_listed_before_colon() {
    let result = tokenize("{{a:::b}}");
    let pairs: Vec<(&str, &str)> = result.tokens.iter().map(|t| (t.kind, t.text)).collect();
    assert_eq!(
        pairs,
        vec![
            (MACRO_START, "{{"),
            (MACRO_IDENTIFIER, "a"),
            (DOUBLE_COLON, "::"),
            (COLON, ":"),
            (IDENTIFIER, "b"),
            (MACRO_END, "}}")
        ]
    );
}
