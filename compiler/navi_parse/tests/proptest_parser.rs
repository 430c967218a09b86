//! Property-based tests for the parser.
//!
//! Expressions are generated as trees, printed, parsed back and compared,
//! and arbitrary input is checked to never panic the lexer or parser.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use navi_ir::{Expr, Literal, StringInterner};
use navi_parse::{lex, parse_definitions, parse_expression, TokenKind};
use proptest::prelude::*;

/// A generated expression together with its source text.
#[derive(Clone, Debug)]
enum Gen {
    Int,
    Number,
    Num(i32),
    Str(String),
    Range(i32, i32),
    Name(String),
    Union(Vec<Gen>),
    Intersection(Vec<Gen>),
    Paren(Box<Gen>),
}

impl Gen {
    fn source(&self) -> String {
        match self {
            Gen::Int => "int".to_owned(),
            Gen::Number => "number".to_owned(),
            Gen::Num(n) => n.to_string(),
            Gen::Str(s) => format!("{s:?}"),
            Gen::Range(a, b) => format!("{a}..{b}"),
            Gen::Name(name) => name.clone(),
            Gen::Union(items) => join(items, " | "),
            Gen::Intersection(items) => join(items, " & "),
            Gen::Paren(inner) => format!("({})", inner.source()),
        }
    }

    fn expr(&self, interner: &StringInterner) -> Expr {
        match self {
            Gen::Int => Expr::Literal(Literal::Int),
            Gen::Number => Expr::Literal(Literal::Number),
            Gen::Num(n) => Expr::number(f64::from(*n)),
            Gen::Str(s) => Expr::string(s),
            Gen::Range(a, b) => Expr::Literal(Literal::Interval {
                min: f64::from(*a),
                max: f64::from(*b),
            }),
            Gen::Name(name) => Expr::named(interner.intern(name)),
            Gen::Union(items) => Expr::Union(items.iter().map(|g| g.expr(interner)).collect()),
            Gen::Intersection(items) => {
                Expr::Intersection(items.iter().map(|g| g.expr(interner)).collect())
            }
            Gen::Paren(inner) => inner.expr(interner),
        }
    }
}

fn join(items: &[Gen], sep: &str) -> String {
    items.iter().map(Gen::source).collect::<Vec<_>>().join(sep)
}

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}(::[a-z][a-z0-9]{0,4})?".prop_filter("keywords", |s| {
        !matches!(
            s.as_str(),
            "any" | "never" | "number" | "int" | "string" | "inf" | "struct" | "let" | "def"
                | "match" | "as"
        )
    })
}

fn arb_atom() -> impl Strategy<Value = Gen> {
    prop_oneof![
        Just(Gen::Int),
        Just(Gen::Number),
        (-100i32..100).prop_map(Gen::Num),
        "[a-z ]{0,8}".prop_map(Gen::Str),
        (-50i32..0, 0i32..50).prop_map(|(a, b)| Gen::Range(a, b)),
        arb_name().prop_map(Gen::Name),
    ]
}

/// Unions contain intersections, intersections contain atoms or
/// parenthesized sub-expressions, matching the precedence levels.
fn arb_expr() -> impl Strategy<Value = Gen> {
    arb_atom().prop_recursive(3, 24, 4, |inner| {
        let operand = prop_oneof![
            arb_atom(),
            inner.clone().prop_map(|g| Gen::Paren(Box::new(g))),
        ];
        let conj = prop::collection::vec(operand, 2..4).prop_map(Gen::Intersection);
        prop_oneof![
            conj.clone(),
            prop::collection::vec(prop_oneof![arb_atom(), conj], 2..4).prop_map(Gen::Union),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn printed_expressions_parse_back(generated in arb_expr()) {
        let interner = StringInterner::new();
        let source = generated.source();
        let parsed = parse_expression(&source, &interner);
        prop_assert_eq!(parsed, Ok(generated.expr(&interner)), "source: {}", source);
    }

    #[test]
    fn let_items_round_trip(name in arb_name(), generated in arb_expr()) {
        let interner = StringInterner::new();
        let source = format!("let {name} = {};", generated.source());
        let items = parse_definitions(&source, &interner).unwrap();
        prop_assert_eq!(items.len(), 1);
        prop_assert_eq!(interner.lookup(items[0].name()), name.as_str());
    }

    #[test]
    fn arbitrary_input_never_panics(source in "\\PC{0,64}") {
        let interner = StringInterner::new();
        let _ = parse_definitions(&source, &interner);
        let _ = parse_expression(&source, &interner);
    }

    #[test]
    fn lexing_always_ends_with_eof(source in "[ -~]{0,64}") {
        let interner = StringInterner::new();
        let tokens = lex(&source, &interner);
        prop_assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
    }
}
