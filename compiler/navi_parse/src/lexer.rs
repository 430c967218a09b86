//! Lexer using logos, interning identifiers as it goes.

use std::sync::Arc;

use logos::Logos;
use navi_ir::{Name, Span, StringInterner};

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    // === Keywords ===
    #[token("struct")]
    Struct,
    #[token("let")]
    Let,
    #[token("def")]
    Def,
    #[token("match")]
    Match,
    #[token("as")]
    As,
    #[token("any")]
    Any,
    #[token("never")]
    Never,
    #[token("number")]
    Number,
    #[token("int")]
    Int,
    #[token("string")]
    String,
    #[token("inf")]
    Inf,

    // === Symbols ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("..")]
    DotDot,
    #[token(".")]
    Dot,
    #[token("=>")]
    FatArrow,
    #[token("=")]
    Eq,
    #[token("|")]
    Pipe,
    #[token("&")]
    Amp,
    #[token("-")]
    Minus,
    #[token("_", priority = 3)]
    Underscore,

    // === Literals ===
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Num(f64),

    #[regex(r#""([^"\\]|\\.)*""#)]
    Str,

    // Identifier, possibly a `::` path such as `number::add`
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*(::[a-zA-Z_][a-zA-Z0-9_]*)*")]
    Ident,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Struct,
    Let,
    Def,
    Match,
    As,
    Any,
    Never,
    Number,
    Int,
    String,
    Inf,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Colon,
    Comma,
    Semicolon,
    DotDot,
    Dot,
    FatArrow,
    Eq,
    Pipe,
    Amp,
    Minus,
    Underscore,
    Num(f64),
    Str(Arc<str>),
    Ident(Name),
    /// A character sequence no token matches.
    Error,
    Eof,
}

impl TokenKind {
    /// How the token is referred to in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Struct => "`struct`",
            TokenKind::Let => "`let`",
            TokenKind::Def => "`def`",
            TokenKind::Match => "`match`",
            TokenKind::As => "`as`",
            TokenKind::Any => "`any`",
            TokenKind::Never => "`never`",
            TokenKind::Number => "`number`",
            TokenKind::Int => "`int`",
            TokenKind::String => "`string`",
            TokenKind::Inf => "`inf`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Colon => "`:`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::DotDot => "`..`",
            TokenKind::Dot => "`.`",
            TokenKind::FatArrow => "`=>`",
            TokenKind::Eq => "`=`",
            TokenKind::Pipe => "`|`",
            TokenKind::Amp => "`&`",
            TokenKind::Minus => "`-`",
            TokenKind::Underscore => "`_`",
            TokenKind::Num(_) => "a number",
            TokenKind::Str(_) => "a string",
            TokenKind::Ident(_) => "a name",
            TokenKind::Error => "an unrecognized character",
            TokenKind::Eof => "end of input",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Tokenize `source`. The result always ends with an `Eof` token.
pub fn lex(source: &str, interner: &StringInterner) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::from_range(lexer.span());
        let kind = match result {
            Ok(raw) => convert_token(raw, lexer.slice(), interner),
            Err(()) => TokenKind::Error,
        };
        tokens.push(Token { kind, span });
    }

    let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::point(end),
    });
    tokens
}

fn convert_token(raw: RawToken, slice: &str, interner: &StringInterner) -> TokenKind {
    match raw {
        RawToken::Struct => TokenKind::Struct,
        RawToken::Let => TokenKind::Let,
        RawToken::Def => TokenKind::Def,
        RawToken::Match => TokenKind::Match,
        RawToken::As => TokenKind::As,
        RawToken::Any => TokenKind::Any,
        RawToken::Never => TokenKind::Never,
        RawToken::Number => TokenKind::Number,
        RawToken::Int => TokenKind::Int,
        RawToken::String => TokenKind::String,
        RawToken::Inf => TokenKind::Inf,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::DotDot => TokenKind::DotDot,
        RawToken::Dot => TokenKind::Dot,
        RawToken::FatArrow => TokenKind::FatArrow,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Amp => TokenKind::Amp,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Underscore => TokenKind::Underscore,
        RawToken::Num(value) => TokenKind::Num(value),
        RawToken::Str => TokenKind::Str(Arc::from(unescape(&slice[1..slice.len() - 1]))),
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),
        // Skipped by logos, never produced.
        RawToken::LineComment => TokenKind::Error,
    }
}

/// Resolve `\"`, `\\`, `\n` and `\t`; any other escaped character stands
/// for itself.
fn unescape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}
