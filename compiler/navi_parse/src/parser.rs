//! Recursive-descent parser for definitions and expressions.
//!
//! Precedence, loosest first: `|`, `&`, postfix `.field`, primary.
//! A `Name {` directly after `match` is the start of the arm list, not a
//! struct instance, so struct instances in a scrutinee need parentheses.

use std::sync::Arc;

use navi_ir::{Expr, FieldInit, Item, ItemKind, Literal, MatchArm, Name, ParamDecl, Span, StringInterner};

use crate::lexer::{lex, Token, TokenKind};
use crate::ParseError;

/// Maximum expression nesting before the parser gives up.
const MAX_NESTING: usize = 128;

type ParseResult<T> = Result<T, ParseError>;

/// Parse a sequence of `struct`, `let` and `def` declarations.
pub fn parse_definitions(source: &str, interner: &StringInterner) -> ParseResult<Vec<Item>> {
    let tokens = lex(source, interner);
    Parser::new(&tokens).parse_items()
}

/// Parse a single expression spanning the whole input.
pub fn parse_expression(source: &str, interner: &StringInterner) -> ParseResult<Expr> {
    let tokens = lex(source, interner);
    let mut parser = Parser::new(&tokens);
    let expr = parser.expression()?;
    parser.expect_end()?;
    Ok(expr)
}

/// Parser state.
pub struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    depth: usize,
    /// Set while parsing a `match` scrutinee.
    no_struct_instance: bool,
}

impl<'t> Parser<'t> {
    /// `tokens` must end with `Eof`, as produced by [`lex`].
    pub fn new(tokens: &'t [Token]) -> Self {
        Parser {
            tokens,
            pos: 0,
            depth: 0,
            no_struct_instance: false,
        }
    }

    pub fn parse_items(mut self) -> ParseResult<Vec<Item>> {
        let mut items = Vec::new();
        while !self.at_end() {
            items.push(self.item()?);
        }
        Ok(items)
    }

    pub fn expect_end(&self) -> ParseResult<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    // ===== Token access =====

    fn current(&self) -> &'t Token {
        let tokens = self.tokens;
        &tokens[self.pos.min(tokens.len().saturating_sub(1))]
    }

    fn current_kind(&self) -> &'t TokenKind {
        &self.current().kind
    }

    fn current_span(&self) -> Span {
        self.current().span
    }

    fn peek_kind(&self, offset: usize) -> &'t TokenKind {
        let tokens = self.tokens;
        &tokens[(self.pos + offset).min(tokens.len().saturating_sub(1))].kind
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> &'t Token {
        let token = self.current();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: &TokenKind) -> ParseResult<&'t Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::new(
            format!("expected {expected}, found {}", self.current_kind().describe()),
            self.current_span(),
        )
    }

    fn name(&mut self) -> ParseResult<Name> {
        match self.current_kind() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(*name)
            }
            _ => Err(self.unexpected("a name")),
        }
    }

    // ===== Items =====

    fn item(&mut self) -> ParseResult<Item> {
        let start = self.current_span();
        let kind = match self.current_kind() {
            TokenKind::Struct => self.struct_item()?,
            TokenKind::Let => self.let_item()?,
            TokenKind::Def => self.def_item()?,
            _ => return Err(self.unexpected("`struct`, `let` or `def`")),
        };
        let end = self.tokens[self.pos.saturating_sub(1)].span;
        Ok(Item {
            kind,
            span: start.merge(end),
        })
    }

    /// `struct Name;` or `struct Name { field: type, .. }` with an optional `;`.
    fn struct_item(&mut self) -> ParseResult<ItemKind> {
        self.consume(&TokenKind::Struct)?;
        let name = self.name()?;
        let mut fields = Vec::new();
        if self.eat(&TokenKind::LBrace) {
            fields = self.param_list(&TokenKind::RBrace)?;
            self.eat(&TokenKind::Semicolon);
        } else {
            self.consume(&TokenKind::Semicolon)?;
        }
        Ok(ItemKind::Struct { name, fields })
    }

    fn let_item(&mut self) -> ParseResult<ItemKind> {
        self.consume(&TokenKind::Let)?;
        let name = self.name()?;
        self.consume(&TokenKind::Eq)?;
        let value = self.expression()?;
        self.consume(&TokenKind::Semicolon)?;
        Ok(ItemKind::Let { name, value })
    }

    fn def_item(&mut self) -> ParseResult<ItemKind> {
        self.consume(&TokenKind::Def)?;
        let name = self.name()?;
        self.consume(&TokenKind::LParen)?;
        let params = self.param_list(&TokenKind::RParen)?;
        self.consume(&TokenKind::Eq)?;
        let body = self.expression()?;
        self.consume(&TokenKind::Semicolon)?;
        Ok(ItemKind::Def { name, params, body })
    }

    /// `name: type, ..` up to and including `close`; trailing comma allowed.
    fn param_list(&mut self, close: &TokenKind) -> ParseResult<Vec<ParamDecl>> {
        let mut params = Vec::new();
        while !self.check(close) {
            let name = self.name()?;
            self.consume(&TokenKind::Colon)?;
            let ty = self.expression()?;
            params.push(ParamDecl::new(name, ty));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.consume(close)?;
        Ok(params)
    }

    // ===== Expressions =====

    pub fn expression(&mut self) -> ParseResult<Expr> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::new(
                format!("expression nested deeper than {MAX_NESTING} levels"),
                self.current_span(),
            ));
        }
        self.depth += 1;
        let result = self.union();
        self.depth -= 1;
        result
    }

    fn union(&mut self) -> ParseResult<Expr> {
        let first = self.intersection()?;
        if !self.check(&TokenKind::Pipe) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(&TokenKind::Pipe) {
            items.push(self.intersection()?);
        }
        Ok(Expr::Union(items))
    }

    fn intersection(&mut self) -> ParseResult<Expr> {
        let first = self.postfix()?;
        if !self.check(&TokenKind::Amp) {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat(&TokenKind::Amp) {
            items.push(self.postfix()?);
        }
        Ok(Expr::Intersection(items))
    }

    fn postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;
        while self.eat(&TokenKind::Dot) {
            let field = self.name()?;
            expr = Expr::field(expr, field);
        }
        Ok(expr)
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        match self.current_kind() {
            TokenKind::Any | TokenKind::Underscore => {
                self.advance();
                Ok(Expr::Literal(Literal::Any))
            }
            TokenKind::Never => {
                self.advance();
                Ok(Expr::Literal(Literal::Never))
            }
            TokenKind::Number => {
                self.advance();
                Ok(Expr::Literal(Literal::Number))
            }
            TokenKind::String => {
                self.advance();
                Ok(Expr::Literal(Literal::String))
            }
            TokenKind::Int => {
                self.advance();
                if self.eat(&TokenKind::LParen) {
                    let (min, max) = self.range()?;
                    self.consume(&TokenKind::RParen)?;
                    Ok(Expr::Literal(Literal::IntInterval { min, max }))
                } else {
                    Ok(Expr::Literal(Literal::Int))
                }
            }
            TokenKind::Num(_) | TokenKind::Inf | TokenKind::Minus => {
                let min = self.number()?;
                if self.eat(&TokenKind::DotDot) {
                    let max = self.number()?;
                    Ok(Expr::Literal(Literal::Interval { min, max }))
                } else {
                    Ok(Expr::number(min))
                }
            }
            TokenKind::Str(value) => {
                self.advance();
                Ok(Expr::Literal(Literal::Str(Arc::clone(value))))
            }
            TokenKind::Ident(name) => {
                self.advance();
                self.named(*name)
            }
            TokenKind::Match => self.match_expr(),
            TokenKind::LParen => {
                self.advance();
                let saved = std::mem::replace(&mut self.no_struct_instance, false);
                let expr = self.expression();
                self.no_struct_instance = saved;
                let expr = expr?;
                self.consume(&TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// A name, a call `name(args)` or a struct instance `Name { f: e }`.
    fn named(&mut self, name: Name) -> ParseResult<Expr> {
        if self.eat(&TokenKind::LParen) {
            let mut args = Vec::new();
            while !self.check(&TokenKind::RParen) {
                args.push(self.expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.consume(&TokenKind::RParen)?;
            return Ok(Expr::call(name, args));
        }

        let starts_instance = self.check(&TokenKind::LBrace)
            && (matches!(self.peek_kind(1), TokenKind::RBrace)
                || (matches!(self.peek_kind(1), TokenKind::Ident(_))
                    && matches!(self.peek_kind(2), TokenKind::Colon)));
        if starts_instance && !self.no_struct_instance {
            self.advance();
            let fields = self
                .param_list(&TokenKind::RBrace)?
                .into_iter()
                .map(|param| FieldInit {
                    name: param.name,
                    value: param.ty,
                })
                .collect();
            return Ok(Expr::StructInstance { name, fields });
        }

        Ok(Expr::named(name))
    }

    /// `match scrutinee { pattern [as name] => body, .. }`
    fn match_expr(&mut self) -> ParseResult<Expr> {
        self.consume(&TokenKind::Match)?;
        let saved = std::mem::replace(&mut self.no_struct_instance, true);
        let scrutinee = self.expression();
        self.no_struct_instance = saved;
        let scrutinee = scrutinee?;

        self.consume(&TokenKind::LBrace)?;
        let mut arms = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let pattern = self.expression()?;
            let binding = if self.eat(&TokenKind::As) {
                Some(self.name()?)
            } else {
                None
            };
            self.consume(&TokenKind::FatArrow)?;
            let body = self.expression()?;
            arms.push(MatchArm {
                pattern,
                binding,
                body,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.consume(&TokenKind::RBrace)?;
        Ok(Expr::Match {
            scrutinee: Box::new(scrutinee),
            arms,
        })
    }

    /// `min..max` inside `int(..)`.
    fn range(&mut self) -> ParseResult<(f64, f64)> {
        let min = self.number()?;
        self.consume(&TokenKind::DotDot)?;
        let max = self.number()?;
        Ok((min, max))
    }

    /// A possibly negated number or `inf`.
    fn number(&mut self) -> ParseResult<f64> {
        let negative = self.eat(&TokenKind::Minus);
        let value = match self.current_kind() {
            TokenKind::Num(value) => *value,
            TokenKind::Inf => f64::INFINITY,
            _ => return Err(self.unexpected("a number")),
        };
        self.advance();
        Ok(if negative { -value } else { value })
    }
}
