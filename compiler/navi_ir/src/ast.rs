//! Expression trees and declarations of the Navi type language.
//!
//! Expressions are plain immutable trees. Definitions share them through
//! `Arc`, so cloning a scope never copies an expression.

use std::sync::Arc;

use crate::{Name, Span};

/// Intrinsic values that need no scope lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    /// `any`: every value.
    Any,
    /// `never`: no value.
    Never,
    /// `number`: every number, `-inf` and `inf` included.
    Number,
    /// `int`: every integer.
    Int,
    /// `string`: every string.
    String,
    /// A single number, e.g. `3` or `-0.5`.
    Num(f64),
    /// A single string, e.g. `"png"`.
    Str(Arc<str>),
    /// Closed real interval `min..max`.
    Interval { min: f64, max: f64 },
    /// Integers in `int(min..max)`.
    IntInterval { min: f64, max: f64 },
}

/// A type expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Literal),
    /// Reference to a definition or a bound parameter.
    Named(Name),
    /// `callee(args..)`.
    Call { callee: Name, args: Vec<Expr> },
    /// `base.field`.
    Field { base: Box<Expr>, field: Name },
    /// `Name { field: expr, .. }`: a struct with some fields narrowed.
    StructInstance { name: Name, fields: Vec<FieldInit> },
    /// `a | b | ..`
    Union(Vec<Expr>),
    /// `a & b & ..`
    Intersection(Vec<Expr>),
    /// `match scrutinee { pattern [as binding] => body, .. }`
    Match {
        scrutinee: Box<Expr>,
        arms: Vec<MatchArm>,
    },
}

impl Expr {
    pub fn named(name: Name) -> Self {
        Expr::Named(name)
    }

    pub fn call(callee: Name, args: Vec<Expr>) -> Self {
        Expr::Call { callee, args }
    }

    pub fn field(base: Expr, field: Name) -> Self {
        Expr::Field {
            base: Box::new(base),
            field,
        }
    }

    pub fn number(value: f64) -> Self {
        Expr::Literal(Literal::Num(value))
    }

    pub fn string(value: &str) -> Self {
        Expr::Literal(Literal::Str(Arc::from(value)))
    }
}

/// `name: expr` inside a struct instance expression.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldInit {
    pub name: Name,
    pub value: Expr,
}

/// One arm of a `match` expression. `_` is `Literal::Any`.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchArm {
    pub pattern: Expr,
    pub binding: Option<Name>,
    pub body: Expr,
}

/// `name: type` in a parameter list or struct body.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamDecl {
    pub name: Name,
    pub ty: Expr,
}

impl ParamDecl {
    pub fn new(name: Name, ty: Expr) -> Self {
        ParamDecl { name, ty }
    }
}

/// A parsed top-level declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ItemKind {
    /// `struct Name { field: type, .. }` or `struct Name;`
    Struct { name: Name, fields: Vec<ParamDecl> },
    /// `let name = expr;`
    Let { name: Name, value: Expr },
    /// `def name(param: type, ..) = body;`
    Def {
        name: Name,
        params: Vec<ParamDecl>,
        body: Expr,
    },
}

impl Item {
    /// The name this item declares.
    pub fn name(&self) -> Name {
        match &self.kind {
            ItemKind::Struct { name, .. }
            | ItemKind::Let { name, .. }
            | ItemKind::Def { name, .. } => *name,
        }
    }
}
