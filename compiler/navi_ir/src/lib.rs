//! Navi IR - shared vocabulary for the Navi type language.
//!
//! This crate contains the data structures every other Navi crate speaks:
//! - `Name`: interned identifiers (`number::add`, `Image`, `Input0`)
//! - `StringInterner` / `SharedInterner`: thread-safe interning
//! - `Span`: byte ranges into definition sources
//! - `Expr` / `Item`: the immutable expression tree and parsed declarations
//!
//! Nothing here evaluates anything; see `navi_eval` for that.

mod ast;
mod interner;
mod name;
mod span;

pub use ast::{Expr, FieldInit, Item, ItemKind, Literal, MatchArm, ParamDecl};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use span::Span;
