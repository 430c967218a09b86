//! Navi Parse - text to `navi_ir` expressions and declarations.
//!
//! ```text
//! struct Point { x: number, y: number }
//! struct null;
//! let bool = true | false;
//! def distance(a: Point, b: Point) = number;
//! def not(a: bool) = match a { true => false, false => true };
//! ```
//!
//! Lexing is done with `logos`; parsing is a recursive-descent pass over
//! the token list that stops at the first error.

mod error;
mod lexer;
mod parser;

pub use error::ParseError;
pub use lexer::{lex, Token, TokenKind};
pub use parser::{parse_definitions, parse_expression, Parser};
