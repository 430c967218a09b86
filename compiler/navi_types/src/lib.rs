//! Type values for Navi.
//!
//! A `TypeValue` is a set of values: `never` is the empty set, `any` the
//! full set, and everything in between is built from
//! - number sets (literals, real intervals, integer intervals),
//! - string sets (finite literal sets or co-finite "string except" sets),
//! - struct values (a struct name plus the value of every field),
//! - function values (first-class signatures),
//! - canonical unions of the above.
//!
//! Every value has exactly one representation, so structural equality is set
//! equality for numbers, strings and the wildcards, and [`intersect`] and
//! [`union`] are total: they never fail and never panic.

mod algebra;
mod display;
mod number;
mod string_set;
mod value;

pub use algebra::{intersect, intersect_all, is_subset_of, union, union_all};
pub use display::TypeDisplay;
pub use number::{Interval, NumberSet};
pub use string_set::StringSet;
pub use value::{FunctionValue, ScopeId, StructValue, TypeValue};
