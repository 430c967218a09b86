//! Natively implemented functions.
//!
//! Arguments arrive already narrowed to the declared parameter types, so a
//! rule only has to handle values of those types. Numeric rules use interval
//! arithmetic and may over-approximate.

use navi_ir::{Expr, Literal};
use navi_types::{NumberSet, TypeValue};

use crate::{EvalResult, ScopeBuilder};

/// Register every builtin function in `builder`.
pub fn register(builder: &mut ScopeBuilder) -> EvalResult<()> {
    let number = || Expr::Literal(Literal::Number);
    let string = || Expr::Literal(Literal::String);

    builder.add_builtin("number::add", &[("a", number()), ("b", number())], add)?;
    builder.add_builtin("number::sub", &[("a", number()), ("b", number())], sub)?;
    builder.add_builtin("number::mul", &[("a", number()), ("b", number())], mul)?;
    builder.add_builtin("number::neg", &[("a", number())], neg)?;
    builder.add_builtin("number::min", &[("a", number()), ("b", number())], min)?;
    builder.add_builtin("number::max", &[("a", number()), ("b", number())], max)?;
    builder.add_builtin("string::concat", &[("a", string()), ("b", string())], concat)?;
    Ok(())
}

fn numeric(args: &[TypeValue], op: fn(&NumberSet, &NumberSet) -> NumberSet) -> TypeValue {
    match args {
        [TypeValue::Number(a), TypeValue::Number(b)] => TypeValue::number(op(a, b)),
        _ => TypeValue::Never,
    }
}

fn add(args: &[TypeValue]) -> TypeValue {
    numeric(args, NumberSet::add)
}

fn sub(args: &[TypeValue]) -> TypeValue {
    numeric(args, NumberSet::sub)
}

fn mul(args: &[TypeValue]) -> TypeValue {
    numeric(args, NumberSet::mul)
}

fn min(args: &[TypeValue]) -> TypeValue {
    numeric(args, NumberSet::pointwise_min)
}

fn max(args: &[TypeValue]) -> TypeValue {
    numeric(args, NumberSet::pointwise_max)
}

fn neg(args: &[TypeValue]) -> TypeValue {
    match args {
        [TypeValue::Number(a)] => TypeValue::number(a.neg()),
        _ => TypeValue::Never,
    }
}

fn concat(args: &[TypeValue]) -> TypeValue {
    match args {
        [TypeValue::String(a), TypeValue::String(b)] => TypeValue::string(a.concat(b)),
        _ => TypeValue::Never,
    }
}
