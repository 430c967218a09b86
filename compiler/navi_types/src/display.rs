//! Human-readable rendering of type values.

use std::fmt;

use navi_ir::StringInterner;

use crate::TypeValue;

/// Display adapter resolving struct and function names through an interner.
pub struct TypeDisplay<'a> {
    value: &'a TypeValue,
    interner: &'a StringInterner,
}

impl TypeValue {
    /// Render this value, e.g. `Image { width: int(0..inf), .. }`.
    pub fn display<'a>(&'a self, interner: &'a StringInterner) -> TypeDisplay<'a> {
        TypeDisplay {
            value: self,
            interner,
        }
    }
}

impl TypeDisplay<'_> {
    fn nested<'b>(&'b self, value: &'b TypeValue) -> TypeDisplay<'b> {
        TypeDisplay {
            value,
            interner: self.interner,
        }
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            TypeValue::Never => f.write_str("never"),
            TypeValue::Any => f.write_str("any"),
            TypeValue::Number(set) => write!(f, "{set}"),
            TypeValue::String(set) => write!(f, "{set}"),
            TypeValue::Struct(value) => {
                f.write_str(self.interner.lookup(value.name()))?;
                if value.fields().is_empty() {
                    return Ok(());
                }
                f.write_str(" { ")?;
                for (i, (name, field)) in value.fields().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", self.interner.lookup(*name), self.nested(field))?;
                }
                f.write_str(" }")
            }
            TypeValue::Function(value) => {
                write!(f, "fn {}(", self.interner.lookup(value.name()))?;
                for (i, (name, param)) in value.parameters().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", self.interner.lookup(*name), self.nested(param))?;
                }
                f.write_str(")")
            }
            TypeValue::Union(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{}", self.nested(item))?;
                }
                Ok(())
            }
        }
    }
}
