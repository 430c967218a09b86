//! The `TypeValue` domain.

use std::sync::Arc;

use navi_ir::Name;

use crate::{NumberSet, StringSet};

/// A type value: a set of values described structurally.
///
/// Invariants (upheld by the constructors and the algebra):
/// - `Number` and `String` are never empty (empty sets are `Never`),
/// - a `Struct` has no `never` field,
/// - a `Union` has at least two members, sorted and deduplicated, none of
///   them `Never`, `Any` or another `Union`, at most one `Number` and one
///   `String`, and no struct member contained in another member.
///
/// The variant order is part of the canonical union order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypeValue {
    Never,
    Any,
    Number(NumberSet),
    String(StringSet),
    Struct(Arc<StructValue>),
    Function(Arc<FunctionValue>),
    Union(Arc<[TypeValue]>),
}

impl TypeValue {
    /// Wrap a number set, mapping the empty set to `Never`.
    pub fn number(set: NumberSet) -> Self {
        if set.is_empty() {
            TypeValue::Never
        } else {
            TypeValue::Number(set)
        }
    }

    /// Wrap a string set, mapping the empty set to `Never`.
    pub fn string(set: StringSet) -> Self {
        if set.is_empty() {
            TypeValue::Never
        } else {
            TypeValue::String(set)
        }
    }

    /// `number`
    pub fn any_number() -> Self {
        TypeValue::Number(NumberSet::all())
    }

    /// `int`
    pub fn int() -> Self {
        TypeValue::Number(NumberSet::int())
    }

    /// `string`
    pub fn any_string() -> Self {
        TypeValue::String(StringSet::all())
    }

    pub fn number_literal(value: f64) -> Self {
        Self::number(NumberSet::literal(value))
    }

    pub fn string_literal(value: &str) -> Self {
        TypeValue::String(StringSet::literal(value))
    }

    /// A struct value; `never` if any field is `never`.
    pub fn structure(name: Name, fields: Vec<(Name, TypeValue)>) -> Self {
        if fields.iter().any(|(_, value)| value.is_never()) {
            return TypeValue::Never;
        }
        TypeValue::Struct(Arc::new(StructValue { name, fields }))
    }

    /// A first-class function signature, declared in scope `scope`.
    pub fn function(name: Name, scope: ScopeId, parameters: Vec<(Name, TypeValue)>) -> Self {
        TypeValue::Function(Arc::new(FunctionValue {
            name,
            parameters,
            scope,
        }))
    }

    #[inline]
    pub fn is_never(&self) -> bool {
        matches!(self, TypeValue::Never)
    }

    #[inline]
    pub fn is_any(&self) -> bool {
        matches!(self, TypeValue::Any)
    }

    pub fn as_number(&self) -> Option<&NumberSet> {
        match self {
            TypeValue::Number(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&StringSet> {
        match self {
            TypeValue::String(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            TypeValue::Struct(value) => Some(value.as_ref()),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionValue> {
        match self {
            TypeValue::Function(value) => Some(value.as_ref()),
            _ => None,
        }
    }

    /// Union members; a non-union value is its own single member.
    pub fn members(&self) -> &[TypeValue] {
        match self {
            TypeValue::Union(items) => &items[..],
            TypeValue::Never => &[],
            other => std::slice::from_ref(other),
        }
    }

    #[must_use]
    pub fn intersect(&self, other: &TypeValue) -> TypeValue {
        crate::intersect(self, other)
    }

    #[must_use]
    pub fn union(&self, other: &TypeValue) -> TypeValue {
        crate::union(self, other)
    }

    pub fn is_subset_of(&self, other: &TypeValue) -> bool {
        crate::is_subset_of(self, other)
    }
}

/// A struct value: the struct's name and the value of each declared field,
/// in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct StructValue {
    name: Name,
    fields: Vec<(Name, TypeValue)>,
}

impl StructValue {
    pub fn name(&self) -> Name {
        self.name
    }

    pub fn fields(&self) -> &[(Name, TypeValue)] {
        &self.fields
    }

    pub fn field(&self, name: Name) -> Option<&TypeValue> {
        self.fields
            .iter()
            .find_map(|(field, value)| (*field == name).then_some(value))
    }
}

/// Opaque identity of the scope a function was declared in.
///
/// Two functions with the same name from different scopes are different
/// values.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    pub const fn new(raw: usize) -> Self {
        ScopeId(raw)
    }
}

/// A function signature used as a value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FunctionValue {
    name: Name,
    parameters: Vec<(Name, TypeValue)>,
    scope: ScopeId,
}

impl FunctionValue {
    pub fn name(&self) -> Name {
        self.name
    }

    pub fn parameters(&self) -> &[(Name, TypeValue)] {
        &self.parameters
    }

    /// The scope that declares the function.
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}
