//! Total set algebra over type values.
//!
//! `intersect` and `union` are defined for every pair of values. Both
//! return canonical values, so the laws callers rely on hold structurally:
//! intersection is commutative, associative and idempotent, with `any` as
//! identity and `never` as absorbing element; union is the dual.

use crate::value::StructValue;
use crate::{NumberSet, StringSet, TypeValue};

/// The values contained in both `a` and `b`.
pub fn intersect(a: &TypeValue, b: &TypeValue) -> TypeValue {
    use TypeValue::{Any, Function, Never, Number, String, Struct, Union};

    match (a, b) {
        (Never, _) | (_, Never) => Never,
        (Any, other) | (other, Any) => other.clone(),
        (Union(items), other) | (other, Union(items)) => {
            union_all(items.iter().map(|item| intersect(item, other)))
        }
        (Number(x), Number(y)) => TypeValue::number(x.intersect(y)),
        (String(x), String(y)) => TypeValue::string(x.intersect(y)),
        (Struct(x), Struct(y)) => intersect_structs(x, y),
        (Function(x), Function(y)) => {
            if x == y {
                a.clone()
            } else {
                Never
            }
        }
        _ => Never,
    }
}

/// Structs intersect field by field; different structs share no value.
fn intersect_structs(x: &StructValue, y: &StructValue) -> TypeValue {
    if x.name() != y.name() || x.fields().len() != y.fields().len() {
        return TypeValue::Never;
    }
    let mut fields = Vec::with_capacity(x.fields().len());
    for ((name, left), (other_name, right)) in x.fields().iter().zip(y.fields()) {
        if name != other_name {
            return TypeValue::Never;
        }
        let value = intersect(left, right);
        if value.is_never() {
            return TypeValue::Never;
        }
        fields.push((*name, value));
    }
    TypeValue::structure(x.name(), fields)
}

/// The values contained in `a` or `b`.
pub fn union(a: &TypeValue, b: &TypeValue) -> TypeValue {
    union_all([a.clone(), b.clone()])
}

/// Union of any number of values; `never` for none.
pub fn union_all(values: impl IntoIterator<Item = TypeValue>) -> TypeValue {
    let mut builder = UnionBuilder::new();
    for value in values {
        builder.add(value);
    }
    builder.build()
}

/// Intersection of any number of values; `any` for none.
pub fn intersect_all(values: impl IntoIterator<Item = TypeValue>) -> TypeValue {
    values
        .into_iter()
        .fold(TypeValue::Any, |acc, value| intersect(&acc, &value))
}

/// Whether every value of `a` is a value of `b`.
///
/// Checked member by member, so a union of structs is compared piece by
/// piece rather than through the representation of the whole intersection.
pub fn is_subset_of(a: &TypeValue, b: &TypeValue) -> bool {
    a.members()
        .iter()
        .all(|member| intersect(member, b) == *member)
}

/// Accumulates union members by category and emits the canonical form.
struct UnionBuilder {
    any: bool,
    number: NumberSet,
    string: StringSet,
    others: Vec<TypeValue>,
}

impl UnionBuilder {
    fn new() -> Self {
        UnionBuilder {
            any: false,
            number: NumberSet::empty(),
            string: StringSet::empty(),
            others: Vec::new(),
        }
    }

    fn add(&mut self, value: TypeValue) {
        match value {
            TypeValue::Never => {}
            TypeValue::Any => self.any = true,
            TypeValue::Number(set) => self.number = self.number.union(&set),
            TypeValue::String(set) => self.string = self.string.union(&set),
            TypeValue::Union(items) => {
                for item in items.iter() {
                    self.add(item.clone());
                }
            }
            other @ (TypeValue::Struct(_) | TypeValue::Function(_)) => self.others.push(other),
        }
    }

    fn build(self) -> TypeValue {
        if self.any {
            return TypeValue::Any;
        }

        let others = merge_structs(self.others);

        let mut members = Vec::with_capacity(others.len() + 2);
        if !self.number.is_empty() {
            members.push(TypeValue::Number(self.number));
        }
        if !self.string.is_empty() {
            members.push(TypeValue::String(self.string));
        }
        members.extend(others);

        match members.len() {
            0 => TypeValue::Never,
            1 => members.swap_remove(0),
            _ => TypeValue::Union(members.into()),
        }
    }
}

/// Sort, deduplicate and drop subsumed members, then merge same-name
/// structs that differ in exactly one field until none are left:
/// `P { x: A, y: C } | P { x: B, y: C }` is `P { x: A | B, y: C }`.
fn merge_structs(mut members: Vec<TypeValue>) -> Vec<TypeValue> {
    loop {
        members.sort();
        members.dedup();
        members = drop_subsumed(members);
        let Some((i, j, merged)) = find_mergeable(&members) else {
            return members;
        };
        // j > i, so the swap does not move member i.
        members.swap_remove(j);
        members[i] = merged;
    }
}

fn find_mergeable(members: &[TypeValue]) -> Option<(usize, usize, TypeValue)> {
    for (i, a) in members.iter().enumerate() {
        let Some(x) = a.as_struct() else { continue };
        for (j, b) in members.iter().enumerate().skip(i + 1) {
            let Some(y) = b.as_struct() else { continue };
            if let Some(merged) = merge_pair(x, y) {
                return Some((i, j, merged));
            }
        }
    }
    None
}

fn merge_pair(x: &StructValue, y: &StructValue) -> Option<TypeValue> {
    if x.name() != y.name() || x.fields().len() != y.fields().len() {
        return None;
    }
    let mut differing = None;
    for (k, ((name, left), (other_name, right))) in x.fields().iter().zip(y.fields()).enumerate() {
        if name != other_name {
            return None;
        }
        if left != right {
            if differing.is_some() {
                return None;
            }
            differing = Some(k);
        }
    }
    let k = differing?;
    let mut fields = x.fields().to_vec();
    fields[k].1 = union(&x.fields()[k].1, &y.fields()[k].1);
    Some(TypeValue::structure(x.name(), fields))
}

/// Remove struct members contained in another member of the same struct.
///
/// Subset is a partial order, so the survivors are exactly the maximal
/// members and the result does not depend on insertion order.
fn drop_subsumed(members: Vec<TypeValue>) -> Vec<TypeValue> {
    let subsumed: Vec<bool> = members
        .iter()
        .enumerate()
        .map(|(i, member)| {
            let TypeValue::Struct(inner) = member else {
                return false;
            };
            members.iter().enumerate().any(|(j, other)| {
                i != j
                    && other
                        .as_struct()
                        .is_some_and(|o| o.name() == inner.name())
                    && is_subset_of(member, other)
            })
        })
        .collect();

    members
        .into_iter()
        .zip(subsumed)
        .filter_map(|(member, drop)| (!drop).then_some(member))
        .collect()
}
