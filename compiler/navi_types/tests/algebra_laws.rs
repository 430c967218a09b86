//! Property tests for the set algebra.
//!
//! Values are drawn from numeric intervals, integer intervals, small
//! discrete string sets, single-field structs, the wildcard and the empty
//! value, plus unions of those. Two-field structs get their own properties
//! for union merging and subset.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use navi_ir::{Name, StringInterner};
use navi_types::{intersect, is_subset_of, union, NumberSet, StringSet, TypeValue};
use proptest::prelude::*;
use std::sync::{Arc, OnceLock};

fn name(s: &str) -> Name {
    static NAMES: OnceLock<StringInterner> = OnceLock::new();
    NAMES.get_or_init(StringInterner::new).intern(s)
}

fn size(width: TypeValue) -> TypeValue {
    TypeValue::structure(name("Size"), vec![(name("width"), width)])
}

fn label(text: TypeValue) -> TypeValue {
    TypeValue::structure(name("Label"), vec![(name("text"), text)])
}

fn point(x: TypeValue, y: TypeValue) -> TypeValue {
    TypeValue::structure(name("Point"), vec![(name("x"), x), (name("y"), y)])
}

fn bound() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => (-20i32..20).prop_map(f64::from),
        2 => (-40i32..40).prop_map(|x| f64::from(x) / 4.0),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
    ]
}

fn number_set() -> impl Strategy<Value = TypeValue> {
    prop_oneof![
        (bound(), bound()).prop_map(|(a, b)| {
            TypeValue::number(NumberSet::interval(a.min(b), a.max(b)))
        }),
        (bound(), bound()).prop_map(|(a, b)| {
            TypeValue::number(NumberSet::int_interval(a.min(b), a.max(b)))
        }),
        bound().prop_map(TypeValue::number_literal),
        Just(TypeValue::int()),
        Just(TypeValue::any_number()),
    ]
}

fn string_set() -> impl Strategy<Value = TypeValue> {
    let word = || prop::sample::select(vec!["png", "jpg", "webp", "tiff"]);
    prop_oneof![
        word().prop_map(TypeValue::string_literal),
        (word(), word()).prop_map(|(a, b)| {
            union(&TypeValue::string_literal(a), &TypeValue::string_literal(b))
        }),
        Just(TypeValue::any_string()),
        word().prop_map(|w| {
            TypeValue::String(StringSet::Except(std::iter::once(Arc::from(w)).collect()))
        }),
    ]
}

fn leaf() -> impl Strategy<Value = TypeValue> {
    prop_oneof![
        4 => number_set(),
        3 => string_set(),
        1 => number_set().prop_map(size),
        1 => string_set().prop_map(label),
        1 => Just(TypeValue::Any),
        1 => Just(TypeValue::Never),
    ]
}

fn value() -> impl Strategy<Value = TypeValue> {
    prop_oneof![
        3 => leaf(),
        1 => prop::collection::vec(leaf(), 2..4)
            .prop_map(|items| items.iter().fold(TypeValue::Never, |acc, v| union(&acc, v))),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn intersect_is_commutative(a in value(), b in value()) {
        prop_assert_eq!(intersect(&a, &b), intersect(&b, &a));
    }

    #[test]
    fn intersect_is_associative(a in value(), b in value(), c in value()) {
        prop_assert_eq!(
            intersect(&intersect(&a, &b), &c),
            intersect(&a, &intersect(&b, &c))
        );
    }

    #[test]
    fn intersect_is_idempotent(a in value()) {
        prop_assert_eq!(intersect(&a, &a), a);
    }

    #[test]
    fn any_and_never_bound_intersection(a in value()) {
        prop_assert_eq!(intersect(&a, &TypeValue::Any), a.clone());
        prop_assert_eq!(intersect(&a, &TypeValue::Never), TypeValue::Never);
    }

    #[test]
    fn union_is_commutative(a in value(), b in value()) {
        prop_assert_eq!(union(&a, &b), union(&b, &a));
    }

    #[test]
    fn union_is_associative(a in value(), b in value(), c in value()) {
        prop_assert_eq!(union(&union(&a, &b), &c), union(&a, &union(&b, &c)));
    }

    #[test]
    fn union_is_idempotent(a in value()) {
        prop_assert_eq!(union(&a, &a), a);
    }

    #[test]
    fn operands_are_subsets_of_their_union(a in value(), b in value()) {
        let u = union(&a, &b);
        prop_assert!(is_subset_of(&a, &u));
        prop_assert!(is_subset_of(&b, &u));
    }

    #[test]
    fn intersection_is_a_subset_of_both(a in value(), b in value()) {
        let i = intersect(&a, &b);
        prop_assert!(is_subset_of(&i, &a));
        prop_assert!(is_subset_of(&i, &b));
    }

    #[test]
    fn structs_differing_in_one_field_union_fieldwise(
        x in number_set(),
        other_x in number_set(),
        y in number_set(),
    ) {
        let split = union(&point(x.clone(), y.clone()), &point(other_x.clone(), y.clone()));
        let merged = point(union(&x, &other_x), y);
        prop_assert_eq!(&split, &merged);
        prop_assert!(is_subset_of(&merged, &split));
    }

    #[test]
    fn struct_operands_are_subsets_of_their_union(
        a in (number_set(), number_set()).prop_map(|(x, y)| point(x, y)),
        b in (number_set(), number_set()).prop_map(|(x, y)| point(x, y)),
    ) {
        let u = union(&a, &b);
        prop_assert!(is_subset_of(&a, &u));
        prop_assert!(is_subset_of(&b, &u));
        prop_assert!(is_subset_of(&intersect(&a, &b), &a));
    }
}
