#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use super::*;

#[test]
fn interning_is_idempotent() {
    let interner = StringInterner::new();
    let a = interner.intern("number::add");
    let b = interner.intern("number::add");
    assert_eq!(a, b);
    assert_eq!(interner.lookup(a), "number::add");
}

#[test]
fn distinct_strings_get_distinct_names() {
    let interner = StringInterner::new();
    let image = interner.intern("Image");
    let color = interner.intern("Color");
    assert_ne!(image, color);
    assert_eq!(interner.lookup(image), "Image");
    assert_eq!(interner.lookup(color), "Color");
}

#[test]
fn empty_string_is_name_empty() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
}

#[test]
fn keywords_are_pre_interned() {
    let interner = StringInterner::new();
    let before = interner.len();
    interner.intern("number");
    interner.intern("match");
    assert_eq!(interner.len(), before);
    assert!(!interner.is_empty());
}

#[test]
fn shared_interner_is_shared_across_threads() {
    let shared = SharedInterner::new();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let shared = shared.clone();
            std::thread::spawn(move || shared.intern(&format!("Input{i}")))
        })
        .collect();
    let names: Vec<Name> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (i, name) in names.into_iter().enumerate() {
        assert_eq!(shared.lookup(name), format!("Input{i}"));
    }
}

#[test]
fn clones_point_at_the_same_interner() {
    let a = SharedInterner::new();
    let b = a.clone();
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&SharedInterner::new()));
}
