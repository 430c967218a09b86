//! Discrete sets of strings.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Literal products larger than this widen to `string`.
const MAX_CONCAT_LITERALS: usize = 64;

/// Either finitely many strings, or every string except finitely many.
///
/// Both forms are closed under intersection and union, and each set has a
/// single representation: the empty set is `Only({})`, `string` is
/// `Except({})`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StringSet {
    Only(BTreeSet<Arc<str>>),
    Except(BTreeSet<Arc<str>>),
}

impl StringSet {
    pub fn empty() -> Self {
        StringSet::Only(BTreeSet::new())
    }

    /// `string`
    pub fn all() -> Self {
        StringSet::Except(BTreeSet::new())
    }

    pub fn literal(value: &str) -> Self {
        StringSet::Only(BTreeSet::from([Arc::from(value)]))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, StringSet::Only(set) if set.is_empty())
    }

    pub fn contains(&self, value: &str) -> bool {
        match self {
            StringSet::Only(set) => set.contains(value),
            StringSet::Except(set) => !set.contains(value),
        }
    }

    /// The single member of a one-element set.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            StringSet::Only(set) if set.len() == 1 => set.first().map(AsRef::as_ref),
            _ => None,
        }
    }

    #[must_use]
    pub fn intersect(&self, other: &StringSet) -> StringSet {
        use StringSet::{Except, Only};
        match (self, other) {
            (Only(a), Only(b)) => Only(a.intersection(b).cloned().collect()),
            (Only(a), Except(b)) | (Except(b), Only(a)) => Only(a.difference(b).cloned().collect()),
            (Except(a), Except(b)) => Except(a.union(b).cloned().collect()),
        }
    }

    #[must_use]
    pub fn union(&self, other: &StringSet) -> StringSet {
        use StringSet::{Except, Only};
        match (self, other) {
            (Only(a), Only(b)) => Only(a.union(b).cloned().collect()),
            (Only(a), Except(b)) | (Except(b), Only(a)) => Except(b.difference(a).cloned().collect()),
            (Except(a), Except(b)) => Except(a.intersection(b).cloned().collect()),
        }
    }

    /// Every `a + b` with `a` in `self` and `b` in `other`.
    #[must_use]
    pub fn concat(&self, other: &StringSet) -> StringSet {
        match (self, other) {
            (StringSet::Only(a), StringSet::Only(b)) => {
                if a.is_empty() || b.is_empty() {
                    return StringSet::empty();
                }
                if a.len().saturating_mul(b.len()) > MAX_CONCAT_LITERALS {
                    return StringSet::all();
                }
                StringSet::Only(
                    a.iter()
                        .flat_map(|x| b.iter().map(move |y| Arc::from(format!("{x}{y}"))))
                        .collect(),
                )
            }
            _ if self.is_empty() || other.is_empty() => StringSet::empty(),
            _ => StringSet::all(),
        }
    }
}

impl fmt::Display for StringSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringSet::Only(set) if set.is_empty() => f.write_str("never"),
            StringSet::Only(set) => write_literals(f, set, " | "),
            StringSet::Except(set) if set.is_empty() => f.write_str("string"),
            StringSet::Except(set) => {
                f.write_str("string \\ {")?;
                write_literals(f, set, ", ")?;
                f.write_str("}")
            }
        }
    }
}

fn write_literals(f: &mut fmt::Formatter<'_>, set: &BTreeSet<Arc<str>>, sep: &str) -> fmt::Result {
    for (i, s) in set.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{:?}", s.as_ref())?;
    }
    Ok(())
}
