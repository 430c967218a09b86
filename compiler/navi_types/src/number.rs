//! Canonical sets of numbers.
//!
//! A [`NumberSet`] is a finite union of
//! - closed real intervals over the extended reals (`-inf` and `inf` are
//!   members of an interval that reaches them), and
//! - integer runs: every integer between two bounds, where a bound may be
//!   infinite to leave the run open on that side.
//!
//! Normal form:
//! - real intervals are sorted and pairwise disjoint, and a single-point real
//!   interval is never an integer (integer points are integer runs);
//! - integer runs are sorted, pairwise disjoint, non-adjacent, and contain no
//!   integer that a real interval already covers.
//!
//! That form is unique for every set the constructors can produce, which is
//! what makes the derived `Eq`/`Ord` mean set equality.
//!
//! `NaN` is not a number in this domain: constructors given `NaN` produce the
//! empty set, and `-0` is stored as `0`.

use std::cmp::Ordering;
use std::fmt;

/// A closed range `[min, max]` with `min <= max` and no `NaN` bound.
#[derive(Copy, Clone, Debug)]
pub struct Interval {
    min: f64,
    max: f64,
}

impl Interval {
    #[inline]
    fn new(min: f64, max: f64) -> Self {
        Interval {
            min: canonical(min),
            max: canonical(max),
        }
    }

    /// Lower bound.
    #[inline]
    pub fn lo(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    #[inline]
    pub fn hi(&self) -> f64 {
        self.max
    }

    #[inline]
    fn is_point(&self) -> bool {
        self.min == self.max
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Interval {}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Interval {
    fn cmp(&self, other: &Self) -> Ordering {
        self.min
            .total_cmp(&other.min)
            .then_with(|| self.max.total_cmp(&other.max))
    }
}

/// Fold `-0.0` into `0.0` so `total_cmp` agrees with `==`.
#[inline]
fn canonical(x: f64) -> f64 {
    x + 0.0
}

#[inline]
fn is_integer(x: f64) -> bool {
    x.is_finite() && x.fract() == 0.0
}

/// Whether `[lo, hi]` (integral or infinite bounds) contains an integer.
#[inline]
fn is_int_run(lo: f64, hi: f64) -> bool {
    lo <= hi && lo != f64::INFINITY && hi != f64::NEG_INFINITY
}

/// `a * b` for interval endpoints, where `0 * inf` is `0`.
#[inline]
fn mul_bound(a: f64, b: f64) -> f64 {
    if a == 0.0 || b == 0.0 {
        0.0
    } else {
        a * b
    }
}

/// A set of numbers in normal form.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct NumberSet {
    reals: Vec<Interval>,
    ints: Vec<Interval>,
}

impl NumberSet {
    /// The empty set.
    pub fn empty() -> Self {
        NumberSet::default()
    }

    /// `number`: every real, both infinities included.
    pub fn all() -> Self {
        NumberSet {
            reals: vec![Interval::new(f64::NEG_INFINITY, f64::INFINITY)],
            ints: Vec::new(),
        }
    }

    /// `int`: every integer.
    pub fn int() -> Self {
        NumberSet {
            reals: Vec::new(),
            ints: vec![Interval::new(f64::NEG_INFINITY, f64::INFINITY)],
        }
    }

    /// A single number.
    pub fn literal(value: f64) -> Self {
        if value.is_nan() {
            return NumberSet::empty();
        }
        let point = Interval::new(value, value);
        if is_integer(value) {
            NumberSet {
                reals: Vec::new(),
                ints: vec![point],
            }
        } else {
            NumberSet {
                reals: vec![point],
                ints: Vec::new(),
            }
        }
    }

    /// The closed real interval `min..max`; empty when `min > max`.
    pub fn interval(min: f64, max: f64) -> Self {
        if min.is_nan() || max.is_nan() || min > max {
            return NumberSet::empty();
        }
        Self::normalize(vec![Interval::new(min, max)], Vec::new())
    }

    /// Every integer in `min..max`.
    pub fn int_interval(min: f64, max: f64) -> Self {
        if min.is_nan() || max.is_nan() {
            return NumberSet::empty();
        }
        let (lo, hi) = (min.ceil(), max.floor());
        if !is_int_run(lo, hi) {
            return NumberSet::empty();
        }
        Self::normalize(Vec::new(), vec![Interval::new(lo, hi)])
    }

    pub fn is_empty(&self) -> bool {
        self.reals.is_empty() && self.ints.is_empty()
    }

    /// Real intervals of the normal form.
    pub fn reals(&self) -> &[Interval] {
        &self.reals
    }

    /// Integer runs of the normal form.
    pub fn ints(&self) -> &[Interval] {
        &self.ints
    }

    /// The single member of a one-element set.
    pub fn as_literal(&self) -> Option<f64> {
        match (self.reals.as_slice(), self.ints.as_slice()) {
            ([only], []) | ([], [only]) if only.is_point() => Some(only.min),
            _ => None,
        }
    }

    /// Whether `value` is a member.
    pub fn contains(&self, value: f64) -> bool {
        self.reals
            .iter()
            .any(|r| r.min <= value && value <= r.max)
            || (is_integer(value)
                && self.ints.iter().any(|r| r.min <= value && value <= r.max))
    }

    #[must_use]
    pub fn union(&self, other: &NumberSet) -> NumberSet {
        let reals = self.reals.iter().chain(&other.reals).copied().collect();
        let ints = self.ints.iter().chain(&other.ints).copied().collect();
        Self::normalize(reals, ints)
    }

    #[must_use]
    pub fn intersect(&self, other: &NumberSet) -> NumberSet {
        let mut reals = Vec::new();
        let mut ints = Vec::new();

        for a in &self.reals {
            for b in &other.reals {
                let (lo, hi) = (a.min.max(b.min), a.max.min(b.max));
                if lo <= hi {
                    reals.push(Interval::new(lo, hi));
                }
            }
        }
        for (real, run) in self
            .reals
            .iter()
            .flat_map(|r| other.ints.iter().map(move |i| (r, i)))
            .chain(
                other
                    .reals
                    .iter()
                    .flat_map(|r| self.ints.iter().map(move |i| (r, i))),
            )
        {
            let (lo, hi) = (run.min.max(real.min.ceil()), run.max.min(real.max.floor()));
            if is_int_run(lo, hi) {
                ints.push(Interval::new(lo, hi));
            }
        }
        for a in &self.ints {
            for b in &other.ints {
                let (lo, hi) = (a.min.max(b.min), a.max.min(b.max));
                if is_int_run(lo, hi) {
                    ints.push(Interval::new(lo, hi));
                }
            }
        }

        Self::normalize(reals, ints)
    }

    /// `{ -x | x in self }`
    #[must_use]
    pub fn neg(&self) -> NumberSet {
        let flip = |r: &Interval| Interval::new(-r.max, -r.min);
        Self::normalize(
            self.reals.iter().map(flip).collect(),
            self.ints.iter().map(flip).collect(),
        )
    }

    /// Interval sum. Exact for literals, an over-approximation otherwise.
    #[must_use]
    pub fn add(&self, other: &NumberSet) -> NumberSet {
        self.combine(other, |a, b| (a.min + b.min, a.max + b.max))
    }

    #[must_use]
    pub fn sub(&self, other: &NumberSet) -> NumberSet {
        self.combine(other, |a, b| (a.min - b.max, a.max - b.min))
    }

    #[must_use]
    pub fn mul(&self, other: &NumberSet) -> NumberSet {
        self.combine(other, |a, b| {
            let products = [
                mul_bound(a.min, b.min),
                mul_bound(a.min, b.max),
                mul_bound(a.max, b.min),
                mul_bound(a.max, b.max),
            ];
            let lo = products.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = products.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            (lo, hi)
        })
    }

    /// Pointwise minimum of one member from each set.
    #[must_use]
    pub fn pointwise_min(&self, other: &NumberSet) -> NumberSet {
        self.combine(other, |a, b| (a.min.min(b.min), a.max.min(b.max)))
    }

    /// Pointwise maximum of one member from each set.
    #[must_use]
    pub fn pointwise_max(&self, other: &NumberSet) -> NumberSet {
        self.combine(other, |a, b| (a.min.max(b.min), a.max.max(b.max)))
    }

    /// Apply an interval operation to every pair of pieces.
    ///
    /// Integer pieces combined with integer pieces stay integer runs; any
    /// real operand makes the result a real interval. `NaN` bounds (from
    /// `inf - inf`) widen to the corresponding infinity.
    fn combine(
        &self,
        other: &NumberSet,
        op: impl Fn(&Interval, &Interval) -> (f64, f64),
    ) -> NumberSet {
        let mut reals = Vec::new();
        let mut ints = Vec::new();

        for (a, a_int) in self.pieces() {
            for (b, b_int) in other.pieces() {
                let (lo, hi) = op(a, b);
                let lo = if lo.is_nan() { f64::NEG_INFINITY } else { lo };
                let hi = if hi.is_nan() { f64::INFINITY } else { hi };
                if a_int && b_int {
                    if is_int_run(lo, hi) {
                        ints.push(Interval::new(lo, hi));
                    }
                } else if lo <= hi {
                    reals.push(Interval::new(lo, hi));
                }
            }
        }

        Self::normalize(reals, ints)
    }

    fn pieces(&self) -> impl Iterator<Item = (&Interval, bool)> {
        self.reals
            .iter()
            .map(|r| (r, false))
            .chain(self.ints.iter().map(|r| (r, true)))
    }

    /// Bring arbitrary valid pieces into normal form.
    fn normalize(mut reals: Vec<Interval>, mut ints: Vec<Interval>) -> NumberSet {
        reals.retain(|r| {
            if r.is_point() && is_integer(r.min) {
                ints.push(*r);
                false
            } else {
                true
            }
        });

        reals.sort();
        let mut merged_reals: Vec<Interval> = Vec::with_capacity(reals.len());
        for r in reals {
            match merged_reals.last_mut() {
                Some(last) if r.min <= last.max => last.max = last.max.max(r.max),
                _ => merged_reals.push(r),
            }
        }

        let mut runs: Vec<Interval> = Vec::with_capacity(ints.len());
        for run in ints {
            let mut pieces = vec![run];
            for real in &merged_reals {
                pieces = pieces
                    .into_iter()
                    .flat_map(|piece| subtract_real(piece, real))
                    .collect();
            }
            runs.extend(pieces);
        }

        runs.sort();
        let mut merged_ints: Vec<Interval> = Vec::with_capacity(runs.len());
        for run in runs {
            match merged_ints.last_mut() {
                Some(last) if run.min <= last.max + 1.0 => last.max = last.max.max(run.max),
                _ => merged_ints.push(run),
            }
        }

        NumberSet {
            reals: merged_reals,
            ints: merged_ints,
        }
    }
}

/// Remove the integers of `real` from an integer run.
fn subtract_real(run: Interval, real: &Interval) -> impl Iterator<Item = Interval> {
    let (first, last) = (real.min.ceil(), real.max.floor());
    let (left, right) = if first <= last {
        (
            Interval::new(run.min, run.max.min(first - 1.0)),
            Interval::new(run.min.max(last + 1.0), run.max),
        )
    } else {
        // `real` covers no integer.
        (run, Interval::new(f64::INFINITY, f64::INFINITY))
    };
    [left, right]
        .into_iter()
        .filter(|piece| is_int_run(piece.min, piece.max))
}

fn fmt_bound(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x == f64::INFINITY {
        f.write_str("inf")
    } else if x == f64::NEG_INFINITY {
        f.write_str("-inf")
    } else {
        write!(f, "{x}")
    }
}

impl fmt::Display for NumberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pieces: Vec<(&Interval, bool)> = self.pieces().collect();
        pieces.sort_by(|a, b| a.0.cmp(b.0));

        if pieces.is_empty() {
            return f.write_str("never");
        }
        for (i, (piece, is_int)) in pieces.into_iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            let unbounded = piece.min == f64::NEG_INFINITY && piece.max == f64::INFINITY;
            match (is_int, unbounded) {
                (_, _) if piece.is_point() => fmt_bound(f, piece.min)?,
                (false, true) => f.write_str("number")?,
                (true, true) => f.write_str("int")?,
                (false, false) => {
                    fmt_bound(f, piece.min)?;
                    f.write_str("..")?;
                    fmt_bound(f, piece.max)?;
                }
                (true, false) => {
                    f.write_str("int(")?;
                    fmt_bound(f, piece.min)?;
                    f.write_str("..")?;
                    fmt_bound(f, piece.max)?;
                    f.write_str(")")?;
                }
            }
        }
        Ok(())
    }
}
