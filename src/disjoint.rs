//! Finite unions of disjoint intervals, the abstract value domain.
//!
//! A [`DisjointIntervals`] is an ordered collection of intervals kept in
//! canonical form:
//!
//! - no member is empty;
//! - members are pairwise disjoint *and* non-adjacent (`[0, 2] U [3, 5]`
//!   must be stored as `[0, 5]`);
//! - members are stored in increasing order.
//!
//! The empty collection is ⊥ (unreachable); the single member `[-∞, +∞]` is
//! ⊤. Canonical form is restored after every mutation, so structural equality
//! coincides with semantic equality.
//!
//! # Join is a hull
//!
//! Joining two non-empty unions collapses to the single-interval hull of
//! their overall bounds rather than the exact set union. This is the
//! analyzer's implicit widening: merge points of the control flow can never
//! grow the representation, which keeps loop iteration convergent. Holes are
//! only ever introduced by `!=` filters.
//!
//! Comparisons between unions are likewise coarse: they compare the hulls'
//! bounds only (`a <= b` iff every value of `a` is at most every value of
//! `b`).

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use crate::ast::LogicOp;
use crate::interval::{Bound, Interval};

/// Canonical union of disjoint, non-adjacent intervals.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisjointIntervals {
    members: Vec<Interval>,
}

impl DisjointIntervals {
    /// The empty union, ⊥.
    pub fn empty() -> Self {
        Self { members: Vec::new() }
    }

    /// The unconstrained union, ⊤.
    pub fn top() -> Self {
        Self::from(Interval::TOP)
    }

    pub fn constant(value: i64) -> Self {
        Self::from(Interval::constant(value))
    }

    pub fn finite(low: i64, high: i64) -> Self {
        Self::from(Interval::finite(low, high))
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_top(&self) -> bool {
        self.members.len() == 1 && self.members[0].is_top()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.members.iter()
    }

    /// The single-interval hull spanning the overall bounds.
    pub fn hull(&self) -> Interval {
        match (self.members.first(), self.members.last()) {
            (Some(first), Some(last)) => Interval::new(first.low, last.high),
            _ => Interval::EMPTY,
        }
    }

    /// The constant `c` if the union is exactly `{c}`.
    pub fn single_constant(&self) -> Option<i64> {
        match self.members.as_slice() {
            [m] if m.low == m.high => m.low.as_finite(),
            _ => None,
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.members.iter().any(|m| m.contains(value))
    }

    pub fn contains_interval(&self, other: &Interval) -> bool {
        self.members.iter().any(|m| other.is_subset(m))
    }

    /// Inserts an interval, merging every member it overlaps or touches.
    pub fn add_interval(&mut self, interval: Interval) {
        if interval.is_empty() {
            return;
        }

        let one = Bound::Finite(1);
        let mut merged = interval;
        let mut result = Vec::with_capacity(self.members.len() + 1);
        let mut placed = false;

        for &member in &self.members {
            if member.high.add(&one) < merged.low {
                // Entirely before, with a gap.
                result.push(member);
            } else if merged.high.add(&one) < member.low {
                // Entirely after; the merged interval is complete.
                if !placed {
                    result.push(merged);
                    placed = true;
                }
                result.push(member);
            } else {
                // Overlapping or adjacent: absorb.
                merged = merged.join(&member);
            }
        }
        if !placed {
            result.push(merged);
        }

        self.members = result;
    }

    /// Removes the range covered by `interval`, splitting members that
    /// straddle its endpoints.
    pub fn remove_interval(&mut self, interval: Interval) {
        if interval.is_empty() {
            return;
        }

        let one = Bound::Finite(1);
        let mut result = Vec::with_capacity(self.members.len() + 1);

        for &member in &self.members {
            if member.meet(&interval).is_empty() {
                result.push(member);
                continue;
            }
            // Keep the fragments on either side of the hole, if any.
            if member.low < interval.low {
                result.push(Interval::new(member.low, interval.low.sub(&one)));
            }
            if member.high > interval.high {
                result.push(Interval::new(interval.high.add(&one), member.high));
            }
        }

        self.members = result;
    }

    /// Removes every member of `other`.
    pub fn remove(&mut self, other: &DisjointIntervals) {
        for &member in &other.members {
            self.remove_interval(member);
        }
    }

    /// Least upper bound. Collapses to the hull of the overall bounds; see
    /// the module docs. ⊥ is neutral.
    pub fn join(&self, other: &DisjointIntervals) -> DisjointIntervals {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        DisjointIntervals::from(self.hull().join(&other.hull()))
    }

    /// Greatest lower bound: pairwise meet of all member combinations.
    pub fn meet(&self, other: &DisjointIntervals) -> DisjointIntervals {
        let mut result = DisjointIntervals::empty();
        for &a in &self.members {
            for &b in &other.members {
                let met = a.meet(&b);
                if !met.is_empty() {
                    result.add_interval(met);
                }
            }
        }
        result
    }

    /// Every member shifted by the same amount.
    fn shift_by(&self, amount: Bound) -> DisjointIntervals {
        let mut result = DisjointIntervals::empty();
        for &member in &self.members {
            result.add_interval(Interval::new(member.low.add(&amount), member.high.add(&amount)));
        }
        result
    }

    /// Refines `self` to the values satisfying `self op other`, where
    /// `other` must be a single constant.
    ///
    /// An empty result marks the variable (and the branch it guards)
    /// unreachable.
    ///
    /// # Panics
    ///
    /// Panics if `other` is not a single-point union; comparisons against
    /// non-constant expressions are not supported by this analyzer.
    pub fn filter(&mut self, op: LogicOp, other: &DisjointIntervals) {
        if self.is_empty() {
            return;
        }
        let c = other
            .single_constant()
            .expect("comparison filter requires a constant right-hand side");
        match op {
            LogicOp::Lt => self.intersect(Interval::new(Bound::NegInf, Bound::Finite(c.saturating_sub(1)))),
            LogicOp::Le => self.intersect(Interval::new(Bound::NegInf, Bound::Finite(c))),
            LogicOp::Gt => self.intersect(Interval::new(Bound::Finite(c.saturating_add(1)), Bound::PosInf)),
            LogicOp::Ge => self.intersect(Interval::new(Bound::Finite(c), Bound::PosInf)),
            LogicOp::Eq => *self = self.meet(other),
            LogicOp::Ne => self.remove(other),
        }
    }

    fn intersect(&mut self, constraint: Interval) {
        *self = self.meet(&DisjointIntervals::from(constraint));
    }

    /// `self <= other` over the hulls.
    pub fn le(&self, other: &DisjointIntervals) -> bool {
        self.hull().le(&other.hull())
    }

    /// `self < other` over the hulls.
    pub fn lt(&self, other: &DisjointIntervals) -> bool {
        self.hull().lt(&other.hull())
    }

    /// `self >= other` over the hulls.
    pub fn ge(&self, other: &DisjointIntervals) -> bool {
        self.hull().ge(&other.hull())
    }

    /// `self > other` over the hulls.
    pub fn gt(&self, other: &DisjointIntervals) -> bool {
        self.hull().gt(&other.hull())
    }

    /// Pushes every finite bound outside `[low, high]` to the matching
    /// infinity. The solver applies this past its widening threshold to cut
    /// off unbounded ascending chains.
    pub fn widen_outside(&self, low: i64, high: i64) -> DisjointIntervals {
        let mut result = DisjointIntervals::empty();
        for &member in &self.members {
            let mut widened = member;
            if let Bound::Finite(v) = widened.low {
                if v < low {
                    widened.low = Bound::NegInf;
                }
            }
            if let Bound::Finite(v) = widened.high {
                if v > high {
                    widened.high = Bound::PosInf;
                }
            }
            result.add_interval(widened);
        }
        result
    }
}

impl From<Interval> for DisjointIntervals {
    fn from(interval: Interval) -> Self {
        let mut result = Self::empty();
        result.add_interval(interval);
        result
    }
}

impl<'a, 'b> Add<&'b DisjointIntervals> for &'a DisjointIntervals {
    type Output = DisjointIntervals;

    fn add(self, rhs: &'b DisjointIntervals) -> DisjointIntervals {
        if self.is_empty() || rhs.is_empty() {
            return DisjointIntervals::empty();
        }
        let hull = rhs.hull();
        self.shift_by(hull.high).join(&self.shift_by(hull.low))
    }
}

impl<'a, 'b> Sub<&'b DisjointIntervals> for &'a DisjointIntervals {
    type Output = DisjointIntervals;

    fn sub(self, rhs: &'b DisjointIntervals) -> DisjointIntervals {
        if self.is_empty() || rhs.is_empty() {
            return DisjointIntervals::empty();
        }
        let hull = rhs.hull();
        self.shift_by(hull.low.neg()).join(&self.shift_by(hull.high.neg()))
    }
}

impl<'a, 'b> Mul<&'b DisjointIntervals> for &'a DisjointIntervals {
    type Output = DisjointIntervals;

    fn mul(self, rhs: &'b DisjointIntervals) -> DisjointIntervals {
        let mut result = DisjointIntervals::empty();
        for &a in &self.members {
            for &b in &rhs.members {
                let product = a * b;
                if !product.is_empty() {
                    result.add_interval(product);
                }
            }
        }
        result
    }
}

impl<'a, 'b> Div<&'b DisjointIntervals> for &'a DisjointIntervals {
    type Output = DisjointIntervals;

    fn div(self, rhs: &'b DisjointIntervals) -> DisjointIntervals {
        let mut result = DisjointIntervals::empty();
        for &a in &self.members {
            for &b in &rhs.members {
                let quotient = a / b;
                if !quotient.is_empty() {
                    result.add_interval(quotient);
                }
            }
        }
        result
    }
}

impl fmt::Display for DisjointIntervals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "⊥*");
        }
        if self.is_top() {
            return write!(f, "⊤*");
        }
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                write!(f, " U ")?;
            }
            write!(f, "{}", member)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn di(ranges: &[(i64, i64)]) -> DisjointIntervals {
        let mut result = DisjointIntervals::empty();
        for &(lo, hi) in ranges {
            result.add_interval(Interval::finite(lo, hi));
        }
        result
    }

    fn assert_canonical(value: &DisjointIntervals) {
        let members: Vec<_> = value.iter().copied().collect();
        for m in &members {
            assert!(!m.is_empty(), "canonical union contains an empty member");
        }
        for pair in members.windows(2) {
            let gap_ok = pair[0].high.add(&Bound::Finite(1)) < pair[1].low;
            assert!(gap_ok, "members {} and {} overlap or touch", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_add_merges_overlaps() {
        let mut value = di(&[(0, 5), (10, 15)]);
        value.add_interval(Interval::finite(4, 11));
        assert_eq!(value, di(&[(0, 15)]));
        assert_canonical(&value);
    }

    #[test]
    fn test_add_coalesces_adjacency() {
        let mut value = di(&[(0, 2)]);
        value.add_interval(Interval::finite(3, 5));
        assert_eq!(value, di(&[(0, 5)]));

        // A gap of one keeps the members apart.
        let mut gapped = di(&[(0, 2)]);
        gapped.add_interval(Interval::finite(4, 5));
        assert_eq!(gapped.len(), 2);
        assert_canonical(&gapped);
    }

    #[test]
    fn test_add_keeps_order() {
        let mut value = DisjointIntervals::empty();
        value.add_interval(Interval::finite(10, 12));
        value.add_interval(Interval::finite(0, 2));
        value.add_interval(Interval::finite(5, 6));
        let lows: Vec<_> = value.iter().map(|m| m.low).collect();
        assert_eq!(
            lows,
            vec![Bound::Finite(0), Bound::Finite(5), Bound::Finite(10)]
        );
        assert_canonical(&value);
    }

    #[test]
    fn test_remove_splits_members() {
        let mut value = di(&[(0, 10)]);
        value.remove_interval(Interval::finite(4, 6));
        assert_eq!(value, di(&[(0, 3), (7, 10)]));
        assert_canonical(&value);
    }

    #[test]
    fn test_add_remove_roundtrip() {
        // Adding a detached interval and removing it restores the original.
        let original = di(&[(0, 5), (20, 25)]);
        let mut value = original.clone();
        value.add_interval(Interval::finite(10, 12));
        value.remove_interval(Interval::finite(10, 12));
        assert_eq!(value, original);
    }

    #[test]
    fn test_join_collapses_to_hull() {
        let a = di(&[(0, 2), (8, 10)]);
        let b = di(&[(20, 30)]);
        assert_eq!(a.join(&b), di(&[(0, 30)]));

        // Bottom is neutral.
        assert_eq!(a.join(&DisjointIntervals::empty()), a);
        assert_eq!(DisjointIntervals::empty().join(&b), b);
    }

    #[test]
    fn test_join_laws() {
        // Hull join agrees with the lattice laws on single-interval values;
        // on multi-member unions it deliberately loses the holes, so a ⊔ a
        // collapses to the hull (checked separately below).
        let samples = [
            DisjointIntervals::empty(),
            DisjointIntervals::top(),
            di(&[(0, 10)]),
            di(&[(-5, 5)]),
            di(&[(100, 100)]),
        ];
        for a in &samples {
            assert_eq!(a.join(a), *a, "join is idempotent");
            for b in &samples {
                assert_eq!(a.join(b), b.join(a), "join is commutative");
                for c in &samples {
                    assert_eq!(a.join(b).join(c), a.join(&b.join(c)), "join is associative");
                }
            }
        }
    }

    #[test]
    fn test_join_of_split_value_with_itself_is_its_hull() {
        let split = di(&[(-5, -1), (4, 8)]);
        assert_eq!(split.join(&split), di(&[(-5, 8)]));
    }

    #[test]
    fn test_meet_laws() {
        let samples = [
            DisjointIntervals::empty(),
            DisjointIntervals::top(),
            di(&[(0, 10)]),
            di(&[(-5, -1), (4, 8)]),
        ];
        for a in &samples {
            assert_eq!(a.meet(a), *a, "meet is idempotent");
            assert_eq!(a.meet(&DisjointIntervals::top()), *a, "top is neutral for meet");
            for b in &samples {
                assert_eq!(a.meet(b), b.meet(a), "meet is commutative");
            }
        }
    }

    #[test]
    fn test_meet_preserves_holes() {
        let a = di(&[(0, 4), (6, 10)]);
        let b = di(&[(2, 8)]);
        assert_eq!(a.meet(&b), di(&[(2, 4), (6, 8)]));
    }

    #[test]
    fn test_arithmetic_shifts() {
        let a = di(&[(0, 5)]);
        let b = di(&[(10, 20)]);
        assert_eq!(&a + &b, di(&[(10, 25)]));
        assert_eq!(&a - &b, di(&[(-20, -5)]));

        // Bottom propagates through all four operators.
        let bottom = DisjointIntervals::empty();
        assert!((&a + &bottom).is_empty());
        assert!((&bottom - &b).is_empty());
        assert!((&a * &bottom).is_empty());
        assert!((&bottom / &b).is_empty());
    }

    #[test]
    fn test_addition_with_unbounded_operand() {
        let a = di(&[(0, 5)]);
        let unbounded = DisjointIntervals::from(Interval::new(Bound::Finite(0), Bound::PosInf));
        assert_eq!(
            &a + &unbounded,
            DisjointIntervals::from(Interval::new(Bound::Finite(0), Bound::PosInf))
        );
    }

    #[test]
    fn test_multiplication_cartesian() {
        let a = di(&[(-2, -1), (1, 2)]);
        let b = di(&[(10, 10)]);
        assert_eq!(&a * &b, di(&[(-20, -10), (10, 20)]));
    }

    #[test]
    fn test_division() {
        let a = di(&[(10, 10)]);
        assert_eq!(&a / &di(&[(5, 5)]), di(&[(2, 2)]));
        assert!((&a / &di(&[(0, 0)])).is_empty());
        assert_eq!(&a / &di(&[(-5, 5)]), di(&[(-2, 2)]));
    }

    #[test]
    fn test_filters() {
        let ten = DisjointIntervals::constant(10);

        let mut v = di(&[(0, 20)]);
        v.filter(LogicOp::Lt, &ten);
        assert_eq!(v, di(&[(0, 9)]));

        let mut v = di(&[(0, 20)]);
        v.filter(LogicOp::Le, &ten);
        assert_eq!(v, di(&[(0, 10)]));

        let mut v = di(&[(0, 20)]);
        v.filter(LogicOp::Gt, &ten);
        assert_eq!(v, di(&[(11, 20)]));

        let mut v = di(&[(0, 20)]);
        v.filter(LogicOp::Ge, &ten);
        assert_eq!(v, di(&[(10, 20)]));

        let mut v = di(&[(0, 20)]);
        v.filter(LogicOp::Eq, &ten);
        assert_eq!(v, di(&[(10, 10)]));

        let mut v = di(&[(0, 20)]);
        v.filter(LogicOp::Ne, &ten);
        assert_eq!(v, di(&[(0, 9), (11, 20)]));
    }

    #[test]
    fn test_filter_to_unreachable() {
        let mut v = di(&[(0, 5)]);
        v.filter(LogicOp::Gt, &DisjointIntervals::constant(100));
        assert!(v.is_empty());
    }

    #[test]
    fn test_filter_skips_empty_lhs() {
        let mut v = DisjointIntervals::empty();
        v.filter(LogicOp::Lt, &DisjointIntervals::constant(3));
        assert!(v.is_empty());
    }

    #[test]
    fn test_containment() {
        let value = di(&[(0, 4), (8, 12)]);
        assert!(value.contains(3));
        assert!(!value.contains(6));
        assert!(value.contains_interval(&Interval::finite(9, 11)));
        // Straddling the hole is not containment.
        assert!(!value.contains_interval(&Interval::finite(3, 9)));
    }

    #[test]
    fn test_comparisons_use_hulls() {
        let a = di(&[(0, 5)]);
        let b = di(&[(5, 9)]);
        assert!(a.le(&b));
        assert!(!a.lt(&b));
        assert!(b.ge(&a));
        assert!(di(&[(6, 9)]).gt(&a));
    }

    #[test]
    fn test_display() {
        assert_eq!(DisjointIntervals::empty().to_string(), "⊥*");
        assert_eq!(DisjointIntervals::top().to_string(), "⊤*");
        assert_eq!(di(&[(0, 3), (7, 9)]).to_string(), "[0, 3] U [7, 9]");
    }

    #[test]
    fn test_widen_outside() {
        let v = di(&[(-50, -20), (0, 5), (8, 99)]);
        let widened = v.widen_outside(0, 10);
        let members: Vec<_> = widened.iter().copied().collect();
        assert_eq!(
            members,
            vec![
                Interval::new(Bound::NegInf, Bound::Finite(-20)),
                Interval::finite(0, 5),
                Interval::new(Bound::Finite(8), Bound::PosInf),
            ]
        );
    }
}
