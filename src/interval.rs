//! Single closed integer intervals, the base of the abstract value domain.
//!
//! An interval `[l, h]` abstracts the set of integers between its bounds.
//! Bounds extend the integers with `-∞` and `+∞`, so one lattice type covers
//! ⊥ (the empty interval), finite ranges, half-lines, and ⊤ = `[-∞, +∞]`.
//!
//! # Lattice Structure
//!
//! - **Join** (`⊔`): `[l₁, h₁] ⊔ [l₂, h₂] = [min(l₁, l₂), max(h₁, h₂)]` (hull)
//! - **Meet** (`⊓`): `[l₁, h₁] ⊓ [l₂, h₂] = [max(l₁, l₂), min(h₁, h₂)]`
//! - **Bottom** (`⊥`): empty interval, canonically `[+∞, -∞]`
//! - **Top** (`⊤`): `[-∞, +∞]`
//!
//! Arithmetic is corner-based: each operator evaluates the bound combinations
//! and keeps the extremes. Division excludes zero from the divisor by clamping
//! a zero endpoint inward, so `[1, 10] / [0, 2]` divides by `[1, 2]`.

use std::cmp::{max, min};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// Bound of an interval: `-∞`, finite value, or `+∞`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bound {
    NegInf,
    Finite(i64),
    PosInf,
}

impl Bound {
    pub fn as_finite(&self) -> Option<i64> {
        match self {
            Bound::Finite(n) => Some(*n),
            _ => None,
        }
    }

    pub fn add(&self, other: &Bound) -> Bound {
        match (self, other) {
            (Bound::Finite(a), Bound::Finite(b)) => Bound::Finite(a.saturating_add(*b)),
            (Bound::NegInf, Bound::PosInf) | (Bound::PosInf, Bound::NegInf) => {
                // Undefined; only reachable through degenerate shifts, where
                // the caller joins with the opposite extreme anyway.
                Bound::PosInf
            }
            (Bound::NegInf, _) | (_, Bound::NegInf) => Bound::NegInf,
            (Bound::PosInf, _) | (_, Bound::PosInf) => Bound::PosInf,
        }
    }

    pub fn sub(&self, other: &Bound) -> Bound {
        match (self, other) {
            (Bound::Finite(a), Bound::Finite(b)) => Bound::Finite(a.saturating_sub(*b)),
            (Bound::PosInf, Bound::NegInf) => Bound::PosInf,
            (Bound::NegInf, Bound::PosInf) => Bound::NegInf,
            (Bound::PosInf, _) => Bound::PosInf,
            (Bound::NegInf, _) => Bound::NegInf,
            (_, Bound::PosInf) => Bound::NegInf,
            (_, Bound::NegInf) => Bound::PosInf,
        }
    }

    pub fn mul(&self, other: &Bound) -> Bound {
        match (self, other) {
            (Bound::Finite(a), Bound::Finite(b)) => Bound::Finite(a.saturating_mul(*b)),
            (Bound::Finite(0), _) | (_, Bound::Finite(0)) => Bound::Finite(0),
            (Bound::NegInf, Bound::NegInf) | (Bound::PosInf, Bound::PosInf) => Bound::PosInf,
            (Bound::NegInf, Bound::PosInf) | (Bound::PosInf, Bound::NegInf) => Bound::NegInf,
            (Bound::NegInf, Bound::Finite(n)) | (Bound::Finite(n), Bound::NegInf) => {
                if *n > 0 {
                    Bound::NegInf
                } else {
                    Bound::PosInf
                }
            }
            (Bound::PosInf, Bound::Finite(n)) | (Bound::Finite(n), Bound::PosInf) => {
                if *n > 0 {
                    Bound::PosInf
                } else {
                    Bound::NegInf
                }
            }
        }
    }

    /// Bound division. The divisor must not be zero; callers exclude it from
    /// the divisor interval before taking corners.
    pub fn div(&self, other: &Bound) -> Bound {
        match (self, other) {
            (Bound::Finite(a), Bound::Finite(b)) => {
                debug_assert_ne!(*b, 0, "zero must be excluded from the divisor");
                // i64::MIN / -1 is the single overflowing case; saturate.
                Bound::Finite(a.checked_div(*b).unwrap_or(i64::MAX))
            }
            (Bound::Finite(_), Bound::NegInf) | (Bound::Finite(_), Bound::PosInf) => Bound::Finite(0),
            (Bound::NegInf, Bound::Finite(n)) => {
                if *n > 0 {
                    Bound::NegInf
                } else {
                    Bound::PosInf
                }
            }
            (Bound::PosInf, Bound::Finite(n)) => {
                if *n > 0 {
                    Bound::PosInf
                } else {
                    Bound::NegInf
                }
            }
            (Bound::NegInf, Bound::NegInf) | (Bound::PosInf, Bound::PosInf) => Bound::PosInf,
            (Bound::NegInf, Bound::PosInf) | (Bound::PosInf, Bound::NegInf) => Bound::NegInf,
        }
    }

    pub fn neg(&self) -> Bound {
        match self {
            Bound::NegInf => Bound::PosInf,
            Bound::Finite(n) => Bound::Finite(n.saturating_neg()),
            Bound::PosInf => Bound::NegInf,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::NegInf => write!(f, "-∞"),
            Bound::Finite(n) => write!(f, "{}", n),
            Bound::PosInf => write!(f, "+∞"),
        }
    }
}

/// Interval: `[low, high]`, or the empty interval when `low > high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub low: Bound,
    pub high: Bound,
}

impl Interval {
    pub const EMPTY: Self = Self {
        low: Bound::PosInf,
        high: Bound::NegInf,
    };

    pub const TOP: Self = Self {
        low: Bound::NegInf,
        high: Bound::PosInf,
    };

    /// Builds `[low, high]`, collapsing to the canonical empty interval when
    /// the bounds cross.
    pub fn new(low: Bound, high: Bound) -> Self {
        if low > high {
            Self::EMPTY
        } else {
            Self { low, high }
        }
    }

    pub fn finite(low: i64, high: i64) -> Self {
        Self::new(Bound::Finite(low), Bound::Finite(high))
    }

    pub fn constant(value: i64) -> Self {
        Self {
            low: Bound::Finite(value),
            high: Bound::Finite(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.low > self.high
    }

    pub fn is_top(&self) -> bool {
        *self == Self::TOP
    }

    pub fn contains(&self, value: i64) -> bool {
        !self.is_empty() && self.low <= Bound::Finite(value) && Bound::Finite(value) <= self.high
    }

    /// `self ⊆ other`.
    pub fn is_subset(&self, other: &Interval) -> bool {
        if self.is_empty() {
            return true;
        }
        if other.is_empty() {
            return false;
        }
        self.low >= other.low && self.high <= other.high
    }

    pub fn join(&self, other: &Interval) -> Interval {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Interval {
            low: min(self.low, other.low),
            high: max(self.high, other.high),
        }
    }

    pub fn meet(&self, other: &Interval) -> Interval {
        if self.is_empty() || other.is_empty() {
            return Self::EMPTY;
        }
        Interval::new(max(self.low, other.low), min(self.high, other.high))
    }

    /// `self ≤ other`: every value of `self` is at most every value of
    /// `other`. Coarse on purpose; see the module docs of [`crate::disjoint`].
    pub fn le(&self, other: &Interval) -> bool {
        if self.is_empty() {
            return true;
        }
        if other.is_empty() {
            return false;
        }
        self.high <= other.low
    }

    pub fn lt(&self, other: &Interval) -> bool {
        if self.is_empty() {
            return true;
        }
        if other.is_empty() {
            return false;
        }
        self.high < other.low
    }

    pub fn ge(&self, other: &Interval) -> bool {
        if self.is_empty() {
            return false;
        }
        if other.is_empty() {
            return true;
        }
        self.low >= other.high
    }

    pub fn gt(&self, other: &Interval) -> bool {
        if self.is_empty() {
            return false;
        }
        if other.is_empty() {
            return true;
        }
        self.low > other.high
    }
}

impl Add for Interval {
    type Output = Interval;

    fn add(self, rhs: Interval) -> Interval {
        if self.is_empty() || rhs.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(self.low.add(&rhs.low), self.high.add(&rhs.high))
    }
}

impl Sub for Interval {
    type Output = Interval;

    fn sub(self, rhs: Interval) -> Interval {
        if self.is_empty() || rhs.is_empty() {
            return Interval::EMPTY;
        }
        Interval::new(self.low.sub(&rhs.high), self.high.sub(&rhs.low))
    }
}

impl Mul for Interval {
    type Output = Interval;

    fn mul(self, rhs: Interval) -> Interval {
        if self.is_empty() || rhs.is_empty() {
            return Interval::EMPTY;
        }
        let corners = [
            self.low.mul(&rhs.low),
            self.low.mul(&rhs.high),
            self.high.mul(&rhs.low),
            self.high.mul(&rhs.high),
        ];
        let low = corners.iter().min().copied().unwrap_or(Bound::NegInf);
        let high = corners.iter().max().copied().unwrap_or(Bound::PosInf);
        Interval::new(low, high)
    }
}

impl Div for Interval {
    type Output = Interval;

    fn div(self, rhs: Interval) -> Interval {
        if self.is_empty() || rhs.is_empty() {
            return Interval::EMPTY;
        }

        // Dividing by exactly zero yields no result at all.
        if rhs == Interval::constant(0) {
            return Interval::EMPTY;
        }

        // Exclude zero from the divisor by clamping a zero endpoint inward;
        // the remaining values are all valid divisors.
        let mut divisor = rhs;
        if divisor.high == Bound::Finite(0) {
            divisor.high = Bound::Finite(-1);
        }
        if divisor.low == Bound::Finite(0) {
            divisor.low = Bound::Finite(1);
        }

        let corners = [
            self.low.div(&divisor.low),
            self.low.div(&divisor.high),
            self.high.div(&divisor.low),
            self.high.div(&divisor.high),
        ];
        let low = corners.iter().min().copied().unwrap_or(Bound::NegInf);
        let high = corners.iter().max().copied().unwrap_or(Bound::PosInf);
        Interval::new(low, high)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "⊥")
        } else if self.is_top() {
            write!(f, "⊤")
        } else {
            write!(f, "[{}, {}]", self.low, self.high)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_meet() {
        let a = Interval::finite(0, 10);
        let b = Interval::finite(5, 15);

        assert_eq!(a.join(&b), Interval::finite(0, 15));
        assert_eq!(a.meet(&b), Interval::finite(5, 10));

        // Disjoint meet is empty.
        let c = Interval::finite(20, 30);
        assert!(a.meet(&c).is_empty());

        // Empty is neutral for join, absorbing for meet.
        assert_eq!(a.join(&Interval::EMPTY), a);
        assert!(a.meet(&Interval::EMPTY).is_empty());
    }

    #[test]
    fn test_crossed_bounds_collapse() {
        let e = Interval::finite(3, 1);
        assert!(e.is_empty());
        assert_eq!(e, Interval::EMPTY);
    }

    #[test]
    fn test_arithmetic() {
        let a = Interval::finite(1, 2);
        let b = Interval::finite(10, 20);

        assert_eq!(a + b, Interval::finite(11, 22));
        assert_eq!(b - a, Interval::finite(8, 19));
        assert_eq!(a * b, Interval::finite(10, 40));

        // Signs flip under multiplication.
        let neg = Interval::finite(-3, 2);
        assert_eq!(neg * b, Interval::finite(-60, 40));

        // Empty propagates.
        assert!((a + Interval::EMPTY).is_empty());
        assert!((Interval::EMPTY * b).is_empty());
    }

    #[test]
    fn test_division_excludes_zero() {
        let ten = Interval::constant(10);

        // Divisor exactly zero: no result.
        assert!((ten / Interval::constant(0)).is_empty());

        // Zero endpoint clamped inward: [0, 2] becomes [1, 2].
        assert_eq!(ten / Interval::finite(0, 2), Interval::finite(5, 10));
        assert_eq!(ten / Interval::finite(-2, 0), Interval::finite(-10, -5));

        // Zero-crossing divisor keeps only the corner quotients.
        assert_eq!(ten / Interval::finite(-5, 5), Interval::finite(-2, 2));
    }

    #[test]
    fn test_division_infinite_divisor() {
        let ten = Interval::constant(10);
        let positive = Interval::new(Bound::Finite(1), Bound::PosInf);
        assert_eq!(ten / positive, Interval::finite(0, 10));
    }

    #[test]
    fn test_infinite_bounds_stay_infinite() {
        let half = Interval::new(Bound::NegInf, Bound::Finite(5));
        let one = Interval::constant(1);
        assert_eq!(half + one, Interval::new(Bound::NegInf, Bound::Finite(6)));
        assert_eq!(half - one, Interval::new(Bound::NegInf, Bound::Finite(4)));
    }

    #[test]
    fn test_subset() {
        let outer = Interval::finite(0, 10);
        assert!(Interval::finite(2, 8).is_subset(&outer));
        assert!(outer.is_subset(&outer));
        assert!(!Interval::finite(-1, 5).is_subset(&outer));
        assert!(Interval::EMPTY.is_subset(&outer));
        assert!(!outer.is_subset(&Interval::EMPTY));
    }

    #[test]
    fn test_comparisons() {
        let a = Interval::finite(0, 5);
        let b = Interval::finite(5, 10);
        let c = Interval::finite(6, 10);

        assert!(a.le(&b));
        assert!(!a.lt(&b));
        assert!(a.lt(&c));
        assert!(b.ge(&a));
        assert!(c.gt(&a));

        // Empty rules match the operator semantics.
        assert!(Interval::EMPTY.le(&a));
        assert!(!a.le(&Interval::EMPTY));
        assert!(!Interval::EMPTY.ge(&a));
        assert!(a.ge(&Interval::EMPTY));
    }

    #[test]
    fn test_display() {
        assert_eq!(Interval::finite(1, 3).to_string(), "[1, 3]");
        assert_eq!(Interval::TOP.to_string(), "⊤");
        assert_eq!(Interval::EMPTY.to_string(), "⊥");
        assert_eq!(
            Interval::new(Bound::Finite(0), Bound::PosInf).to_string(),
            "[0, +∞]"
        );
    }
}
