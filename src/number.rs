//! Bounded integer with saturating arithmetic, per the TIS-100 [-999, 999] range.

use std::fmt;
use std::ops::{Add, Neg, Sub};

pub const MIN: i32 = -999;
pub const MAX: i32 = 999;

/// A signed integer saturated to `[-999, 999]`. All arithmetic that produces
/// a `Number` caps its result into range; construction from an out-of-range
/// literal is rejected by the parser rather than silently clamped (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Number(i32);

impl Number {
    pub const ZERO: Number = Number(0);

    /// Builds a `Number`, saturating `value` into range.
    pub fn new(value: i32) -> Number {
        Number(cap(value))
    }

    /// Builds a `Number` from an already-validated in-range value, without
    /// the clamp branch. Used by call sites (e.g. the parser) that have
    /// already range-checked the literal and want a strict constructor.
    pub fn try_new(value: i32) -> Option<Number> {
        in_range(value).then_some(Number(value))
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

/// Saturates `value` into `[-999, 999]`.
pub fn cap(value: i32) -> i32 {
    value.clamp(MIN, MAX)
}

/// Whether `value` already lies in `[-999, 999]` without needing a clamp.
pub fn in_range(value: i32) -> bool {
    (MIN..=MAX).contains(&value)
}

impl Add for Number {
    type Output = Number;
    fn add(self, rhs: Number) -> Number {
        Number::new(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Number {
    type Output = Number;
    fn sub(self, rhs: Number) -> Number {
        Number::new(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Number {
    type Output = Number;
    fn neg(self) -> Number {
        Number::new(-self.0)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Number {
        Number::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn cap_clamps_to_range() {
        assert_eq!(cap(5000), MAX);
        assert_eq!(cap(-5000), MIN);
        assert_eq!(cap(0), 0);
        assert_eq!(cap(MAX), MAX);
        assert_eq!(cap(MIN), MIN);
    }

    #[test]
    fn neg_is_involution_at_bounds() {
        assert_eq!(-(-Number::new(MAX)), Number::new(MAX));
        assert_eq!(-(-Number::new(MIN)), Number::new(MIN));
    }

    #[test]
    fn display_matches_inner_value() {
        assert_eq!(Number::new(-42).to_string(), "-42");
    }

    proptest! {
        #[test]
        fn cap_is_always_in_range(n in any::<i32>()) {
            prop_assert!(in_range(cap(n)));
        }

        #[test]
        fn cap_is_idempotent(n in any::<i32>()) {
            prop_assert_eq!(cap(cap(n)), cap(n));
        }

        #[test]
        fn add_matches_capped_sum(a in MIN..=MAX, b in MIN..=MAX) {
            prop_assert_eq!((Number::new(a) + Number::new(b)).value(), cap(a + b));
        }

        #[test]
        fn sub_matches_capped_difference(a in MIN..=MAX, b in MIN..=MAX) {
            prop_assert_eq!((Number::new(a) - Number::new(b)).value(), cap(a - b));
        }

        #[test]
        fn neg_is_involution(n in MIN..=MAX) {
            prop_assert_eq!(-(-Number::new(n)), Number::new(n));
        }
    }
}
