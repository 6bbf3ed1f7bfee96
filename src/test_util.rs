// src/test_util.rs

use crate::ClockTime;
use std::num::NonZero;

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

/// Parses clock-time text, panicking on bad input.
pub fn t(text: &str) -> ClockTime {
    text.parse().expect("valid clock time")
}

pub fn nz(n: usize) -> NonZero<usize> {
    NonZero::new(n).expect("non zero value")
}

/// One minute, in hundredths of a second.
pub fn minute() -> NonZero<u32> {
    NonZero::new(crate::clock_time::MINUTE).expect("non zero period")
}
