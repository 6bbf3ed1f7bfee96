use thiserror::Error;

use crate::ClockTime;

/// Errors raised by the time codec and by indicator updates and reads.
///
/// Every error is scoped to the single call that produced it. A rejected
/// update leaves the indicator exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The tick is earlier than the last tick the indicator accepted.
    #[error("tick at {got} is earlier than last accepted tick at {last}")]
    OutOfOrder { last: ClockTime, got: ClockTime },

    /// Clock-time text (or a raw timestamp) outside the `HHMMSSss` scheme.
    #[error("invalid clock time {0:?}, expected up to 8 digits HHMMSSss")]
    InvalidFormat(String),

    /// Unrecognized snapshot selector.
    #[error("unknown snapshot key {0:?}")]
    InvalidKey(String),

    /// A read needed to divide by a quantity that is zero.
    #[error("division by zero computing {0}")]
    DivisionByZero(&'static str),
}

/// Divides, failing with [`Error::DivisionByZero`] on a zero denominator.
#[inline]
pub(crate) fn checked_div(
    numerator: f64,
    denominator: f64,
    what: &'static str,
) -> Result<f64, Error> {
    if denominator == 0.0 {
        Err(Error::DivisionByZero(what))
    } else {
        Ok(numerator / denominator)
    }
}
