use crate::{Error, Tick};

use std::fmt::{Debug, Display};

/// A streaming tick indicator.
///
/// Indicators maintain internal state and update incrementally on each call
/// to [`update`](Indicator::update). Reads never mutate state and may happen
/// at any cadence.
///
/// # Example
///
/// ```
/// use tick_ta::{HighLowPrice, HighLowPriceTick, Indicator};
///
/// let mut high_low = HighLowPrice::new();
///
/// for (time, price) in [("09000000", 10.0), ("09000100", 12.0), ("09000200", 9.0)] {
///     let tick = HighLowPriceTick { time: time.parse()?, price };
///     Indicator::update(&mut high_low, &tick)?;
/// }
///
/// let value = Indicator::value(&high_low)?.unwrap();
/// assert_eq!((value.high, value.low), (12.0, 9.0));
/// # Ok::<(), tick_ta::Error>(())
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Input event for this indicator.
    type Tick: Tick;

    /// Snapshot type returned by [`value`](Indicator::value).
    type Output: Copy + PartialEq + Debug;

    /// Feeds a tick.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfOrder`] if the tick is earlier than the last accepted
    /// one. The indicator is left unchanged.
    fn update(&mut self, tick: &Self::Tick) -> Result<(), Error>;

    /// Returns the current snapshot without advancing state, or `None` before
    /// the first accepted tick.
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] for indicators whose snapshot divides by an
    /// input that is currently zero.
    fn value(&self) -> Result<Option<Self::Output>, Error>;
}
