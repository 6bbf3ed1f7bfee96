use crate::ClockTime;

/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// A traded volume or amount, either per trade or a cumulative reading.
pub type Volume = f64;

/// A number of orders on one side of the book.
pub type Count = u64;

/// A timestamped market event fed into an indicator.
///
/// Each indicator defines its own tick type carrying only the fields it
/// needs. Ticks must arrive in non-decreasing [`time`](Tick::time) order;
/// a tick earlier than the last accepted one is rejected with
/// [`Error::OutOfOrder`](crate::Error::OutOfOrder).
pub trait Tick {
    /// Clock time the event happened at.
    fn time(&self) -> ClockTime;
}

macro_rules! impl_tick {
    ($($type:ty),+ $(,)?) => {
        $(
            impl $crate::Tick for $type {
                #[inline]
                fn time(&self) -> $crate::ClockTime {
                    self.time
                }
            }
        )+
    };
}

pub(crate) use impl_tick;
