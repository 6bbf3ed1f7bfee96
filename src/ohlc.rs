use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use serde::{Deserialize, Serialize};

use crate::{
    ClockTime, Error, Indicator, Price, WindowConfig,
    ordering::OrderingGuard,
    tick::impl_tick,
    window::{Boundary, Window},
};

/// Configuration for the [`OpenHighLowClose`] indicator.
///
/// Wraps the windowing discipline: by elapsed time, by tick count, or over
/// the indicator's whole lifetime.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Deserialize)]
#[serde(transparent)]
pub struct OhlcConfig {
    window: WindowConfig,
}

impl OhlcConfig {
    /// Bars of `period` hundredths of a second starting at `initial_time`.
    #[must_use]
    pub fn by_time(initial_time: ClockTime, period: NonZero<u32>) -> Self {
        Self {
            window: WindowConfig::ByTime {
                initial_time,
                period,
            },
        }
    }

    /// Bars of `ticks` ticks each.
    #[must_use]
    pub fn by_ticks(ticks: NonZero<usize>) -> Self {
        Self {
            window: WindowConfig::ByTicks { ticks },
        }
    }

    /// A single bar spanning every tick ever fed.
    #[must_use]
    pub fn lifetime() -> Self {
        Self {
            window: WindowConfig::Lifetime,
        }
    }

    /// Windowing discipline.
    #[inline]
    #[must_use]
    pub fn window(&self) -> WindowConfig {
        self.window
    }
}

impl From<WindowConfig> for OhlcConfig {
    fn from(window: WindowConfig) -> Self {
        Self { window }
    }
}

/// Input for [`OpenHighLowClose`].
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct OhlcTick {
    pub time: ClockTime,
    pub price: Price,
}

impl_tick!(OhlcTick);

/// [`OpenHighLowClose`] snapshot.
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
pub struct OhlcValue {
    /// Window start for time bars, last accepted tick time otherwise.
    pub time: ClockTime,
    /// First price of the bar.
    pub open: Price,
    /// Highest price of the bar.
    pub high: Price,
    /// Lowest price of the bar.
    pub low: Price,
    /// Latest price of the bar.
    pub close: Price,
}

#[derive(Clone, Copy, Debug)]
struct Bar {
    open: Price,
    high: Price,
    low: Price,
    close: Price,
}

impl Bar {
    fn new(price: Price) -> Self {
        Self {
            open: price,
            high: price,
            low: price,
            close: price,
        }
    }

    fn merge(&mut self, price: Price) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
    }
}

/// Open, high, low and close of the current bar.
///
/// Within a bar the high and low track the running extremes and the close
/// follows the latest price. A rollover tick opens a new bar with all four
/// values set to its price.
///
/// # Example
///
/// ```
/// use tick_ta::{OhlcConfig, OhlcTick, OpenHighLowClose};
/// use std::num::NonZero;
///
/// let mut ohlc = OpenHighLowClose::new(OhlcConfig::by_ticks(NonZero::new(4).unwrap()));
///
/// for (time, price) in [("09000000", 5.0), ("09000100", 8.0), ("09000200", 3.0), ("09000300", 6.0)] {
///     ohlc.update(&OhlcTick { time: time.parse()?, price })?;
/// }
///
/// let bar = ohlc.value()?.unwrap();
/// assert_eq!((bar.open, bar.high, bar.low, bar.close), (5.0, 8.0, 3.0, 6.0));
/// # Ok::<(), tick_ta::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct OpenHighLowClose {
    guard: OrderingGuard,
    window: Window,
    bar: Option<Bar>,
}

impl OpenHighLowClose {
    /// Creates a new OHLC bar tracker.
    #[must_use]
    pub fn new(config: OhlcConfig) -> Self {
        let guard = config
            .window
            .initial_time()
            .map_or_else(OrderingGuard::unseeded, OrderingGuard::starting_at);

        Self {
            guard,
            window: config.window.window(),
            bar: None,
        }
    }

    fn label(&self) -> Option<ClockTime> {
        match &self.window {
            Window::Timed(window) => Some(window.start()),
            Window::Ticks(_) | Window::Lifetime => self.guard.last(),
        }
    }
}

impl Indicator for OpenHighLowClose {
    type Tick = OhlcTick;
    type Output = OhlcValue;

    fn update(&mut self, tick: &OhlcTick) -> Result<(), Error> {
        self.guard.check(tick.time)?;

        let boundary = self.window.advance(tick.time);

        match (&mut self.bar, boundary) {
            (Some(bar), Boundary::Within) => bar.merge(tick.price),
            (bar, _) => *bar = Some(Bar::new(tick.price)),
        }

        self.guard.accept(tick.time);
        Ok(())
    }

    fn value(&self) -> Result<Option<OhlcValue>, Error> {
        let (Some(bar), Some(time)) = (self.bar, self.label()) else {
            return Ok(None);
        };

        Ok(Some(OhlcValue {
            time,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
        }))
    }
}

impl Display for OpenHighLowClose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.window {
            Window::Timed(window) => write!(f, "OHLC(period={})", window.period()),
            Window::Ticks(window) => write!(f, "OHLC(ticks={})", window.capacity()),
            Window::Lifetime => write!(f, "OHLC(lifetime)"),
        }
    }
}
