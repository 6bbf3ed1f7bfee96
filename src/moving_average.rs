use std::{
    fmt::{Debug, Display},
    num::NonZero,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    ClockTime, Error, Indicator, Price, Volume,
    ordering::OrderingGuard,
    ring_buffer::RingBuffer,
    tick::impl_tick,
    window::{Boundary, TimeWindow},
};

/// Configuration for the [`MovingAverage`] indicator.
///
/// # Example
///
/// ```
/// use tick_ta::MovingAverageConfig;
/// use std::num::NonZero;
///
/// let config = MovingAverageConfig::builder()
///     .initial_time("08450000".parse().unwrap())
///     .period(NonZero::new(6000).unwrap())
///     .interval(NonZero::new(10).unwrap())
///     .build();
///
/// assert_eq!(config.interval(), 10);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Deserialize)]
pub struct MovingAverageConfig {
    initial_time: ClockTime,
    period: NonZero<u32>,
    interval: NonZero<usize>,
}

impl MovingAverageConfig {
    /// Returns a new builder.
    #[must_use]
    pub fn builder() -> MovingAverageConfigBuilder {
        MovingAverageConfigBuilder::new()
    }

    /// Start of the first window.
    #[inline]
    #[must_use]
    pub fn initial_time(&self) -> ClockTime {
        self.initial_time
    }

    /// Window length in hundredths of a second.
    #[inline]
    #[must_use]
    pub fn period(&self) -> u32 {
        self.period.get()
    }

    /// Number of windows averaged over.
    #[inline]
    #[must_use]
    pub fn interval(&self) -> usize {
        self.interval.get()
    }
}

impl Display for MovingAverageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MovingAverageConfig({}, {}, {})",
            self.initial_time, self.period, self.interval
        )
    }
}

/// Builder for [`MovingAverageConfig`].
///
/// All three fields must be set before calling
/// [`build`](MovingAverageConfigBuilder::build).
#[derive(Default)]
pub struct MovingAverageConfigBuilder {
    initial_time: Option<ClockTime>,
    period: Option<NonZero<u32>>,
    interval: Option<NonZero<usize>>,
}

impl MovingAverageConfigBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Sets the start of the first window.
    #[inline]
    #[must_use]
    pub fn initial_time(mut self, initial_time: ClockTime) -> Self {
        self.initial_time.replace(initial_time);
        self
    }

    /// Sets the window length in hundredths of a second.
    #[inline]
    #[must_use]
    pub fn period(mut self, period: NonZero<u32>) -> Self {
        self.period.replace(period);
        self
    }

    /// Sets the number of windows averaged over.
    #[inline]
    #[must_use]
    pub fn interval(mut self, interval: NonZero<usize>) -> Self {
        self.interval.replace(interval);
        self
    }

    /// Builds the config.
    ///
    /// # Panics
    ///
    /// Panics if any field is missing.
    #[inline]
    #[must_use]
    pub fn build(self) -> MovingAverageConfig {
        MovingAverageConfig {
            initial_time: self.initial_time.expect("initial_time is required"),
            period: self.period.expect("period is required"),
            interval: self.interval.expect("interval is required"),
        }
    }
}

/// Input for [`MovingAverage`].
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct MovingAverageTick {
    pub time: ClockTime,
    pub price: Price,
    /// Cumulative traded volume (or amount) for the session.
    pub volume: Volume,
}

impl_tick!(MovingAverageTick);

/// Selector for [`MovingAverage::get`].
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum MovingAverageKey {
    /// Mean of the per-window prices.
    Price,
    /// Mean of the per-window volume deltas.
    Volume,
}

impl FromStr for MovingAverageKey {
    type Err = Error;

    /// Case-insensitive: `"price"` or `"volume"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "price" => Ok(Self::Price),
            "volume" => Ok(Self::Volume),
            _ => Err(Error::InvalidKey(s.to_owned())),
        }
    }
}

/// [`MovingAverage`] snapshot.
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
pub struct MovingAverageValue {
    /// Time of the last accepted tick.
    pub time: ClockTime,
    /// Mean of the buffered per-window prices.
    pub price: Price,
    /// Mean of the buffered per-window volume deltas.
    pub volume: Volume,
}

impl MovingAverageValue {
    /// The `(time, mean)` pair for one key.
    #[must_use]
    pub fn get(&self, key: MovingAverageKey) -> (ClockTime, f64) {
        match key {
            MovingAverageKey::Price => (self.time, self.price),
            MovingAverageKey::Volume => (self.time, self.volume),
        }
    }
}

/// Moving average over the last `interval` time windows.
///
/// Each window contributes one slot to a fixed-capacity ring buffer: the
/// latest price seen in the window, and the volume traded in the window
/// (current cumulative volume minus the cumulative volume at the tick that
/// opened it). In-window ticks overwrite the newest slot; a rollover pushes
/// a new slot, evicting the oldest once `interval` windows are buffered.
///
/// The reported values are the arithmetic means of the buffered slots.
///
/// # Example
///
/// ```
/// use tick_ta::{MovingAverage, MovingAverageConfig, MovingAverageTick};
/// use std::num::NonZero;
///
/// let config = MovingAverageConfig::builder()
///     .initial_time("09000000".parse()?)
///     .period(NonZero::new(6000).unwrap())
///     .interval(NonZero::new(2).unwrap())
///     .build();
/// let mut ma = MovingAverage::new(config);
///
/// for (time, price) in [("09000000", 10.0), ("09010000", 20.0), ("09020000", 30.0)] {
///     ma.update(&MovingAverageTick { time: time.parse()?, price, volume: 0.0 })?;
/// }
///
/// // Only the last two windows are kept: (20 + 30) / 2
/// assert_eq!(ma.value()?.unwrap().price, 25.0);
/// # Ok::<(), tick_ta::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct MovingAverage {
    config: MovingAverageConfig,
    guard: OrderingGuard,
    window: TimeWindow,
    prices: RingBuffer,
    volumes: RingBuffer,
    /// Cumulative volume at the tick that opened the current window.
    anchor_volume: Volume,
}

impl MovingAverage {
    /// Creates a new moving average.
    #[must_use]
    pub fn new(config: MovingAverageConfig) -> Self {
        Self {
            config,
            guard: OrderingGuard::starting_at(config.initial_time),
            window: TimeWindow::new(config.initial_time, config.period),
            prices: RingBuffer::new(config.interval.get()),
            volumes: RingBuffer::new(config.interval.get()),
            anchor_volume: 0.0,
        }
    }

    /// Reads one mean.
    ///
    /// # Example
    ///
    /// ```
    /// # use tick_ta::{MovingAverage, MovingAverageConfig, MovingAverageTick};
    /// # use std::num::NonZero;
    /// # let config = MovingAverageConfig::builder()
    /// #     .initial_time("09000000".parse()?)
    /// #     .period(NonZero::new(6000).unwrap())
    /// #     .interval(NonZero::new(2).unwrap())
    /// #     .build();
    /// let mut ma = MovingAverage::new(config);
    /// ma.update(&MovingAverageTick { time: "09000000".parse()?, price: 10.0, volume: 0.0 })?;
    ///
    /// let (time, price) = ma.get("price".parse()?).unwrap();
    /// assert_eq!((time.to_string().as_str(), price), ("09000000", 10.0));
    /// # Ok::<(), tick_ta::Error>(())
    /// ```
    #[must_use]
    pub fn get(&self, key: MovingAverageKey) -> Option<(ClockTime, f64)> {
        self.current().map(|value| value.get(key))
    }

    fn current(&self) -> Option<MovingAverageValue> {
        let time = self.guard.last()?;

        Some(MovingAverageValue {
            time,
            price: self.prices.mean()?,
            volume: self.volumes.mean()?,
        })
    }
}

impl Indicator for MovingAverage {
    type Tick = MovingAverageTick;
    type Output = MovingAverageValue;

    fn update(&mut self, tick: &MovingAverageTick) -> Result<(), Error> {
        self.guard.check(tick.time)?;

        if self.prices.is_empty() {
            self.anchor_volume = tick.volume;
            self.prices.push(tick.price);
            self.volumes.push(0.0);
        }

        match self.window.advance(tick.time) {
            Boundary::Within => {
                self.prices.replace(tick.price);
                self.volumes.replace(tick.volume - self.anchor_volume);
            }
            Boundary::Rollover => {
                self.anchor_volume = tick.volume;
                self.prices.push(tick.price);
                self.volumes.push(0.0);
            }
        }

        self.guard.accept(tick.time);
        Ok(())
    }

    fn value(&self) -> Result<Option<MovingAverageValue>, Error> {
        Ok(self.current())
    }
}

impl Display for MovingAverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MA({}, {})", self.config.period, self.config.interval)
    }
}
