use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    ClockTime, Count, Error, Indicator, Price, Volume, error::checked_div,
    ordering::OrderingGuard, tick::impl_tick,
};

/// Input for [`SellBuy`].
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct SellBuyTick {
    pub time: ClockTime,
    /// Trade price.
    pub price: Price,
    /// Best ask at the time of the trade. Trades below it count as sells.
    pub ask: Price,
    /// Best bid at the time of the trade. Trades above it count as buys.
    pub bid: Price,
    /// Trade volume (or value).
    pub volume: Volume,
}

impl_tick!(SellBuyTick);

/// Selector for [`SellBuy::get`].
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum SellBuyKey {
    Volume,
    Count,
    Ratio,
}

impl FromStr for SellBuyKey {
    type Err = Error;

    /// Case-insensitive: `"volume"`, `"count"` or `"ratio"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "volume" => Ok(Self::Volume),
            "count" => Ok(Self::Count),
            "ratio" => Ok(Self::Ratio),
            _ => Err(Error::InvalidKey(s.to_owned())),
        }
    }
}

/// One keyed reading of [`SellBuy`].
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
#[serde(tag = "key", rename_all = "snake_case")]
pub enum SellBuyReading {
    /// Accumulated buy and sell volume.
    Volume {
        time: ClockTime,
        buy: Volume,
        sell: Volume,
    },
    /// Number of buy and sell trades.
    Count {
        time: ClockTime,
        buy: Count,
        sell: Count,
    },
    /// Share of buy volume: `buy / (buy + sell)`.
    Ratio { time: ClockTime, buy_ratio: f64 },
}

/// [`SellBuy`] snapshot.
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
pub struct SellBuyValue {
    /// Time of the last accepted tick.
    pub time: ClockTime,
    /// Volume of trades above the best bid.
    pub buy_volume: Volume,
    /// Volume of trades below the best ask.
    pub sell_volume: Volume,
    /// Number of trades above the best bid.
    pub buy_count: Count,
    /// Number of trades below the best ask.
    pub sell_count: Count,
}

impl SellBuyValue {
    /// Share of buy volume in the classified total.
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] while no volume has been classified.
    pub fn buy_ratio(&self) -> Result<f64, Error> {
        checked_div(
            self.buy_volume,
            self.buy_volume + self.sell_volume,
            "buy ratio",
        )
    }

    /// Reading for one key.
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] for [`SellBuyKey::Ratio`] while no volume
    /// has been classified.
    pub fn get(&self, key: SellBuyKey) -> Result<SellBuyReading, Error> {
        let time = self.time;

        Ok(match key {
            SellBuyKey::Volume => SellBuyReading::Volume {
                time,
                buy: self.buy_volume,
                sell: self.sell_volume,
            },
            SellBuyKey::Count => SellBuyReading::Count {
                time,
                buy: self.buy_count,
                sell: self.sell_count,
            },
            SellBuyKey::Ratio => SellBuyReading::Ratio {
                time,
                buy_ratio: self.buy_ratio()?,
            },
        })
    }
}

/// Quote-rule trade classification.
///
/// Each trade is compared with the best quotes supplied alongside it: a
/// price below the best ask counts toward sell volume and sell count, a
/// price above the best bid toward buy volume and buy count. A trade at the
/// bid is a sell and a trade at the ask is a buy. A trade strictly inside
/// the spread satisfies both tests and counts on both sides. Totals
/// accumulate for the session.
///
/// # Example
///
/// ```
/// use tick_ta::{SellBuy, SellBuyKey, SellBuyReading, SellBuyTick};
///
/// let mut sell_buy = SellBuy::new();
/// sell_buy.update(&SellBuyTick {
///     time: "09000000".parse()?,
///     price: 101.0,
///     ask: 100.5,
///     bid: 100.0,
///     volume: 3.0,
/// })?;
///
/// assert!(matches!(
///     sell_buy.get(SellBuyKey::Ratio)?,
///     Some(SellBuyReading::Ratio { buy_ratio, .. }) if buy_ratio == 1.0
/// ));
/// # Ok::<(), tick_ta::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct SellBuy {
    guard: OrderingGuard,
    buy_volume: Volume,
    sell_volume: Volume,
    buy_count: Count,
    sell_count: Count,
}

impl SellBuy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads one keyed value, or `None` before the first accepted tick.
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] for [`SellBuyKey::Ratio`] while buy and
    /// sell volume are both zero.
    pub fn get(&self, key: SellBuyKey) -> Result<Option<SellBuyReading>, Error> {
        self.current().map(|value| value.get(key)).transpose()
    }

    fn current(&self) -> Option<SellBuyValue> {
        Some(SellBuyValue {
            time: self.guard.last()?,
            buy_volume: self.buy_volume,
            sell_volume: self.sell_volume,
            buy_count: self.buy_count,
            sell_count: self.sell_count,
        })
    }
}

impl Indicator for SellBuy {
    type Tick = SellBuyTick;
    type Output = SellBuyValue;

    fn update(&mut self, tick: &SellBuyTick) -> Result<(), Error> {
        self.guard.check(tick.time)?;

        if tick.price < tick.ask {
            self.sell_volume += tick.volume;
            self.sell_count += 1;
        }

        if tick.price > tick.bid {
            self.buy_volume += tick.volume;
            self.buy_count += 1;
        }

        self.guard.accept(tick.time);
        Ok(())
    }

    fn value(&self) -> Result<Option<SellBuyValue>, Error> {
        Ok(self.current())
    }
}

impl Display for SellBuy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SellBuy")
    }
}
