use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

use crate::{
    ClockTime, Error, Indicator, Price, Volume, error::checked_div, ordering::OrderingGuard,
    tick::impl_tick,
};

/// One price level of a book side.
#[derive(PartialEq, Clone, Copy, Debug, Deserialize, Serialize)]
pub struct Level {
    pub price: Price,
    pub volume: Volume,
}

impl From<(Price, Volume)> for Level {
    fn from((price, volume): (Price, Volume)) -> Self {
        Self { price, volume }
    }
}

/// Input for [`WeightedAveragePrice`]: the book levels on each side.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DepthTick {
    pub time: ClockTime,
    pub sells: Vec<Level>,
    pub buys: Vec<Level>,
}

impl_tick!(DepthTick);

/// [`WeightedAveragePrice`] snapshot.
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
pub struct WeightedPriceValue {
    /// Time of the last accepted tick.
    pub time: ClockTime,
    /// Volume-weighted price of the sell levels.
    pub avg_sell_price: Price,
    /// Volume-weighted price of the buy levels.
    pub avg_buy_price: Price,
}

/// `sum(price * volume)` and `sum(volume)` of one side.
#[derive(Clone, Copy, Debug, Default)]
struct Side {
    notional: f64,
    volume: Volume,
}

impl Side {
    fn of(levels: &[Level]) -> Self {
        levels.iter().fold(Self::default(), |acc, level| Self {
            notional: acc.notional + level.price * level.volume,
            volume: acc.volume + level.volume,
        })
    }

    fn average(self, what: &'static str) -> Result<Price, Error> {
        checked_div(self.notional, self.volume, what)
    }
}

/// Volume-weighted average price of each book side.
///
/// Recomputed from the latest tick's levels alone. A side with no levels or
/// zero total volume makes [`value`](WeightedAveragePrice::value) fail with
/// [`Error::DivisionByZero`].
#[derive(Clone, Debug, Default)]
pub struct WeightedAveragePrice {
    guard: OrderingGuard,
    sides: Option<(Side, Side)>,
}

impl WeightedAveragePrice {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Indicator for WeightedAveragePrice {
    type Tick = DepthTick;
    type Output = WeightedPriceValue;

    fn update(&mut self, tick: &DepthTick) -> Result<(), Error> {
        self.guard.check(tick.time)?;

        self.sides = Some((Side::of(&tick.sells), Side::of(&tick.buys)));

        self.guard.accept(tick.time);
        Ok(())
    }

    fn value(&self) -> Result<Option<WeightedPriceValue>, Error> {
        let (Some((sells, buys)), Some(time)) = (self.sides, self.guard.last()) else {
            return Ok(None);
        };

        Ok(Some(WeightedPriceValue {
            time,
            avg_sell_price: sells.average("weighted sell price")?,
            avg_buy_price: buys.average("weighted buy price")?,
        }))
    }
}

impl Display for WeightedAveragePrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WeightedAveragePrice")
    }
}
