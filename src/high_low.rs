use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

use crate::{ClockTime, Error, Indicator, Price, ordering::OrderingGuard, tick::impl_tick};

/// Input for [`HighLowPrice`].
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct HighLowPriceTick {
    pub time: ClockTime,
    pub price: Price,
}

impl_tick!(HighLowPriceTick);

/// [`HighLowPrice`] snapshot.
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
pub struct HighLowPriceValue {
    /// Time of the last accepted tick.
    pub time: ClockTime,
    /// Highest price seen this session.
    pub high: Price,
    /// Lowest price seen this session.
    pub low: Price,
}

/// Session high and low: running extremes of every price seen.
#[derive(Clone, Debug, Default)]
pub struct HighLowPrice {
    guard: OrderingGuard,
    range: Option<(Price, Price)>,
}

impl HighLowPrice {
    #[must_use]
    pub fn new() -> Self {
        Self {
            guard: OrderingGuard::unseeded(),
            range: None,
        }
    }
}

impl Indicator for HighLowPrice {
    type Tick = HighLowPriceTick;
    type Output = HighLowPriceValue;

    fn update(&mut self, tick: &HighLowPriceTick) -> Result<(), Error> {
        self.guard.check(tick.time)?;

        let (high, low) = self.range.get_or_insert((tick.price, tick.price));
        *high = high.max(tick.price);
        *low = low.min(tick.price);

        self.guard.accept(tick.time);
        Ok(())
    }

    fn value(&self) -> Result<Option<HighLowPriceValue>, Error> {
        let (Some((high, low)), Some(time)) = (self.range, self.guard.last()) else {
            return Ok(None);
        };

        Ok(Some(HighLowPriceValue { time, high, low }))
    }
}

impl Display for HighLowPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HighLow")
    }
}
