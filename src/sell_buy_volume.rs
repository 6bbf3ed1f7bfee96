use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

use crate::{
    ClockTime, Error, Indicator, Price, Volume, ordering::OrderingGuard, tick::impl_tick,
};

/// Input for [`SimpleSellBuyVolume`].
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct SellBuyVolumeTick {
    pub time: ClockTime,
    pub price: Price,
    /// Volume of this trade.
    pub volume: Volume,
}

impl_tick!(SellBuyVolumeTick);

/// [`SimpleSellBuyVolume`] snapshot.
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
pub struct SellBuyVolumeValue {
    /// Time of the last accepted tick.
    pub time: ClockTime,
    /// Price of the last accepted tick.
    pub last_price: Price,
    /// Volume traded below the previous price.
    pub sell: Volume,
    /// Volume traded above the previous price.
    pub buy: Volume,
}

/// Tick-rule volume classification.
///
/// A trade below the previous trade's price counts as sell volume, above it
/// as buy volume; an unchanged price counts as neither. The first tick only
/// seeds the previous price. Both totals accumulate for the whole session.
#[derive(Clone, Debug, Default)]
pub struct SimpleSellBuyVolume {
    guard: OrderingGuard,
    last_price: Option<Price>,
    sell: Volume,
    buy: Volume,
}

impl SimpleSellBuyVolume {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Indicator for SimpleSellBuyVolume {
    type Tick = SellBuyVolumeTick;
    type Output = SellBuyVolumeValue;

    fn update(&mut self, tick: &SellBuyVolumeTick) -> Result<(), Error> {
        self.guard.check(tick.time)?;

        if let Some(last) = self.last_price {
            if tick.price < last {
                self.sell += tick.volume;
            } else if tick.price > last {
                self.buy += tick.volume;
            }
        }
        self.last_price = Some(tick.price);

        self.guard.accept(tick.time);
        Ok(())
    }

    fn value(&self) -> Result<Option<SellBuyVolumeValue>, Error> {
        let (Some(last_price), Some(time)) = (self.last_price, self.guard.last()) else {
            return Ok(None);
        };

        Ok(Some(SellBuyVolumeValue {
            time,
            last_price,
            sell: self.sell,
            buy: self.buy,
        }))
    }
}

impl Display for SimpleSellBuyVolume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimpleSellBuyVolume")
    }
}
