use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

use crate::{
    ClockTime, Count, Error, Indicator, Price, Volume, ordering::OrderingGuard, tick::impl_tick,
};

/// Smallest trade volume considered for institutional attribution.
pub const DEFAULT_MIN_VOLUME: Volume = 10.0;

/// Configuration for the [`InstitutionalPosition`] indicator.
#[derive(PartialEq, Clone, Copy, Debug, Deserialize)]
pub struct InstitutionalPositionConfig {
    /// Trades below this volume are never attributed.
    #[serde(default = "default_min_volume")]
    pub min_volume: Volume,
}

fn default_min_volume() -> Volume {
    DEFAULT_MIN_VOLUME
}

impl Default for InstitutionalPositionConfig {
    fn default() -> Self {
        Self {
            min_volume: DEFAULT_MIN_VOLUME,
        }
    }
}

/// Input for [`InstitutionalPosition`].
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct InstitutionalTick {
    pub time: ClockTime,
    pub price: Price,
    /// Volume of this trade.
    pub volume: Volume,
    /// Cumulative number of sell orders.
    pub sell_count: Count,
    /// Cumulative number of buy orders.
    pub buy_count: Count,
}

impl_tick!(InstitutionalTick);

/// [`InstitutionalPosition`] snapshot.
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
pub struct InstitutionalValue {
    /// Time of the last accepted tick.
    pub time: ClockTime,
    /// Price of the last accepted tick.
    pub last_price: Price,
    /// Sell order count of the last accepted tick.
    pub last_sell_count: Count,
    /// Volume attributed to a single large buyer.
    pub attributed_buy: Volume,
    /// Volume attributed to a single large seller.
    pub attributed_sell: Volume,
}

#[derive(Clone, Copy, Debug)]
struct Last {
    price: Price,
    sell_count: Count,
    buy_count: Count,
}

/// Large-counterparty heuristic.
///
/// When a trade of at least `min_volume` moves one side's cumulative order
/// count by exactly one while the other side's count grows by more than one,
/// a single large order on the first side was matched against many small
/// ones. The whole trade volume is attributed to that side.
///
/// # Example
///
/// ```
/// use tick_ta::{InstitutionalPosition, InstitutionalTick};
///
/// let mut position = InstitutionalPosition::new(Default::default());
/// let tick = |time: &str, buy_count, sell_count| -> Result<InstitutionalTick, tick_ta::Error> {
///     Ok(InstitutionalTick { time: time.parse()?, price: 100.0, volume: 25.0, sell_count, buy_count })
/// };
///
/// position.update(&tick("09000000", 10, 10)?)?;
/// // one buy order against four sell orders
/// position.update(&tick("09000100", 11, 14)?)?;
///
/// assert_eq!(position.value()?.unwrap().attributed_buy, 25.0);
/// # Ok::<(), tick_ta::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct InstitutionalPosition {
    config: InstitutionalPositionConfig,
    guard: OrderingGuard,
    last: Option<Last>,
    attributed_buy: Volume,
    attributed_sell: Volume,
}

impl InstitutionalPosition {
    #[must_use]
    pub fn new(config: InstitutionalPositionConfig) -> Self {
        Self {
            config,
            guard: OrderingGuard::unseeded(),
            last: None,
            attributed_buy: 0.0,
            attributed_sell: 0.0,
        }
    }
}

impl Indicator for InstitutionalPosition {
    type Tick = InstitutionalTick;
    type Output = InstitutionalValue;

    fn update(&mut self, tick: &InstitutionalTick) -> Result<(), Error> {
        self.guard.check(tick.time)?;

        if let Some(last) = self.last
            && tick.volume >= self.config.min_volume
        {
            // A count that went backwards never attributes.
            let buy_delta = tick.buy_count.checked_sub(last.buy_count);
            let sell_delta = tick.sell_count.checked_sub(last.sell_count);

            match (buy_delta, sell_delta) {
                (Some(1), Some(sell)) if sell > 1 => self.attributed_buy += tick.volume,
                (Some(buy), Some(1)) if buy > 1 => self.attributed_sell += tick.volume,
                _ => {}
            }
        }

        self.last = Some(Last {
            price: tick.price,
            sell_count: tick.sell_count,
            buy_count: tick.buy_count,
        });

        self.guard.accept(tick.time);
        Ok(())
    }

    fn value(&self) -> Result<Option<InstitutionalValue>, Error> {
        let (Some(last), Some(time)) = (self.last, self.guard.last()) else {
            return Ok(None);
        };

        Ok(Some(InstitutionalValue {
            time,
            last_price: last.price,
            last_sell_count: last.sell_count,
            attributed_buy: self.attributed_buy,
            attributed_sell: self.attributed_sell,
        }))
    }
}

impl Display for InstitutionalPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InstitutionalPosition({})", self.config.min_volume)
    }
}
