#![allow(dead_code)]

use serde::{Deserialize, de::DeserializeOwned};
use tick_ta::{
    AverageVolumeTick, ClockTime, CommissionTick, DepthTick, Error, HighLowPriceTick, Indicator,
    InstitutionalTick, Level, MovingAverageTick, OhlcTick, SellBuyTick, SellBuyVolumeTick,
    VolumeCountTick,
};

/// One row of the recorded futures session.
#[derive(Debug, Clone, Deserialize)]
pub struct RefTick {
    pub time: ClockTime,
    pub price: f64,
    /// Cumulative session volume.
    pub volume: f64,
    /// Volume of this trade.
    pub trade_volume: f64,
    /// Cumulative number of buy trades.
    pub buy_count: u64,
    /// Cumulative number of sell trades.
    pub sell_count: u64,
    pub bid: f64,
    pub ask: f64,
    /// Cumulative committed sell volume in the book.
    pub sell_commission: f64,
    pub sell_orders: u64,
    /// Cumulative committed buy volume in the book.
    pub buy_commission: f64,
    pub buy_orders: u64,
}

impl RefTick {
    pub fn moving_average(&self) -> MovingAverageTick {
        MovingAverageTick {
            time: self.time,
            price: self.price,
            volume: self.volume,
        }
    }

    pub fn ohlc(&self) -> OhlcTick {
        OhlcTick {
            time: self.time,
            price: self.price,
        }
    }

    pub fn volume_count(&self) -> VolumeCountTick {
        VolumeCountTick {
            time: self.time,
            volume: self.volume,
        }
    }

    pub fn high_low(&self) -> HighLowPriceTick {
        HighLowPriceTick {
            time: self.time,
            price: self.price,
        }
    }

    pub fn sell_buy_volume(&self) -> SellBuyVolumeTick {
        SellBuyVolumeTick {
            time: self.time,
            price: self.price,
            volume: self.trade_volume,
        }
    }

    pub fn sell_buy(&self) -> SellBuyTick {
        SellBuyTick {
            time: self.time,
            price: self.price,
            ask: self.ask,
            bid: self.bid,
            volume: self.trade_volume,
        }
    }

    pub fn commission(&self) -> CommissionTick {
        CommissionTick {
            time: self.time,
            sell_volume: self.sell_commission,
            sell_count: self.sell_orders,
            buy_volume: self.buy_commission,
            buy_count: self.buy_orders,
        }
    }

    pub fn average_volume(&self) -> AverageVolumeTick {
        AverageVolumeTick {
            time: self.time,
            volume: self.trade_volume,
            buy_count: self.buy_count,
            sell_count: self.sell_count,
        }
    }

    pub fn institutional(&self) -> InstitutionalTick {
        InstitutionalTick {
            time: self.time,
            price: self.price,
            volume: self.trade_volume,
            sell_count: self.sell_count,
            buy_count: self.buy_count,
        }
    }

    /// Two-level book around the quotes: the trade volume at the best price
    /// and twice that one point further out. Each side then averages 2/3 of
    /// a point away from its best quote.
    pub fn depth(&self) -> DepthTick {
        let v = self.trade_volume;
        DepthTick {
            time: self.time,
            sells: vec![
                Level::from((self.ask, v)),
                Level::from((self.ask + 1.0, 2.0 * v)),
            ],
            buys: vec![
                Level::from((self.bid, v)),
                Level::from((self.bid - 1.0, 2.0 * v)),
            ],
        }
    }

    /// The same tick stamped one hundredth of a second earlier, if any.
    pub fn earlier(&self) -> Option<Self> {
        let time = ClockTime::from_hundredths(self.time.hundredths().checked_sub(1)?).ok()?;
        Some(Self {
            time,
            ..self.clone()
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RefMovingAverage {
    pub time: ClockTime,
    pub price: f64,
    pub volume: f64,
}

#[derive(Debug, Deserialize)]
pub struct RefOhlc {
    pub time: ClockTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Deserialize)]
pub struct RefVolumeCount {
    pub time: ClockTime,
    pub quantity: f64,
}

#[derive(Debug, Deserialize)]
pub struct RefHighLow {
    pub time: ClockTime,
    pub high: f64,
    pub low: f64,
}

#[derive(Debug, Deserialize)]
pub struct RefSellBuyVolume {
    pub time: ClockTime,
    pub last_price: f64,
    pub sell: f64,
    pub buy: f64,
}

#[derive(Debug, Deserialize)]
pub struct RefSellBuy {
    pub time: ClockTime,
    pub buy_volume: f64,
    pub sell_volume: f64,
    pub buy_count: u64,
    pub sell_count: u64,
    /// Empty while no volume has been classified.
    pub buy_ratio: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RefCommission {
    pub time: ClockTime,
    pub diff: f64,
    pub avg_sell: f64,
    pub avg_buy: f64,
    pub current_sell: f64,
    pub current_buy: f64,
}

#[derive(Debug, Deserialize)]
pub struct RefAverageVolume {
    pub time: ClockTime,
    pub avg_buy: f64,
    pub avg_sell: f64,
}

#[derive(Debug, Deserialize)]
pub struct RefInstitutional {
    pub time: ClockTime,
    pub last_price: f64,
    pub last_sell_count: u64,
    pub attributed_buy: f64,
    pub attributed_sell: f64,
}

const TICKS_PATH: &str = "tests/fixtures/data/ticks.csv";

/// Session start of the recorded ticks.
pub const SESSION_START: &str = "08450000";

/// Load the recorded futures session.
pub fn load_ticks() -> Vec<RefTick> {
    load_records(TICKS_PATH, "invalid tick record")
}

/// Load one reference output file, one row per recorded tick.
pub fn load_reference<D>(path: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let records: Vec<D> = load_records(path, "invalid reference record");
    assert_eq!(
        records.len(),
        load_ticks().len(),
        "{path} does not cover every tick"
    );
    records
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Feeds the recorded session into `indicator`, calling `check` with the
/// index of the last accepted tick after every update.
///
/// With `stale` set, every tick is followed by a copy stamped just before it,
/// which must be rejected as out of order and leave the reading unchanged.
pub fn replay<I, F, C>(indicator: &mut I, ticks: &[RefTick], stale: bool, tick_of: F, mut check: C)
where
    I: Indicator,
    F: Fn(&RefTick) -> I::Tick,
    C: FnMut(usize, &RefTick, &I),
{
    for (i, tick) in ticks.iter().enumerate() {
        indicator
            .update(&tick_of(tick))
            .unwrap_or_else(|e| panic!("tick {i} at {} rejected: {e}", tick.time));
        check(i, tick, indicator);

        if stale && let Some(earlier) = tick.earlier() {
            assert!(
                matches!(
                    indicator.update(&tick_of(&earlier)),
                    Err(Error::OutOfOrder { .. })
                ),
                "stale tick at {} accepted",
                earlier.time
            );
            check(i, tick, indicator);
        }
    }
}

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
