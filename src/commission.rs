use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    ClockTime, Count, Error, Indicator, Volume, error::checked_div, ordering::OrderingGuard,
    tick::impl_tick,
};

/// Input for [`CommissionInfo`]: cumulative order-book commission readings.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct CommissionTick {
    pub time: ClockTime,
    /// Cumulative sell-side committed volume.
    pub sell_volume: Volume,
    /// Cumulative number of sell orders.
    pub sell_count: Count,
    /// Cumulative buy-side committed volume.
    pub buy_volume: Volume,
    /// Cumulative number of buy orders.
    pub buy_count: Count,
}

impl_tick!(CommissionTick);

/// Selector for [`CommissionInfo::get`].
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum CommissionKey {
    /// Buy volume minus sell volume.
    Diff,
    /// Average volume per order on each side.
    Avg,
    /// Change of each side's volume since the previous reading.
    Current,
}

impl FromStr for CommissionKey {
    type Err = Error;

    /// Case-insensitive: `"diff"`, `"avg"` or `"current"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "diff" => Ok(Self::Diff),
            "avg" => Ok(Self::Avg),
            "current" => Ok(Self::Current),
            _ => Err(Error::InvalidKey(s.to_owned())),
        }
    }
}

/// One keyed reading of [`CommissionInfo`].
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
#[serde(tag = "key", rename_all = "snake_case")]
pub enum CommissionReading {
    Diff {
        time: ClockTime,
        diff: Volume,
    },
    Avg {
        time: ClockTime,
        sell: f64,
        buy: f64,
    },
    Current {
        time: ClockTime,
        sell: Volume,
        buy: Volume,
    },
}

/// [`CommissionInfo`] snapshot.
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
pub struct CommissionValue {
    /// Time of the last accepted tick.
    pub time: ClockTime,
    /// `buy_volume - sell_volume`.
    pub diff: Volume,
    /// `sell_volume / sell_count`.
    pub avg_sell: f64,
    /// `buy_volume / buy_count`.
    pub avg_buy: f64,
    /// Sell volume added since the previous reading.
    pub current_sell: Volume,
    /// Buy volume added since the previous reading.
    pub current_buy: Volume,
}

#[derive(Clone, Copy, Debug)]
struct Reading {
    time: ClockTime,
    diff: Volume,
    current_sell: Volume,
    current_buy: Volume,
    sell_volume: Volume,
    sell_count: Count,
    buy_volume: Volume,
    buy_count: Count,
}

impl Reading {
    #[allow(clippy::cast_precision_loss)]
    fn averages(&self) -> Result<(f64, f64), Error> {
        Ok((
            checked_div(
                self.sell_volume,
                self.sell_count as f64,
                "average sell commission",
            )?,
            checked_div(
                self.buy_volume,
                self.buy_count as f64,
                "average buy commission",
            )?,
        ))
    }
}

/// Order-book commission statistics from cumulative readings.
///
/// Every tick carries the session's cumulative committed volume and order
/// count per side. From the latest reading it derives the order imbalance
/// (`buy - sell` volume), the average volume per order on each side, and the
/// per-side volume added since the previous reading. The first reading's
/// increments are zero.
#[derive(Clone, Debug, Default)]
pub struct CommissionInfo {
    guard: OrderingGuard,
    latest: Option<Reading>,
}

impl CommissionInfo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads one keyed value, or `None` before the first accepted tick.
    ///
    /// # Errors
    ///
    /// [`Error::DivisionByZero`] for [`CommissionKey::Avg`] while either
    /// side's order count is zero.
    pub fn get(&self, key: CommissionKey) -> Result<Option<CommissionReading>, Error> {
        let Some(r) = self.latest else {
            return Ok(None);
        };
        let time = r.time;

        Ok(Some(match key {
            CommissionKey::Diff => CommissionReading::Diff { time, diff: r.diff },
            CommissionKey::Avg => {
                let (sell, buy) = r.averages()?;
                CommissionReading::Avg { time, sell, buy }
            }
            CommissionKey::Current => CommissionReading::Current {
                time,
                sell: r.current_sell,
                buy: r.current_buy,
            },
        }))
    }
}

impl Indicator for CommissionInfo {
    type Tick = CommissionTick;
    type Output = CommissionValue;

    fn update(&mut self, tick: &CommissionTick) -> Result<(), Error> {
        self.guard.check(tick.time)?;

        let (last_sell, last_buy) = self
            .latest
            .map_or((tick.sell_volume, tick.buy_volume), |r| {
                (r.sell_volume, r.buy_volume)
            });

        self.latest = Some(Reading {
            time: tick.time,
            diff: tick.buy_volume - tick.sell_volume,
            current_sell: tick.sell_volume - last_sell,
            current_buy: tick.buy_volume - last_buy,
            sell_volume: tick.sell_volume,
            sell_count: tick.sell_count,
            buy_volume: tick.buy_volume,
            buy_count: tick.buy_count,
        });

        self.guard.accept(tick.time);
        Ok(())
    }

    fn value(&self) -> Result<Option<CommissionValue>, Error> {
        let Some(r) = self.latest else {
            return Ok(None);
        };
        let (avg_sell, avg_buy) = r.averages()?;

        Ok(Some(CommissionValue {
            time: r.time,
            diff: r.diff,
            avg_sell,
            avg_buy,
            current_sell: r.current_sell,
            current_buy: r.current_buy,
        }))
    }
}

impl Display for CommissionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CommissionInfo")
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::t;

    fn tick(
        time: &str,
        sell_volume: f64,
        sell_count: u64,
        buy_volume: f64,
        buy_count: u64,
    ) -> CommissionTick {
        CommissionTick {
            time: t(time),
            sell_volume,
            sell_count,
            buy_volume,
            buy_count,
        }
    }

    fn info(ticks: &[CommissionTick]) -> CommissionInfo {
        let mut info = CommissionInfo::new();
        for tick in ticks {
            info.update(tick).unwrap();
        }
        info
    }

    #[test]
    fn none_before_first_tick() {
        let info = CommissionInfo::new();
        assert_eq!(info.value(), Ok(None));
        assert_eq!(info.get(CommissionKey::Diff), Ok(None));
    }

    #[test]
    fn diff_is_buy_minus_sell() {
        let info = info(&[tick("09000000", 300.0, 10, 450.0, 12)]);
        assert_eq!(
            info.get(CommissionKey::Diff),
            Ok(Some(CommissionReading::Diff {
                time: t("09000000"),
                diff: 150.0,
            }))
        );
    }

    #[test]
    fn avg_divides_by_counts() {
        let info = info(&[tick("09000000", 300.0, 10, 450.0, 15)]);
        assert_eq!(
            info.get(CommissionKey::Avg),
            Ok(Some(CommissionReading::Avg {
                time: t("09000000"),
                sell: 30.0,
                buy: 30.0,
            }))
        );
    }

    mod current {
        use super::*;

        #[test]
        fn zero_on_first_reading() {
            let info = info(&[tick("09000000", 300.0, 10, 450.0, 12)]);
            assert_eq!(
                info.get(CommissionKey::Current),
                Ok(Some(CommissionReading::Current {
                    time: t("09000000"),
                    sell: 0.0,
                    buy: 0.0,
                }))
            );
        }

        #[test]
        fn tick_over_tick_delta() {
            let info = info(&[
                tick("09000000", 300.0, 10, 450.0, 12),
                tick("09000100", 320.0, 11, 455.0, 13),
                tick("09000200", 350.0, 12, 455.0, 13),
            ]);
            let v = info.value().unwrap().unwrap();
            assert_eq!((v.current_sell, v.current_buy), (30.0, 0.0));
            assert_eq!(v.diff, 105.0);
        }
    }

    mod zero_count {
        use super::*;

        #[test]
        fn avg_and_value_fail() {
            let info = info(&[tick("09000000", 0.0, 0, 450.0, 12)]);
            assert_eq!(
                info.get(CommissionKey::Avg),
                Err(Error::DivisionByZero("average sell commission"))
            );
            assert_eq!(
                info.value(),
                Err(Error::DivisionByZero("average sell commission"))
            );
        }

        #[test]
        fn other_keys_still_read() {
            let info = info(&[tick("09000000", 10.0, 1, 0.0, 0)]);
            assert!(info.get(CommissionKey::Diff).unwrap().is_some());
            assert!(info.get(CommissionKey::Current).unwrap().is_some());
            assert_eq!(
                info.get(CommissionKey::Avg),
                Err(Error::DivisionByZero("average buy commission"))
            );
        }
    }

    #[test]
    fn out_of_order_keeps_previous_reading() {
        let mut info = info(&[tick("09000100", 300.0, 10, 450.0, 12)]);
        assert!(info.update(&tick("09000000", 1.0, 1, 1.0, 1)).is_err());
        info.update(&tick("09000200", 310.0, 11, 460.0, 13)).unwrap();
        let v = info.value().unwrap().unwrap();
        assert_eq!((v.current_sell, v.current_buy), (10.0, 10.0));
    }

    #[test]
    fn key_parsing() {
        assert_eq!("AVG".parse::<CommissionKey>(), Ok(CommissionKey::Avg));
        assert_eq!("current".parse::<CommissionKey>(), Ok(CommissionKey::Current));
        assert_eq!(
            "ratio".parse::<CommissionKey>(),
            Err(Error::InvalidKey("ratio".into()))
        );
    }
}
