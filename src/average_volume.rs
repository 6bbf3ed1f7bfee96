use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};

use crate::{
    ClockTime, Count, Error, Indicator, Volume, error::checked_div, ordering::OrderingGuard,
    tick::impl_tick,
};

/// Input for [`AverageVolume`].
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct AverageVolumeTick {
    pub time: ClockTime,
    pub volume: Volume,
    pub buy_count: Count,
    pub sell_count: Count,
}

impl_tick!(AverageVolumeTick);

/// [`AverageVolume`] snapshot.
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
pub struct AverageVolumeValue {
    /// Time of the last accepted tick.
    pub time: ClockTime,
    /// `volume / buy_count`.
    pub avg_buy: f64,
    /// `volume / sell_count`.
    pub avg_sell: f64,
}

/// Average volume per order on each side, from the latest tick alone.
///
/// Nothing accumulates across ticks: each update replaces the stored
/// reading. The division happens on read, so a tick with a zero count is
/// accepted and [`value`](AverageVolume::value) fails with
/// [`Error::DivisionByZero`] until a tick with non-zero counts arrives.
#[derive(Clone, Debug, Default)]
pub struct AverageVolume {
    guard: OrderingGuard,
    latest: Option<AverageVolumeTick>,
}

impl AverageVolume {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Indicator for AverageVolume {
    type Tick = AverageVolumeTick;
    type Output = AverageVolumeValue;

    fn update(&mut self, tick: &AverageVolumeTick) -> Result<(), Error> {
        self.guard.check(tick.time)?;

        self.latest = Some(*tick);

        self.guard.accept(tick.time);
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn value(&self) -> Result<Option<AverageVolumeValue>, Error> {
        let Some(tick) = self.latest else {
            return Ok(None);
        };

        Ok(Some(AverageVolumeValue {
            time: tick.time,
            avg_buy: checked_div(tick.volume, tick.buy_count as f64, "average buy volume")?,
            avg_sell: checked_div(tick.volume, tick.sell_count as f64, "average sell volume")?,
        }))
    }
}

impl Display for AverageVolume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AverageVolume")
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::test_util::t;

    fn tick(time: &str, volume: f64, buy_count: u64, sell_count: u64) -> AverageVolumeTick {
        AverageVolumeTick {
            time: t(time),
            volume,
            buy_count,
            sell_count,
        }
    }

    #[test]
    fn none_before_first_tick() {
        assert_eq!(AverageVolume::new().value(), Ok(None));
    }

    #[test]
    fn divides_by_each_side() {
        let mut av = AverageVolume::new();
        av.update(&tick("09000000", 100.0, 4, 5)).unwrap();
        let v = av.value().unwrap().unwrap();
        assert_eq!((v.avg_buy, v.avg_sell), (25.0, 20.0));
    }

    #[test]
    fn uses_latest_tick_only() {
        let mut av = AverageVolume::new();
        av.update(&tick("09000000", 100.0, 4, 5)).unwrap();
        av.update(&tick("09000100", 30.0, 3, 2)).unwrap();
        assert_eq!(
            av.value(),
            Ok(Some(AverageVolumeValue {
                time: t("09000100"),
                avg_buy: 10.0,
                avg_sell: 15.0,
            }))
        );
    }

    mod zero_count {
        use super::*;

        #[test]
        fn update_is_accepted_read_fails() {
            let mut av = AverageVolume::new();
            assert!(av.update(&tick("09000000", 100.0, 0, 5)).is_ok());
            assert_eq!(
                av.value(),
                Err(Error::DivisionByZero("average buy volume"))
            );
        }

        #[test]
        fn sell_side() {
            let mut av = AverageVolume::new();
            av.update(&tick("09000000", 100.0, 2, 0)).unwrap();
            assert_eq!(
                av.value(),
                Err(Error::DivisionByZero("average sell volume"))
            );
        }

        #[test]
        fn recovers_on_next_tick() {
            let mut av = AverageVolume::new();
            av.update(&tick("09000000", 100.0, 0, 0)).unwrap();
            av.update(&tick("09000100", 100.0, 2, 4)).unwrap();
            assert!(av.value().is_ok());
        }
    }

    #[test]
    fn out_of_order_keeps_latest() {
        let mut av = AverageVolume::new();
        av.update(&tick("09000100", 100.0, 4, 5)).unwrap();
        assert!(av.update(&tick("09000000", 1.0, 1, 1)).is_err());
        assert_eq!(av.value().unwrap().unwrap().avg_buy, 25.0);
    }
}
