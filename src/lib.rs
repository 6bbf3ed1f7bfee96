//! Streaming tick-level market indicators for Rust.
//!
//! Each indicator is a small stateful reducer: feed it one tick at a time
//! with `update`, read its current snapshot with `value` whenever you like.
//! Ticks are stamped with a same-day [`ClockTime`] decoded from `HHMMSSss`
//! text and must arrive in non-decreasing time order; a tick earlier than
//! the last accepted one fails with [`Error::OutOfOrder`] and changes
//! nothing.
//!
//! Indicators run under one of two windowing disciplines:
//!
//! - **batched**: state resets every fixed period of time or every fixed
//!   number of ticks ([`MovingAverage`], [`VolumeCount`], and
//!   [`OpenHighLowClose`] by time or by ticks);
//! - **continuous**: state initializes on the first tick and accumulates for
//!   the indicator's lifetime (everything else, and [`OpenHighLowClose`]
//!   with [`OhlcConfig::lifetime`]).
//!
//! Every indicator type exposes [`update`](HighLowPrice::update) and
//! [`value`](HighLowPrice::value) as inherent methods, no trait import
//! needed. Import [`Indicator`] only for generic code.
//!
//! Snapshots that divide by an input (average volumes, the buy ratio,
//! weighted prices) do so on read and fail with [`Error::DivisionByZero`]
//! rather than produce an infinite or NaN value.

pub mod clock_time;

mod average_volume;
mod commission;
mod error;
mod high_low;
mod indicator;
mod institutional;
mod moving_average;
mod ohlc;
mod ordering;
mod ring_buffer;
mod sell_buy;
mod sell_buy_volume;
mod tick;
mod volume_count;
mod weighted_price;
mod window;

pub use crate::clock_time::ClockTime;
pub use crate::error::Error;
pub use crate::indicator::Indicator;
pub use crate::tick::{Count, Price, Tick, Volume};
pub use crate::window::WindowConfig;

pub use crate::average_volume::{AverageVolume, AverageVolumeTick, AverageVolumeValue};
pub use crate::commission::{
    CommissionInfo, CommissionKey, CommissionReading, CommissionTick, CommissionValue,
};
pub use crate::high_low::{HighLowPrice, HighLowPriceTick, HighLowPriceValue};
pub use crate::institutional::{
    DEFAULT_MIN_VOLUME, InstitutionalPosition, InstitutionalPositionConfig, InstitutionalTick,
    InstitutionalValue,
};
pub use crate::moving_average::{
    MovingAverage, MovingAverageConfig, MovingAverageConfigBuilder, MovingAverageKey,
    MovingAverageTick, MovingAverageValue,
};
pub use crate::ohlc::{OhlcConfig, OhlcTick, OhlcValue, OpenHighLowClose};
pub use crate::sell_buy::{SellBuy, SellBuyKey, SellBuyReading, SellBuyTick, SellBuyValue};
pub use crate::sell_buy_volume::{SellBuyVolumeTick, SellBuyVolumeValue, SimpleSellBuyVolume};
pub use crate::volume_count::{VolumeCount, VolumeCountConfig, VolumeCountTick, VolumeCountValue};
pub use crate::weighted_price::{DepthTick, Level, WeightedAveragePrice, WeightedPriceValue};

macro_rules! impl_indicator_methods {
    ($($type:ty),+ $(,)?) => {
        $(
            impl $type {
                /// See [`Indicator::update`].
                ///
                /// # Errors
                ///
                /// [`Error::OutOfOrder`] if the tick is earlier than the last
                /// accepted one.
                #[inline]
                pub fn update(&mut self, tick: &<Self as Indicator>::Tick) -> Result<(), Error> {
                    <Self as Indicator>::update(self, tick)
                }

                /// See [`Indicator::value`].
                ///
                /// # Errors
                ///
                /// See [`Indicator::value`].
                #[inline]
                pub fn value(&self) -> Result<Option<<Self as Indicator>::Output>, Error> {
                    <Self as Indicator>::value(self)
                }
            }
        )+
    };
}

impl_indicator_methods!(
    MovingAverage,
    OpenHighLowClose,
    VolumeCount,
    HighLowPrice,
    AverageVolume,
    SimpleSellBuyVolume,
    SellBuy,
    CommissionInfo,
    WeightedAveragePrice,
    InstitutionalPosition,
);

#[cfg(test)]
mod test_util;

#[cfg(test)]
mod generic_use {
    use super::*;
    use crate::test_util::t;

    fn feed<I: Indicator>(indicator: &mut I, ticks: &[I::Tick]) -> Result<(), Error> {
        ticks.iter().try_for_each(|tick| indicator.update(tick))
    }

    #[test]
    fn drives_any_indicator() {
        let mut high_low = HighLowPrice::new();
        let ticks = [
            HighLowPriceTick {
                time: t("09000000"),
                price: 10.0,
            },
            HighLowPriceTick {
                time: t("09000100"),
                price: 12.0,
            },
        ];
        feed(&mut high_low, &ticks).unwrap();
        assert_eq!(high_low.value().unwrap().unwrap().time, ticks[1].time());
    }

    #[test]
    fn stops_at_first_out_of_order_tick() {
        let mut ohlc = OpenHighLowClose::new(OhlcConfig::lifetime());
        let ticks = [
            OhlcTick {
                time: t("09000100"),
                price: 10.0,
            },
            OhlcTick {
                time: t("09000000"),
                price: 1.0,
            },
            OhlcTick {
                time: t("09000200"),
                price: 20.0,
            },
        ];
        assert!(matches!(
            feed(&mut ohlc, &ticks),
            Err(Error::OutOfOrder { .. })
        ));
        let bar = ohlc.value().unwrap().unwrap();
        assert_eq!((bar.low, bar.high), (10.0, 10.0));
    }

    #[test]
    fn instances_are_independent() {
        let mut a = SellBuy::new();
        let b = SellBuy::new();
        a.update(&SellBuyTick {
            time: t("09000000"),
            price: 101.0,
            ask: 100.5,
            bid: 100.0,
            volume: 1.0,
        })
        .unwrap();
        assert!(a.value().unwrap().is_some());
        assert_eq!(b.value(), Ok(None));
    }
}
