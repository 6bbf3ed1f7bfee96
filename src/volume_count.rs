use std::{
    fmt::{Debug, Display},
    num::NonZero,
};

use serde::{Deserialize, Serialize};

use crate::{
    ClockTime, Error, Indicator, Volume,
    ordering::OrderingGuard,
    tick::impl_tick,
    window::{Boundary, TimeWindow},
};

/// Configuration for the [`VolumeCount`] indicator.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Deserialize)]
pub struct VolumeCountConfig {
    pub initial_time: ClockTime,
    pub period: NonZero<u32>,
}

impl VolumeCountConfig {
    #[must_use]
    pub fn new(initial_time: ClockTime, period: NonZero<u32>) -> Self {
        Self {
            initial_time,
            period,
        }
    }
}

/// Input for [`VolumeCount`].
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct VolumeCountTick {
    pub time: ClockTime,
    /// Cumulative traded volume for the session.
    pub volume: Volume,
}

impl_tick!(VolumeCountTick);

/// [`VolumeCount`] snapshot.
#[derive(PartialEq, Clone, Copy, Debug, Serialize)]
pub struct VolumeCountValue {
    /// Start of the current window.
    pub time: ClockTime,
    /// Volume traded in the current window so far.
    pub quantity: Volume,
}

/// Volume traded per time window, derived from a cumulative volume reading.
///
/// The window's quantity is the current cumulative reading minus the
/// reading at the tick that opened the window. A rollover tick re-anchors
/// the baseline to its own reading and resets the quantity to zero.
#[derive(Clone, Debug)]
pub struct VolumeCount {
    guard: OrderingGuard,
    window: TimeWindow,
    /// Cumulative volume at the tick that opened the current window.
    anchor: Option<Volume>,
    quantity: Volume,
}

impl VolumeCount {
    #[must_use]
    pub fn new(config: VolumeCountConfig) -> Self {
        Self {
            guard: OrderingGuard::starting_at(config.initial_time),
            window: TimeWindow::new(config.initial_time, config.period),
            anchor: None,
            quantity: 0.0,
        }
    }
}

impl Indicator for VolumeCount {
    type Tick = VolumeCountTick;
    type Output = VolumeCountValue;

    fn update(&mut self, tick: &VolumeCountTick) -> Result<(), Error> {
        self.guard.check(tick.time)?;

        let anchor = *self.anchor.get_or_insert(tick.volume);

        match self.window.advance(tick.time) {
            Boundary::Within => self.quantity = tick.volume - anchor,
            Boundary::Rollover => {
                self.anchor = Some(tick.volume);
                self.quantity = 0.0;
            }
        }

        self.guard.accept(tick.time);
        Ok(())
    }

    fn value(&self) -> Result<Option<VolumeCountValue>, Error> {
        Ok(self.anchor.map(|_| VolumeCountValue {
            time: self.window.start(),
            quantity: self.quantity,
        }))
    }
}

impl Display for VolumeCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VolumeCount({})", self.window.period())
    }
}
