use std::num::NonZero;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::ClockTime;

/// Outcome of feeding one tick into a window.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub(crate) enum Boundary {
    /// The tick belongs to the current window.
    Within,
    /// The tick closed the current window and opens the next one.
    Rollover,
}

/// Fixed-period window over decoded tick times.
///
/// A tick at or past `start + period` rolls the window over, advancing
/// `start` by exactly one period. After a gap longer than one period the
/// window lags behind the ticks and keeps rolling over on each tick until
/// it catches up; ticks are never grouped by wall-clock period index.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TimeWindow {
    start: ClockTime,
    period: u32,
}

impl TimeWindow {
    pub(crate) fn new(start: ClockTime, period: NonZero<u32>) -> Self {
        Self {
            start,
            period: period.get(),
        }
    }

    /// Start of the current window.
    #[inline]
    pub(crate) fn start(&self) -> ClockTime {
        self.start
    }

    #[inline]
    pub(crate) fn period(&self) -> u32 {
        self.period
    }

    /// Classifies a tick at `time`. Callers must have rejected ticks earlier
    /// than the window start.
    pub(crate) fn advance(&mut self, time: ClockTime) -> Boundary {
        let start = u64::from(self.start.hundredths());
        let end = start + u64::from(self.period);
        let now = u64::from(time.hundredths());

        if now < end {
            return Boundary::Within;
        }

        // end <= now < DAY, so the new start stays in range.
        #[allow(clippy::cast_possible_truncation)]
        let next = ClockTime::from_hundredths_unchecked(end as u32);
        let lag = (now - end) / u64::from(self.period);

        debug!(
            from = %self.start,
            to = %next,
            tick = %time,
            lag,
            "time window rolled over"
        );

        self.start = next;
        Boundary::Rollover
    }
}

/// Window holding a fixed number of ticks.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TickWindow {
    capacity: usize,
    count: usize,
}

impl TickWindow {
    pub(crate) fn new(capacity: NonZero<usize>) -> Self {
        Self {
            capacity: capacity.get(),
            count: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Counts one tick. The tick after a full window restarts the count at 1.
    pub(crate) fn advance(&mut self) -> Boundary {
        if self.count < self.capacity {
            self.count += 1;
            Boundary::Within
        } else {
            trace!(capacity = self.capacity, "tick window rolled over");
            self.count = 1;
            Boundary::Rollover
        }
    }
}

/// The three windowing disciplines an indicator may run under.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Window {
    /// Batched by elapsed time.
    Timed(TimeWindow),
    /// Batched by tick count.
    Ticks(TickWindow),
    /// Continuous: accumulates for the indicator's lifetime.
    Lifetime,
}

impl Window {
    #[inline]
    pub(crate) fn advance(&mut self, time: ClockTime) -> Boundary {
        match self {
            Self::Timed(window) => window.advance(time),
            Self::Ticks(window) => window.advance(),
            Self::Lifetime => Boundary::Within,
        }
    }
}

/// Windowing discipline as configured by a host.
///
/// Deserializes from an internally tagged map, e.g.
/// `{"mode": "by_time", "initial_time": "08450000", "period": 6000}`,
/// `{"mode": "by_ticks", "ticks": 200}` or `{"mode": "lifetime"}`.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WindowConfig {
    /// Roll over every `period` hundredths of a second from `initial_time`.
    ByTime {
        initial_time: ClockTime,
        period: NonZero<u32>,
    },
    /// Roll over every `ticks` ticks.
    ByTicks { ticks: NonZero<usize> },
    /// Never roll over.
    Lifetime,
}

impl WindowConfig {
    pub(crate) fn window(self) -> Window {
        match self {
            Self::ByTime {
                initial_time,
                period,
            } => Window::Timed(TimeWindow::new(initial_time, period)),
            Self::ByTicks { ticks } => Window::Ticks(TickWindow::new(ticks)),
            Self::Lifetime => Window::Lifetime,
        }
    }

    /// Initial time for time-batched windows.
    pub(crate) fn initial_time(self) -> Option<ClockTime> {
        match self {
            Self::ByTime { initial_time, .. } => Some(initial_time),
            Self::ByTicks { .. } | Self::Lifetime => None,
        }
    }
}
