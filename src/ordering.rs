use tracing::debug;

use crate::{ClockTime, Error};

/// Rejects ticks earlier than the last accepted one.
///
/// Indicators call [`check`](Self::check) before touching any other state
/// and [`accept`](Self::accept) once the update has been applied, so a
/// rejected tick never leaves a partial update behind. The comparison is
/// against the previous tick, not the window boundary.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct OrderingGuard {
    last: Option<ClockTime>,
}

impl OrderingGuard {
    /// Guard for a batched indicator: ticks before `initial_time` are rejected.
    pub(crate) fn starting_at(initial_time: ClockTime) -> Self {
        Self {
            last: Some(initial_time),
        }
    }

    /// Guard for a continuous indicator: the first tick always passes.
    pub(crate) fn unseeded() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn check(&self, time: ClockTime) -> Result<(), Error> {
        match self.last {
            Some(last) if time < last => {
                debug!(%last, got = %time, "rejected out-of-order tick");
                Err(Error::OutOfOrder { last, got: time })
            }
            _ => Ok(()),
        }
    }

    #[inline]
    pub(crate) fn accept(&mut self, time: ClockTime) {
        self.last = Some(time);
    }

    /// Time of the last accepted tick, or the initial time if none yet.
    #[inline]
    pub(crate) fn last(&self) -> Option<ClockTime> {
        self.last
    }
}
