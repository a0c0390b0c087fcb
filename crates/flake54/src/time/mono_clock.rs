use core::time::Duration;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::{
    error::{Error, Result},
    time::{FLAKE_EPOCH, TimeSource},
};

/// A monotonic time source anchored to a wall-clock epoch.
///
/// The wall clock is read exactly once, at construction, to compute how far
/// the epoch lies in the past. From then on time is measured with [`Instant`],
/// so NTP steps or manual clock changes cannot move readings backwards.
///
/// Cloning is cheap and clones share the same anchor.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    start: Instant,
    epoch_offset: u64, // in milliseconds
}

impl MonotonicClock {
    /// Constructs a clock whose origin (t = 0) is [`FLAKE_EPOCH`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockBeforeEpoch`] if the system clock reads earlier
    /// than the epoch.
    pub fn new() -> Result<Self> {
        Self::with_epoch(FLAKE_EPOCH)
    }

    /// Constructs a clock using `epoch` (a [`Duration`] since 1970-01-01 UTC)
    /// as its origin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockBeforeEpoch`] if the system clock reads earlier
    /// than `epoch`.
    ///
    /// # Example
    ///
    /// ```
    /// use flake54::{MonotonicClock, TimeSource};
    /// use std::time::{Duration, SystemTime, UNIX_EPOCH};
    ///
    /// let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
    /// let clock = MonotonicClock::with_epoch(now).unwrap();
    ///
    /// std::thread::sleep(Duration::from_millis(5));
    /// assert!(clock.current_millis() >= 5);
    /// ```
    pub fn with_epoch(epoch: Duration) -> Result<Self> {
        let start = Instant::now();
        let system_now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| Error::ClockBeforeEpoch)?;
        let offset = system_now
            .checked_sub(epoch)
            .ok_or(Error::ClockBeforeEpoch)?
            .as_millis() as u64;

        Ok(Self {
            start,
            epoch_offset: offset,
        })
    }
}

impl TimeSource<u64> for MonotonicClock {
    /// Returns the number of milliseconds since the configured epoch, based on
    /// the elapsed monotonic time since construction.
    fn current_millis(&self) -> u64 {
        self.epoch_offset + self.start.elapsed().as_millis() as u64
    }
}
