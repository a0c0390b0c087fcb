use core::{cmp::Ordering, time::Duration};
use std::{sync::Arc, time::Instant};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Result},
    generator::{Mutex, MutexGuard, Poll},
    id::{FlakeId, MachineId},
    time::TimeSource,
};

/// Default upper bound on how long [`LockFlakeGenerator::try_next_id`] spins
/// waiting for the clock to leave an exhausted millisecond.
pub const DEFAULT_SPIN_LIMIT: Duration = Duration::from_secs(1);

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The last issued [`FlakeId`] doubles as the generator state: its timestamp
/// is the previous tick and its sequence the counter within that tick. It sits
/// behind an [`Arc<Mutex<_>>`], and the whole read-clock / compare / bump
/// sequence runs with the lock held, so clones of a generator can be handed
/// to any number of threads.
///
/// IDs from one generator are strictly increasing. At most 4096 IDs are
/// issued per millisecond; beyond that callers wait for the next tick.
pub struct LockFlakeGenerator<T>
where
    T: TimeSource<u64>,
{
    #[cfg(feature = "cache-padded")]
    pub(crate) state: Arc<crossbeam_utils::CachePadded<Mutex<FlakeId>>>,
    #[cfg(not(feature = "cache-padded"))]
    pub(crate) state: Arc<Mutex<FlakeId>>,
    pub(crate) time: T,
    spin_limit: Duration,
}

impl<T> Clone for LockFlakeGenerator<T>
where
    T: TimeSource<u64> + Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            time: self.time.clone(),
            spin_limit: self.spin_limit,
        }
    }
}

impl<T> LockFlakeGenerator<T>
where
    T: TimeSource<u64>,
{
    /// Creates a new generator for `machine_id` reading time from `time`.
    ///
    /// # Example
    ///
    /// ```
    /// use flake54::{LockFlakeGenerator, MachineId, MonotonicClock};
    ///
    /// let machine_id = MachineId::from_region("fra", 35).unwrap();
    /// let generator = LockFlakeGenerator::new(machine_id, MonotonicClock::new().unwrap());
    ///
    /// let a = generator.try_next_id().unwrap();
    /// let b = generator.try_next_id().unwrap();
    /// assert!(a < b);
    /// assert_eq!(a.machine_id(), machine_id);
    /// ```
    pub fn new(machine_id: MachineId, time: T) -> Self {
        Self::from_components(0, machine_id, 0, time)
    }

    /// Creates a generator whose state is the ID built from the given
    /// components, as if that ID had just been issued.
    ///
    /// Mainly useful to resume after a known ID or to set up tests. Prefer
    /// [`Self::new`].
    pub fn from_components(timestamp: u64, machine_id: MachineId, sequence: u64, time: T) -> Self {
        let id = FlakeId::from_components(timestamp, machine_id, sequence);
        Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(id))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(id)),
            time,
            spin_limit: DEFAULT_SPIN_LIMIT,
        }
    }

    /// Sets how long [`Self::try_next_id`] may spin on an exhausted
    /// millisecond before giving up with [`Error::ClockStalled`].
    #[must_use]
    pub fn with_spin_limit(mut self, spin_limit: Duration) -> Self {
        self.spin_limit = spin_limit;
        self
    }

    /// The current spin limit.
    pub fn spin_limit(&self) -> Duration {
        self.spin_limit
    }

    /// The machine ID stamped into every generated ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockPoisoned`] if the lock is poisoned (std mutex
    /// only).
    pub fn machine_id(&self) -> Result<MachineId> {
        Ok(self.lock()?.machine_id())
    }

    /// Generates the next ID, spinning if the current millisecond is
    /// exhausted.
    ///
    /// The spin re-reads the clock until it advances and is bounded by the
    /// spin limit. It is not cancellable; the expected wait is below one
    /// millisecond.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock reads earlier than the last
    ///   issued ID. Continuing could produce duplicates; treat it as fatal.
    /// - [`Error::ClockStalled`] if the clock does not advance within the spin
    ///   limit.
    /// - [`Error::TimestampOverflow`] past the end of the 42-bit timestamp
    ///   range.
    /// - [`Error::LockPoisoned`] if another thread panicked while holding the
    ///   lock (std mutex only).
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_id(&self) -> Result<FlakeId> {
        let mut state = self.lock()?;
        let mut now = self.time.current_millis();
        loop {
            if let Some(id) = Self::advance(&mut state, now)? {
                return Ok(id);
            }
            now = self.wait_next_millis(now)?;
        }
    }

    /// Attempts to generate the next ID without blocking.
    ///
    /// Returns [`Poll::Pending`] instead of spinning when the current
    /// millisecond is exhausted.
    ///
    /// # Errors
    ///
    /// Same as [`Self::try_next_id`], minus [`Error::ClockStalled`].
    ///
    /// # Example
    ///
    /// ```
    /// use flake54::{LockFlakeGenerator, MachineId, MonotonicClock, Poll};
    ///
    /// let machine_id = MachineId::from_region("sin", 1).unwrap();
    /// let generator = LockFlakeGenerator::new(machine_id, MonotonicClock::new().unwrap());
    ///
    /// let id = loop {
    ///     match generator.try_poll_id().unwrap() {
    ///         Poll::Ready { id } => break id,
    ///         Poll::Pending { .. } => std::thread::yield_now(),
    ///     }
    /// };
    /// assert!(id.is_valid());
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<Poll> {
        let mut state = self.lock()?;
        let now = self.time.current_millis();
        match Self::advance(&mut state, now)? {
            Some(id) => Ok(Poll::Ready { id }),
            None => Ok(Poll::Pending { yield_for: 1 }),
        }
    }

    /// Moves `state` to the ID for `now`, or returns `None` when the sequence
    /// for `now` is used up.
    fn advance(state: &mut FlakeId, now: u64) -> Result<Option<FlakeId>> {
        let previous = state.timestamp();
        match now.cmp(&previous) {
            Ordering::Equal => {
                if state.has_sequence_room() {
                    *state = state.increment_sequence();
                    Ok(Some(*state))
                } else {
                    Ok(None)
                }
            }
            Ordering::Greater => {
                if now > FlakeId::max_timestamp() {
                    return Err(Self::cold_timestamp_overflow(now));
                }
                *state = state.rollover_to_timestamp(now);
                Ok(Some(*state))
            }
            Ordering::Less => Err(Self::cold_clock_behind(now, previous)),
        }
    }

    /// Spins until the clock leaves `previous`, returning the new reading.
    #[cold]
    #[inline(never)]
    fn wait_next_millis(&self, previous: u64) -> Result<u64> {
        let started = Instant::now();
        loop {
            core::hint::spin_loop();
            let now = self.time.current_millis();
            if now != previous {
                return Ok(now);
            }
            if started.elapsed() >= self.spin_limit {
                #[cfg(feature = "tracing")]
                tracing::warn!(timestamp = previous, spin_limit = ?self.spin_limit, "clock stalled");
                return Err(Error::ClockStalled {
                    timestamp: previous,
                });
            }
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(now: u64, previous: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::error!(now, previous, "clock moved backwards");
        Error::ClockRegression { now, previous }
    }

    #[cold]
    #[inline(never)]
    fn cold_timestamp_overflow(timestamp: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::error!(timestamp, "timestamp exceeds the id layout");
        Error::TimestampOverflow { timestamp }
    }

    fn lock(&self) -> Result<MutexGuard<'_, FlakeId>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }
}
