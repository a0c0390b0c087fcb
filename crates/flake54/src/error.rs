/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `flake54` can produce.
///
/// Codec errors (`InvalidId`, `InvalidByte`, `InvalidLength`, `InvalidJson`)
/// are recoverable: the caller decides whether to reject the input. The clock
/// and configuration variants are fatal for the process that hits them, since
/// carrying on risks handing out duplicate IDs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The numeric value is negative or does not fit in the ID range.
    #[error("invalid id")]
    InvalidId,

    /// A byte outside the base 54 alphabet was found while decoding.
    #[error("invalid byte {byte:#04x} at index {index}")]
    InvalidByte {
        /// The offending byte.
        byte: u8,
        /// Its position in the input.
        index: usize,
    },

    /// The input to decode is empty or longer than the longest encoding.
    #[error("invalid encoded length: {len}")]
    InvalidLength {
        /// Length of the rejected input in bytes.
        len: usize,
    },

    /// The JSON value is not a quoted, non-empty string.
    #[error("invalid json format")]
    InvalidJson,

    /// The machine identifier could not be built from the given parts.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// The time source reported a timestamp older than the last issued ID.
    #[error("clock moved backwards: now {now} ms, previous {previous} ms")]
    ClockRegression {
        /// Timestamp read from the clock.
        now: u64,
        /// Timestamp of the last issued ID.
        previous: u64,
    },

    /// The sequence was exhausted and the clock did not advance within the
    /// generator's spin limit.
    #[error("clock stalled at {timestamp} ms while waiting for the next tick")]
    ClockStalled {
        /// The timestamp the clock was stuck on.
        timestamp: u64,
    },

    /// The system clock reads earlier than the requested epoch.
    #[error("system clock is before the epoch")]
    ClockBeforeEpoch,

    /// The timestamp no longer fits in the 42-bit field.
    #[error("timestamp {timestamp} ms exceeds the maximum encodable value")]
    TimestampOverflow {
        /// The timestamp that was rejected.
        timestamp: u64,
    },

    /// The generator lock was poisoned by a panicking thread.
    ///
    /// `parking_lot` mutexes do not poison, so this variant is absent when the
    /// `parking-lot` feature is enabled.
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

/// Reasons a [`MachineId`] cannot be configured.
///
/// [`MachineId`]: crate::MachineId
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The region code is not in the region table.
    #[error("unknown region {0:?}")]
    UnknownRegion(String),

    /// The continent code does not fit in 3 bits or names no continent.
    #[error("continent code {0} out of range")]
    ContinentOutOfRange(u8),

    /// The machine index does not fit in the 6-bit per-continent field.
    #[error("machine index {index} out of range (max {max})")]
    IndexOutOfRange {
        /// The rejected index.
        index: i64,
        /// The largest accepted index.
        max: u8,
    },
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
