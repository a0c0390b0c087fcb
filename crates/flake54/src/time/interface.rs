use core::time::Duration;

/// Epoch of the timestamp field: Wednesday, January 1, 2020 00:00:01 UTC.
pub const FLAKE_EPOCH: Duration = Duration::from_millis(1_577_836_801_000);

/// A source of millisecond timestamps relative to a fixed epoch.
///
/// Generators only ever compare readings from the same source, so the unit
/// must be milliseconds but the origin is up to the implementation. Use
/// [`MonotonicClock`] in production; tests plug in fixed or stepping clocks.
///
/// # Example
///
/// ```
/// use flake54::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource<u64> for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
///
/// [`MonotonicClock`]: crate::MonotonicClock
pub trait TimeSource<T> {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> T;
}
