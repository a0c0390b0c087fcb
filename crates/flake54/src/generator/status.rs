use crate::id::FlakeId;

/// Outcome of a single non-blocking generation attempt.
///
/// Returned by [`LockFlakeGenerator::try_poll_id`]:
///
/// - [`Poll::Ready`] carries a freshly generated ID.
/// - [`Poll::Pending`] means all 4096 sequence values of the current
///   millisecond are used up; retry once the clock has advanced by
///   `yield_for` milliseconds.
///
/// [`LockFlakeGenerator::try_poll_id`]: crate::LockFlakeGenerator::try_poll_id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: FlakeId,
    },
    /// The sequence is exhausted for the current millisecond.
    Pending {
        /// Milliseconds to wait before trying again.
        yield_for: u64,
    },
}

impl Poll {
    /// Returns the ID if one was generated.
    pub const fn ready(self) -> Option<FlakeId> {
        match self {
            Self::Ready { id } => Some(id),
            Self::Pending { .. } => None,
        }
    }
}
