mod lock;
mod status;

pub use lock::*;
pub use status::*;

// The generator state lock; `parking_lot` when enabled, otherwise std (which
// can poison).
#[cfg(not(feature = "parking-lot"))]
pub(crate) use std::sync::{Mutex, MutexGuard, PoisonError};

#[cfg(feature = "parking-lot")]
pub(crate) use parking_lot::{Mutex, MutexGuard};
