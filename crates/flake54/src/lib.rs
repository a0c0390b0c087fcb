#![doc = include_str!("../README.md")]

mod base54;
mod error;
mod generator;
mod id;
mod region;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::base54::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::region::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
