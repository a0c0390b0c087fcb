mod continent;

pub use continent::*;
