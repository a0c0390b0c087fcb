mod flake;
mod machine;

pub use flake::*;
pub use machine::*;
