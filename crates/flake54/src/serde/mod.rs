mod flake;
mod json;

pub use flake::*;
