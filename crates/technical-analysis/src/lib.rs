pub mod indicators;
pub mod signals;
pub mod analyzer;

#[cfg(test)]
mod indicators_tests;

pub use indicators::*;
pub use signals::*;
pub use analyzer::*;
