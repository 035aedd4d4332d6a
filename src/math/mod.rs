//! Numerical helpers.

pub mod trend;

pub use trend::*;
