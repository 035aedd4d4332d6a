//! Time-series merging for the forecast chart.

pub mod merge;

pub use merge::*;
