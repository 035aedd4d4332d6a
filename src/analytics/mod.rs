//! Client-side analytics over raw transactions.

pub mod aggregate;

pub use aggregate::*;
