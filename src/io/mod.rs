//! Input/output helpers.
//!
//! - transaction CSV ingest + validation (`ingest`)
//! - merged-series and scenario CSV exports (`export`)
//! - dashboard snapshot JSON read/write (`snapshot`)

pub mod export;
pub mod ingest;
pub mod snapshot;

pub use export::*;
pub use ingest::*;
pub use snapshot::*;
