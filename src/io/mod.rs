//! Input/output helpers.
//!
//! - dataset CSV ingest + validation (`ingest`)
//! - cleaned CSV export and atomic file replacement (`export`)
//! - SVG trend charts (`chart`)

pub mod chart;
pub mod export;
pub mod ingest;

pub use chart::*;
pub use export::*;
pub use ingest::*;
