//! Presentation of answers and dataset summaries.

pub mod format;

pub use format::*;
