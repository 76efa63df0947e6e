//! Upstream data refresh: Agmarknet fetch and monthly cleaning.

pub mod agmarknet;
pub mod clean;

pub use agmarknet::{AgmarknetClient, DEFAULT_MAX_RECORDS, DEFAULT_PAGE_LIMIT, write_snapshot};
pub use clean::{CleanReport, clean_snapshot};
