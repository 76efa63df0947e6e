//! Dataset queries: filtering plus the price/trend/extreme resolvers.

pub mod filter;
pub mod resolvers;

pub use filter::RecordFilter;
pub use resolvers::{TREND_WINDOW, extreme, price, supporting_rows, trend};
