//! Domain types used throughout the engine.
//!
//! This module defines:
//!
//! - dataset rows and the in-memory dataset (`PriceRecord`, `Dataset`)
//! - extraction output (`QueryIntent`, `ExtractedQuery`)
//! - resolver output (`Answer`, `Direction`)
//! - runtime configuration (`EngineConfig`)

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
