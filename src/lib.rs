//! `samarth` library crate.
//!
//! Natural-language Q&A over Agmarknet mandi prices. The binary (`samarth`)
//! is a thin wrapper around this library so that:
//!
//! - the question engine is testable without spawning processes
//! - the entity recognizer and chart writer can be swapped at the seams
//! - the refresh pipeline (fetch + clean) stays separate from answering

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod io;
pub mod nlp;
pub mod query;
pub mod report;
