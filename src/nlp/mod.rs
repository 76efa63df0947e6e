//! Question understanding: entity recognition and intent classification.

pub mod extract;
pub mod recognizer;

pub use extract::{Extractor, classify_intent};
pub use recognizer::{Entity, EntityLabel, EntityRecognizer, GazetteerRecognizer, NoopRecognizer};
