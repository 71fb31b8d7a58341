//! Bounded views over a record stream.

pub mod top_k;

pub use top_k::{TopKStats, TopKTracker};
