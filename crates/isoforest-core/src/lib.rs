//! Isolation forest anomaly scoring over named unsigned features.
//!
//! Training only accumulates a catalog of the distinct values seen for each
//! feature. Trees are grown by repeatedly picking a random feature and a
//! random catalog value to split on, and a sample is scored by the average
//! number of comparisons needed to isolate it. Shorter paths mean stronger
//! outlier evidence; scores are raw path lengths, not normalized to [0, 1].
//!
//! Pure computation: no I/O apart from optional model persistence.

mod catalog;
mod config;
mod error;
mod feature;
mod forest;
mod node;
mod randomizer;
mod score;
mod serialize;
mod tree;

pub use catalog::Catalog;
pub use config::ForestConfig;
pub use error::ForestError;
pub use feature::{Feature, Sample};
pub use forest::{DEFAULT_N_TREES, Forest};
pub use node::{Node, Nodes};
pub use randomizer::{DefaultRandomizer, Randomizer, ScriptedRandomizer};
