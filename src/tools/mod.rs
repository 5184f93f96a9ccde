//! Analytical tools of the crate.
//!
//! - [`assembly`]: builds fixed-length constructs from a
//!   [`Layout`](crate::data_structs::Layout) and an element library, with a
//!   coordinate manifest of every placed and filler interval.
//! - [`metrics`]: maps bp coordinates onto track bins and extracts max, mean
//!   and AUC per region.
//! - [`stats`]: aggregates technical replicates and compares conditions
//!   (ANOVA, trend correlations, effect size, verdicts).
pub mod assembly;
pub mod metrics;
pub mod stats;
