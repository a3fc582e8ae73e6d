//! Scale-free graph generation for context-free path querying benchmarks.
//!
//! Graphs are grown with preferential attachment: after a fixed seed phase,
//! every new vertex attaches to `k` distinct earlier vertices chosen
//! proportionally to their degree, and every edge carries a label drawn
//! uniformly from a small alphabet. All randomness comes from a caller-supplied
//! [`rand::Rng`], so a fixed seed reproduces the same graph.
//!
//! ```
//! use cfpq_data_core::{LabelSet, ScaleFreeGenerator, ScaleFreeParams};
//! use rand::{SeedableRng, rngs::SmallRng};
//!
//! let params = ScaleFreeParams::new(500, 3).expect("valid parameters");
//! let graph = ScaleFreeGenerator::new(params, LabelSet::default())
//!     .generate(&mut SmallRng::seed_from_u64(1))
//!     .expect("generation succeeds");
//! assert_eq!(graph.edges().len(), params.edge_count());
//! ```

mod error;
mod generator;
mod label;
mod params;
mod sampler;

#[cfg(test)]
mod test_utils;

pub use crate::{
    error::{GenerationError, GenerationErrorCode, ParameterError, Result},
    generator::{Edge, SEED_VERTEX_WEIGHT, ScaleFreeGenerator, ScaleFreeGraph, generate},
    label::{DEFAULT_LABELS, Label, LabelSet},
    params::{PRESET_DEGREES, PRESET_VERTEX_COUNTS, ScaleFreeParams, presets},
    sampler::{InsufficientWeight, WeightedSampler},
};
