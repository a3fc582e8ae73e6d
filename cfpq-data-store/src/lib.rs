//! Storage side of the CFPQ scale-free generator.
//!
//! Generated edge lists are serialised as RDF/XML or N-Triples into a
//! per-dataset directory, each graph accompanied by a JSON metadata sidecar.
//! [`ScaleFreeBuilder`] ties generation, writing and recording together and
//! runs the preset batch in parallel; [`ArtifactCache`] lets callers skip
//! regenerating pairs they already built.
//!
//! ```no_run
//! use cfpq_data_store::{ArtifactCache, GraphStore, ScaleFreeBuilder};
//!
//! let builder = ScaleFreeBuilder::new(GraphStore::from_env()).with_seed(Some(1));
//! for outcome in builder.build_presets(&ArtifactCache::new()) {
//!     let artifact = outcome.result?;
//!     println!("{}", artifact.path.display());
//! }
//! # Ok::<(), cfpq_data_store::StoreError>(())
//! ```

mod builder;
mod cache;
mod error;
mod format;
mod metadata;
mod store;

pub use crate::{
    builder::{DATASET_NAME, PresetOutcome, ScaleFreeBuilder},
    cache::{ArtifactCache, GraphArtifact},
    error::StoreError,
    format::{
        DEFAULT_PREDICATE_NAMESPACE, GraphFormat, GraphWriter, NTriplesWriter, RdfXmlWriter,
        UnknownFormat, write_graph,
    },
    metadata::{GeneratorParameters, GraphMetadata, LabelCount, SCALE_FREE_FAMILY},
    store::{DATA_DIR_ENV, GraphStore, default_data_dir, metadata_path},
};
