//! Generate-write-record orchestration for single graphs and the preset batch.

use std::fs;
use std::path::Path;

use cfpq_data_core::{GenerationError, Label, LabelSet, ScaleFreeGenerator, ScaleFreeParams, presets};
use rand::{SeedableRng, rngs::SmallRng};
use rayon::prelude::*;
use tracing::{Span, debug, field, info, instrument, warn};

use crate::cache::{ArtifactCache, GraphArtifact};
use crate::error::StoreError;
use crate::format::{DEFAULT_PREDICATE_NAMESPACE, GraphFormat, write_graph};
use crate::metadata::GraphMetadata;
use crate::store::GraphStore;

/// Dataset directory scale-free graphs are written to.
pub const DATASET_NAME: &str = "ScaleFree";

/// SplitMix64 increment (the 64-bit golden ratio) spacing per-pair seeds.
const PAIR_SEED_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

/// Outcome of one pair in a preset batch.
#[derive(Debug)]
pub struct PresetOutcome {
    /// Parameter pair that was built.
    pub params: ScaleFreeParams,
    /// Artefact, or the error that stopped this pair.
    pub result: Result<GraphArtifact, StoreError>,
}

/// Builds scale-free graphs into a [`GraphStore`].
///
/// # Examples
/// ```no_run
/// use cfpq_data_core::ScaleFreeParams;
/// use cfpq_data_store::{GraphFormat, GraphStore, ScaleFreeBuilder};
///
/// let builder = ScaleFreeBuilder::new(GraphStore::new("/tmp/cfpq-data"))
///     .with_format(GraphFormat::NTriples)
///     .with_seed(Some(7));
/// let params = ScaleFreeParams::new(100, 3)?;
/// let artifact = builder.build(params)?;
/// assert!(artifact.path.ends_with("ScaleFree/scale_free_graph_100_3.nt"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct ScaleFreeBuilder {
    store: GraphStore,
    labels: LabelSet,
    format: GraphFormat,
    namespace: String,
    seed: Option<u64>,
}

impl ScaleFreeBuilder {
    /// Creates a builder writing RDF/XML with the default alphabet, seeded
    /// from entropy.
    #[must_use]
    pub fn new(store: GraphStore) -> Self {
        Self {
            store,
            labels: LabelSet::default(),
            format: GraphFormat::default(),
            namespace: DEFAULT_PREDICATE_NAMESPACE.to_owned(),
            seed: None,
        }
    }

    /// Sets the label alphabet.
    #[must_use]
    pub fn with_labels(mut self, labels: LabelSet) -> Self {
        self.labels = labels;
        self
    }

    /// Sets the interchange format.
    #[must_use]
    pub fn with_format(mut self, format: GraphFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the namespace predicates are minted in.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the base seed; `None` seeds every run from entropy.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Store graphs are written to.
    #[must_use]
    #[rustfmt::skip]
    pub fn store(&self) -> &GraphStore { &self.store }

    /// Configured alphabet.
    #[must_use]
    #[rustfmt::skip]
    pub fn labels(&self) -> &LabelSet { &self.labels }

    /// Configured format.
    #[must_use]
    #[rustfmt::skip]
    pub fn format(&self) -> GraphFormat { self.format }

    /// Configured base seed.
    #[must_use]
    #[rustfmt::skip]
    pub fn seed(&self) -> Option<u64> { self.seed }

    /// Generates, writes and records the graph for `params`.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] or [`StoreError::Metadata`] when the
    /// dataset directory, graph file or sidecar cannot be written, and
    /// [`StoreError::Generation`] if generation fails.
    pub fn build(&self, params: ScaleFreeParams) -> Result<GraphArtifact, StoreError> {
        self.build_seeded(params, self.seed)
    }

    /// Validates a raw parameter pair and builds it.
    ///
    /// Rejected pairs never touch the filesystem.
    ///
    /// # Errors
    /// Returns [`StoreError::Generation`] wrapping the parameter error, or any
    /// error of [`ScaleFreeBuilder::build`].
    pub fn build_raw(
        &self,
        vertices_number: usize,
        vertices_degree: usize,
    ) -> Result<GraphArtifact, StoreError> {
        let params = ScaleFreeParams::new(vertices_number, vertices_degree)
            .map_err(GenerationError::from)?;
        self.build(params)
    }

    /// Like [`ScaleFreeBuilder::build`], but reuses the artefact cached for
    /// `params` while its graph file still exists and it was written with
    /// this builder's format, alphabet, namespace and seed. A cache may be
    /// shared between differently configured builders; mismatched entries are
    /// rebuilt and replaced.
    ///
    /// # Errors
    /// As for [`ScaleFreeBuilder::build`].
    pub fn build_cached(
        &self,
        cache: &ArtifactCache,
        params: ScaleFreeParams,
    ) -> Result<GraphArtifact, StoreError> {
        self.build_cached_seeded(cache, params, self.seed)
    }

    /// Builds every preset pair in parallel.
    ///
    /// With a base seed, each pair runs on a seed derived from the base seed
    /// and the pair itself, so output does not depend on scheduling. One
    /// pair failing leaves the others untouched. Outcomes follow preset
    /// order.
    #[instrument(name = "builder.build_presets", skip_all, fields(pairs = field::Empty, failures = field::Empty))]
    pub fn build_presets(&self, cache: &ArtifactCache) -> Vec<PresetOutcome> {
        let pairs: Vec<ScaleFreeParams> = presets().collect();
        let outcomes: Vec<PresetOutcome> = pairs
            .into_par_iter()
            .map(|params| {
                let seed = self.seed.map(|base| derive_seed(base, params));
                PresetOutcome {
                    params,
                    result: self.build_cached_seeded(cache, params, seed),
                }
            })
            .collect();

        let failures = outcomes.iter().filter(|outcome| outcome.result.is_err()).count();
        let span = Span::current();
        span.record("pairs", outcomes.len());
        span.record("failures", failures);
        outcomes
    }

    fn build_cached_seeded(
        &self,
        cache: &ArtifactCache,
        params: ScaleFreeParams,
        seed: Option<u64>,
    ) -> Result<GraphArtifact, StoreError> {
        if let Some(artifact) = cache.get(&params)
            && !self.produced(&artifact, seed)
        {
            debug!(params = %params, path = %artifact.path.display(), "cached artefact is stale");
            cache.invalidate(&params);
        }
        cache.get_or_try_insert_with(params, || self.build_seeded(params, seed))
    }

    /// Whether `artifact` is what this builder would write for `seed` and is
    /// still on disk.
    fn produced(&self, artifact: &GraphArtifact, seed: Option<u64>) -> bool {
        let metadata = &artifact.metadata;
        metadata.format == self.format.as_str()
            && metadata.predicate_namespace == self.namespace
            && metadata.seed == seed
            && metadata
                .labels
                .iter()
                .map(|entry| entry.label.as_str())
                .eq(self.labels.iter().map(Label::as_str))
            && artifact.path.is_file()
    }

    #[instrument(
        name = "builder.build",
        err,
        skip_all,
        fields(params = %params, format = %self.format, seeded = seed.is_some()),
    )]
    fn build_seeded(
        &self,
        params: ScaleFreeParams,
        seed: Option<u64>,
    ) -> Result<GraphArtifact, StoreError> {
        let directory = self.store.allocate_directory(DATASET_NAME)?;
        let mut rng = seed.map_or_else(SmallRng::from_entropy, SmallRng::seed_from_u64);
        let graph = ScaleFreeGenerator::new(params, self.labels.clone()).generate(&mut rng)?;

        let file_name = format!("{}.{}", params.file_stem(), self.format.extension());
        let path = directory.join(&file_name);
        let writer = self.format.writer(&self.namespace);
        write_graph(writer.as_ref(), graph.edges(), &path)?;
        let file_size_bytes = fs::metadata(&path)
            .map_err(|source| StoreError::io(&path, source))?
            .len();

        let metadata = GraphMetadata::describe(
            &graph,
            &file_name,
            self.format,
            &self.namespace,
            seed,
            file_size_bytes,
        );
        let metadata_path = match self.store.record(&path, &metadata) {
            Ok(sidecar) => sidecar,
            Err(err) => {
                discard_unrecorded(&path);
                return Err(err);
            }
        };
        info!(
            file_name = %file_name,
            directory = %directory.display(),
            edges = metadata.edges,
            "graph generated"
        );
        Ok(GraphArtifact {
            path,
            metadata_path,
            metadata,
        })
    }
}

/// Removes a graph whose sidecar could not be recorded.
fn discard_unrecorded(path: &Path) {
    if let Err(cleanup) = fs::remove_file(path) {
        warn!(
            graph = %path.display(),
            error = %cleanup,
            "graph left on disk without metadata"
        );
    }
}

/// Seed for `params` within a batch run from `base_seed`.
fn derive_seed(base_seed: u64, params: ScaleFreeParams) -> u64 {
    let pair = ((params.vertices_number() as u64) << 32) | params.vertices_degree() as u64;
    splitmix64(base_seed ^ pair.wrapping_add(1).wrapping_mul(PAIR_SEED_SPACING))
}

#[inline]
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(PAIR_SEED_SPACING);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}
