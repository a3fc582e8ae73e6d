//! Preferential-attachment (Barabási–Albert) graph generator.
//!
//! Generation runs in two phases. The seed phase wires each of the first `k`
//! vertices to targets `0..k`, self-loops included, and gives every seed
//! vertex the flat sampling weight [`SEED_VERTEX_WEIGHT`]. The growth phase
//! then adds vertices `k..n`, each attaching to `k` distinct earlier vertices
//! drawn proportionally to their current degree.

use rand::Rng;
use tracing::{Span, debug, field, instrument};

use crate::{
    error::{GenerationError, Result},
    label::{Label, LabelSet},
    params::ScaleFreeParams,
    sampler::{InsufficientWeight, WeightedSampler},
};

/// Sampling weight assigned to every seed vertex, independent of `k`.
pub const SEED_VERTEX_WEIGHT: u64 = 3;

/// A directed labelled edge `(source, label, target)`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Edge {
    /// Vertex the edge leaves.
    pub source: usize,
    /// Label drawn for the edge.
    pub label: Label,
    /// Vertex the edge enters.
    pub target: usize,
}

/// Output of a generation run.
#[derive(Clone, Debug)]
pub struct ScaleFreeGraph {
    params: ScaleFreeParams,
    labels: LabelSet,
    edges: Vec<Edge>,
}

impl ScaleFreeGraph {
    /// Parameters that produced the graph.
    #[must_use]
    #[rustfmt::skip]
    pub const fn params(&self) -> ScaleFreeParams { self.params }

    /// Alphabet labels were drawn from.
    #[must_use]
    #[rustfmt::skip]
    pub const fn labels(&self) -> &LabelSet { &self.labels }

    /// Number of vertices, `vertices_number`.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.params.vertices_number()
    }

    /// Edges in emission order: seed edges first, then growth edges, each
    /// grouped by source vertex.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[Edge] { &self.edges }

    /// Consumes the graph, returning its edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn into_edges(self) -> Vec<Edge> { self.edges }

    /// Number of edges per label, in alphabet order.
    #[must_use]
    pub fn label_counts(&self) -> Vec<(Label, usize)> {
        self.labels
            .iter()
            .map(|label| {
                let count = self.edges.iter().filter(|edge| &edge.label == label).count();
                (label.clone(), count)
            })
            .collect()
    }
}

/// Generates scale-free graphs for a fixed parameter pair and alphabet.
///
/// # Examples
/// ```
/// use cfpq_data_core::{LabelSet, ScaleFreeGenerator, ScaleFreeParams};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let params = ScaleFreeParams::new(100, 3).expect("valid parameters");
/// let generator = ScaleFreeGenerator::new(params, LabelSet::default());
/// let graph = generator
///     .generate(&mut SmallRng::seed_from_u64(7))
///     .expect("generation succeeds");
/// assert_eq!(graph.edges().len(), 300);
/// ```
#[derive(Clone, Debug)]
pub struct ScaleFreeGenerator {
    params: ScaleFreeParams,
    labels: LabelSet,
}

impl ScaleFreeGenerator {
    /// Creates a generator for `params`, drawing labels from `labels`.
    #[must_use]
    pub const fn new(params: ScaleFreeParams, labels: LabelSet) -> Self {
        Self { params, labels }
    }

    /// Returns the configured parameters.
    #[must_use]
    #[rustfmt::skip]
    pub const fn params(&self) -> ScaleFreeParams { self.params }

    /// Returns the configured alphabet.
    #[must_use]
    #[rustfmt::skip]
    pub const fn labels(&self) -> &LabelSet { &self.labels }

    /// Runs both phases, consuming randomness only from `rng`.
    ///
    /// # Errors
    /// Returns [`GenerationError::DegenerateDistribution`] if a growth vertex
    /// cannot draw `k` distinct weighted targets. Validated parameters never
    /// reach this state.
    #[instrument(
        name = "generator.generate",
        err,
        skip(self, rng),
        fields(vertices_number = field::Empty, vertices_degree = field::Empty, labels = field::Empty),
    )]
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ScaleFreeGraph> {
        let span = Span::current();
        span.record("vertices_number", self.params.vertices_number());
        span.record("vertices_degree", self.params.vertices_degree());
        span.record("labels", field::display(&self.labels));

        let mut state = AttachmentState::new(self.params);
        state.seed(&self.labels, rng);
        debug!(edges = state.edges.len(), "seed phase completed");

        for vertex in self.params.vertices_degree()..self.params.vertices_number() {
            state.attach(vertex, &self.labels, rng)?;
        }
        debug!(
            edges = state.edges.len(),
            total_degree = state.degrees.total(),
            "growth phase completed"
        );

        Ok(ScaleFreeGraph {
            params: self.params,
            labels: self.labels.clone(),
            edges: state.edges,
        })
    }
}

/// Validates raw parameters and generates a graph.
///
/// Parameter validation happens before `rng` is touched, so a rejected
/// request consumes no randomness.
///
/// # Errors
/// Returns [`GenerationError::InvalidParameter`] for a zero degree or a degree
/// above the vertex count, and [`GenerationError::DegenerateDistribution`] as
/// described on [`ScaleFreeGenerator::generate`].
///
/// # Examples
/// ```
/// use cfpq_data_core::{GenerationError, LabelSet, generate};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let labels = LabelSet::new(["A"]).expect("valid alphabet");
/// let mut rng = SmallRng::seed_from_u64(42);
/// let graph = generate(4, 2, &labels, &mut rng).expect("valid parameters");
/// assert_eq!(graph.edges().len(), 8);
///
/// let err = generate(5, 7, &labels, &mut rng).expect_err("degree above vertex count");
/// assert!(matches!(err, GenerationError::InvalidParameter(_)));
/// ```
pub fn generate<R: Rng + ?Sized>(
    vertices_number: usize,
    vertices_degree: usize,
    labels: &LabelSet,
    rng: &mut R,
) -> Result<ScaleFreeGraph> {
    let params = ScaleFreeParams::new(vertices_number, vertices_degree)?;
    ScaleFreeGenerator::new(params, labels.clone()).generate(rng)
}

/// Degree table and edge accumulator owned by one generation run.
struct AttachmentState {
    params: ScaleFreeParams,
    degrees: WeightedSampler,
    edges: Vec<Edge>,
}

impl AttachmentState {
    fn new(params: ScaleFreeParams) -> Self {
        Self {
            params,
            degrees: WeightedSampler::with_capacity(params.vertices_number()),
            edges: Vec::with_capacity(params.edge_count()),
        }
    }

    fn seed<R: Rng + ?Sized>(&mut self, labels: &LabelSet, rng: &mut R) {
        let degree = self.params.vertices_degree();
        for source in 0..degree {
            for target in 0..degree {
                self.edges.push(Edge {
                    source,
                    label: labels.choose(rng).clone(),
                    target,
                });
            }
        }
        for _ in 0..degree {
            self.degrees.push(SEED_VERTEX_WEIGHT);
        }
    }

    /// Adds growth vertex `vertex` and returns the targets it attached to.
    fn attach<R: Rng + ?Sized>(
        &mut self,
        vertex: usize,
        labels: &LabelSet,
        rng: &mut R,
    ) -> Result<Vec<usize>> {
        let requested = self.params.vertices_degree();
        let targets = self
            .degrees
            .sample_distinct(requested, rng)
            .map_err(|InsufficientWeight { total_weight, .. }| {
                GenerationError::DegenerateDistribution {
                    vertex,
                    total_weight,
                    requested,
                }
            })?;

        let new_index = self.degrees.push(0);
        debug_assert_eq!(new_index, vertex, "degree table must track vertex indices");
        for &target in &targets {
            self.edges.push(Edge {
                source: vertex,
                label: labels.choose(rng).clone(),
                target,
            });
            self.degrees.increment(target, 1);
            self.degrees.increment(vertex, 1);
        }
        Ok(targets)
    }
}
