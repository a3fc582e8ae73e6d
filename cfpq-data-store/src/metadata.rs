//! JSON sidecar describing a generated graph.

use cfpq_data_core::ScaleFreeGraph;
use serde::{Deserialize, Serialize};

use crate::format::GraphFormat;

/// Graph family recorded for every generated graph.
pub const SCALE_FREE_FAMILY: &str = "ScaleFree";

/// Number of edges carrying one label.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct LabelCount {
    /// Label symbol.
    pub label: String,
    /// Edges carrying the label.
    pub count: usize,
}

/// Parameters the generator was invoked with.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GeneratorParameters {
    /// Final vertex count.
    pub vertices_number: usize,
    /// Edges added per vertex.
    pub vertices_degree: usize,
}

/// Summary stored beside each graph file as `{stem}.json`.
///
/// # Examples
/// ```
/// use cfpq_data_core::{LabelSet, generate};
/// use cfpq_data_store::{DEFAULT_PREDICATE_NAMESPACE, GraphFormat, GraphMetadata};
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let graph = generate(10, 2, &LabelSet::default(), &mut SmallRng::seed_from_u64(3))
///     .expect("valid parameters");
/// let metadata = GraphMetadata::describe(
///     &graph,
///     "scale_free_graph_10_2.xml",
///     GraphFormat::RdfXml,
///     DEFAULT_PREDICATE_NAMESPACE,
///     Some(3),
///     1_024,
/// );
/// assert_eq!(metadata.edges, 20);
/// assert_eq!(metadata.name, "scale_free_graph_10_2");
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GraphMetadata {
    /// Graph name, the file stem.
    pub name: String,
    /// Graph family.
    pub family: String,
    /// Name of the graph file inside its dataset directory.
    pub file_name: String,
    /// Interchange format of the graph file.
    pub format: String,
    /// Namespace edge labels are minted in as predicates.
    pub predicate_namespace: String,
    /// Vertex count.
    pub vertices: usize,
    /// Edge count.
    pub edges: usize,
    /// Edge count per label, in alphabet order.
    pub labels: Vec<LabelCount>,
    /// Generator parameters.
    pub parameters: GeneratorParameters,
    /// Seed of the run, absent when seeded from entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Size of the graph file in bytes.
    pub file_size_bytes: u64,
}

impl GraphMetadata {
    /// Summarises `graph` as written to `file_name`.
    #[must_use]
    pub fn describe(
        graph: &ScaleFreeGraph,
        file_name: &str,
        format: GraphFormat,
        predicate_namespace: &str,
        seed: Option<u64>,
        file_size_bytes: u64,
    ) -> Self {
        let params = graph.params();
        Self {
            name: params.file_stem(),
            family: SCALE_FREE_FAMILY.to_owned(),
            file_name: file_name.to_owned(),
            format: format.as_str().to_owned(),
            predicate_namespace: predicate_namespace.to_owned(),
            vertices: graph.vertex_count(),
            edges: graph.edges().len(),
            labels: graph
                .label_counts()
                .into_iter()
                .map(|(label, count)| LabelCount {
                    label: label.as_str().to_owned(),
                    count,
                })
                .collect(),
            parameters: GeneratorParameters {
                vertices_number: params.vertices_number(),
                vertices_degree: params.vertices_degree(),
            },
            seed,
            file_size_bytes,
        }
    }
}
