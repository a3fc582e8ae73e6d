//! N-Triples encoding.

use std::io::{self, Write};

use cfpq_data_core::Edge;

use super::{GraphWriter, node_id};

/// Writes one `_:subject <predicate> _:object .` line per edge.
#[derive(Clone, Debug)]
pub struct NTriplesWriter {
    namespace: String,
}

impl NTriplesWriter {
    /// Creates a writer minting predicates in `namespace`.
    #[must_use]
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_owned(),
        }
    }
}

impl GraphWriter for NTriplesWriter {
    fn extension(&self) -> &'static str {
        "nt"
    }

    fn encode(&self, edges: &[Edge], out: &mut dyn Write) -> io::Result<()> {
        for edge in edges {
            writeln!(
                out,
                "_:{} <{}{}> _:{} .",
                node_id(edge.source),
                self.namespace,
                edge.label,
                node_id(edge.target)
            )?;
        }
        Ok(())
    }
}
