//! RDF/XML encoding.

use std::io::{self, Write};

use cfpq_data_core::Edge;

use super::{GraphWriter, node_id};

const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const PREDICATE_PREFIX: &str = "cfpq";

/// Writes one `rdf:Description` per run of edges sharing a source vertex.
///
/// # Examples
/// ```
/// use cfpq_data_core::{Edge, Label};
/// use cfpq_data_store::{GraphWriter, RdfXmlWriter};
///
/// let edges = vec![Edge { source: 0, label: Label::new("A").expect("valid"), target: 1 }];
/// let mut out = Vec::new();
/// RdfXmlWriter::new("http://example.org/").encode(&edges, &mut out).expect("in-memory write");
/// let text = String::from_utf8(out).expect("utf-8 output");
/// assert!(text.contains(r#"<cfpq:A rdf:nodeID="id-1"/>"#));
/// ```
#[derive(Clone, Debug)]
pub struct RdfXmlWriter {
    namespace: String,
}

impl RdfXmlWriter {
    /// Creates a writer minting predicates in `namespace`.
    #[must_use]
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_owned(),
        }
    }
}

impl GraphWriter for RdfXmlWriter {
    fn extension(&self) -> &'static str {
        "xml"
    }

    fn encode(&self, edges: &[Edge], out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, r#"<?xml version="1.0" encoding="utf-8"?>"#)?;
        writeln!(out, "<rdf:RDF")?;
        writeln!(out, r#"   xmlns:rdf="{RDF_NAMESPACE}""#)?;
        writeln!(
            out,
            r#"   xmlns:{PREDICATE_PREFIX}="{}""#,
            escape_attribute(&self.namespace)
        )?;
        writeln!(out, ">")?;

        let mut open_subject: Option<usize> = None;
        for edge in edges {
            if open_subject != Some(edge.source) {
                if open_subject.is_some() {
                    writeln!(out, "  </rdf:Description>")?;
                }
                writeln!(
                    out,
                    r#"  <rdf:Description rdf:nodeID="{}">"#,
                    node_id(edge.source)
                )?;
                open_subject = Some(edge.source);
            }
            writeln!(
                out,
                r#"    <{PREDICATE_PREFIX}:{} rdf:nodeID="{}"/>"#,
                edge.label,
                node_id(edge.target)
            )?;
        }
        if open_subject.is_some() {
            writeln!(out, "  </rdf:Description>")?;
        }
        writeln!(out, "</rdf:RDF>")
    }
}

fn escape_attribute(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}
