//! Tests for the triple writers and atomic file replacement.

use std::fs;
use std::io::{self, Write};

use cfpq_data_core::{Edge, Label, LabelSet, generate};
use rand::{SeedableRng, rngs::SmallRng};
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::{
    DEFAULT_PREDICATE_NAMESPACE, GraphFormat, GraphWriter, NTriplesWriter, RdfXmlWriter,
    UnknownFormat, write_graph,
};
use crate::error::StoreError;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[fixture]
fn edges() -> Vec<Edge> {
    let labels = LabelSet::default();
    generate(12, 2, &labels, &mut SmallRng::seed_from_u64(31))
        .expect("generation must succeed")
        .into_edges()
}

fn label(symbol: &str) -> Label {
    Label::new(symbol).expect("label must be valid")
}

/// Writer that emits a fragment and then fails.
struct FailingWriter;

impl GraphWriter for FailingWriter {
    fn extension(&self) -> &'static str {
        "xml"
    }

    fn encode(&self, _edges: &[Edge], out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"<rdf:RDF>")?;
        Err(io::Error::other("encoder failed"))
    }
}

#[test]
fn rdf_xml_groups_statements_by_subject() -> TestResult {
    let edges = vec![
        Edge { source: 0, label: label("A"), target: 0 },
        Edge { source: 0, label: label("B"), target: 1 },
        Edge { source: 2, label: label("A"), target: 0 },
    ];
    let mut out = Vec::new();
    RdfXmlWriter::new(DEFAULT_PREDICATE_NAMESPACE).encode(&edges, &mut out)?;
    let text = String::from_utf8(out)?;

    let expected = concat!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
        "<rdf:RDF\n",
        "   xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\"\n",
        "   xmlns:cfpq=\"http://cfpq-data/label#\"\n",
        ">\n",
        "  <rdf:Description rdf:nodeID=\"id-0\">\n",
        "    <cfpq:A rdf:nodeID=\"id-0\"/>\n",
        "    <cfpq:B rdf:nodeID=\"id-1\"/>\n",
        "  </rdf:Description>\n",
        "  <rdf:Description rdf:nodeID=\"id-2\">\n",
        "    <cfpq:A rdf:nodeID=\"id-0\"/>\n",
        "  </rdf:Description>\n",
        "</rdf:RDF>\n",
    );
    assert_eq!(text, expected);
    Ok(())
}

#[test]
fn rdf_xml_of_empty_edge_list_is_an_empty_document() -> TestResult {
    let mut out = Vec::new();
    RdfXmlWriter::new(DEFAULT_PREDICATE_NAMESPACE).encode(&[], &mut out)?;
    let text = String::from_utf8(out)?;
    assert!(!text.contains("rdf:Description"));
    assert!(text.ends_with("</rdf:RDF>\n"));
    Ok(())
}

#[rstest]
fn rdf_xml_writes_one_property_element_per_edge(edges: Vec<Edge>) -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("graph.xml");
    write_graph(&RdfXmlWriter::new(DEFAULT_PREDICATE_NAMESPACE), &edges, &path)?;

    let text = fs::read_to_string(&path)?;
    let statements = text.lines().filter(|line| line.starts_with("    <cfpq:")).count();
    assert_eq!(statements, edges.len());
    let subjects = text.matches("<rdf:Description ").count();
    assert_eq!(subjects, 12);
    assert_eq!(text.matches("</rdf:Description>").count(), subjects);
    Ok(())
}

const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

type Triple = (String, String, String);

/// Parses RDF/XML as written by [`RdfXmlWriter`] back into triples.
fn parse_rdf_xml(text: &str) -> Result<Vec<Triple>, Box<dyn std::error::Error>> {
    let document = roxmltree::Document::parse(text)?;
    let root = document.root_element();
    assert_eq!(root.tag_name().namespace(), Some(RDF_NAMESPACE));
    assert_eq!(root.tag_name().name(), "RDF");

    let mut triples = Vec::new();
    for description in root.children().filter(|node| node.is_element()) {
        assert_eq!(description.tag_name().name(), "Description");
        let subject = description
            .attribute((RDF_NAMESPACE, "nodeID"))
            .ok_or("description without rdf:nodeID")?;
        for property in description.children().filter(|node| node.is_element()) {
            let object = property
                .attribute((RDF_NAMESPACE, "nodeID"))
                .ok_or("property without rdf:nodeID")?;
            let predicate = format!(
                "{}{}",
                property.tag_name().namespace().unwrap_or_default(),
                property.tag_name().name()
            );
            triples.push((subject.to_owned(), predicate, object.to_owned()));
        }
    }
    Ok(triples)
}

#[rstest]
#[case::default_alphabet(&["A", "B", "C", "D"], DEFAULT_PREDICATE_NAMESPACE)]
#[case::non_ascii_names(&["\u{e9}tiquette", "a\u{b7}b", "\u{3b1}\u{3b2}"], DEFAULT_PREDICATE_NAMESPACE)]
#[case::escaped_namespace(&["x", "y"], "http://example.org/labels?v=1&kind=\"cfpq\"#")]
fn rdf_xml_parses_back_to_the_edge_list(
    #[case] symbols: &[&str],
    #[case] namespace: &str,
) -> TestResult {
    let labels = LabelSet::new(symbols)?;
    let edges = generate(40, 3, &labels, &mut SmallRng::seed_from_u64(17))?.into_edges();
    let dir = TempDir::new()?;
    let path = dir.path().join("graph.xml");
    write_graph(&RdfXmlWriter::new(namespace), &edges, &path)?;

    let triples = parse_rdf_xml(&fs::read_to_string(&path)?)?;
    let expected: Vec<Triple> = edges
        .iter()
        .map(|edge| {
            (
                format!("id-{}", edge.source),
                format!("{namespace}{}", edge.label),
                format!("id-{}", edge.target),
            )
        })
        .collect();
    assert_eq!(triples.len(), edges.len());
    assert_eq!(triples, expected);
    Ok(())
}

#[rstest]
fn ntriples_writes_one_line_per_edge(edges: Vec<Edge>) -> TestResult {
    let mut out = Vec::new();
    NTriplesWriter::new("urn:label:").encode(&edges, &mut out)?;
    let text = String::from_utf8(out)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), edges.len());
    let first = edges.first().ok_or("fixture must contain edges")?;
    assert_eq!(
        lines.first().copied(),
        Some(format!("_:id-{} <urn:label:{}> _:id-{} .", first.source, first.label, first.target).as_str())
    );
    Ok(())
}

#[rstest]
fn write_graph_replaces_existing_files(edges: Vec<Edge>) -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("graph.nt");
    fs::write(&path, "stale contents that are much longer than nothing\n".repeat(1_000))?;
    write_graph(&NTriplesWriter::new("urn:label:"), &edges, &path)?;

    let text = fs::read_to_string(&path)?;
    assert!(!text.contains("stale"));
    assert_eq!(text.lines().count(), edges.len());
    Ok(())
}

#[rstest]
fn unwritable_destination_reports_io_failure(edges: Vec<Edge>) -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("missing").join("graph.xml");
    let err = write_graph(&RdfXmlWriter::new(DEFAULT_PREDICATE_NAMESPACE), &edges, &path)
        .expect_err("missing parent directory must fail");
    assert!(matches!(err, StoreError::Io { .. }));
    assert_eq!(err.code(), "STORE_IO_FAILURE");
    assert!(!path.exists());
    Ok(())
}

#[rstest]
fn failed_encoding_leaves_no_partial_file(edges: Vec<Edge>) -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("graph.xml");
    let err = write_graph(&FailingWriter, &edges, &path).expect_err("encoder failure must surface");
    assert!(matches!(err, StoreError::Io { .. }));
    assert!(!path.exists());
    assert_eq!(fs::read_dir(dir.path())?.count(), 0);
    Ok(())
}

#[rstest]
#[case::xml("xml", GraphFormat::RdfXml)]
#[case::rdf_xml("RDF-XML", GraphFormat::RdfXml)]
#[case::nt(" nt ", GraphFormat::NTriples)]
#[case::ntriples("n-triples", GraphFormat::NTriples)]
fn formats_parse_from_names(#[case] raw: &str, #[case] expected: GraphFormat) {
    assert_eq!(raw.parse::<GraphFormat>(), Ok(expected));
}

#[test]
fn unknown_format_is_rejected() {
    assert_eq!(
        "turtle".parse::<GraphFormat>(),
        Err(UnknownFormat("turtle".to_owned()))
    );
}

#[rstest]
#[case(GraphFormat::RdfXml, "xml")]
#[case(GraphFormat::NTriples, "nt")]
fn format_writers_agree_on_extension(#[case] format: GraphFormat, #[case] extension: &str) {
    assert_eq!(format.extension(), extension);
    assert_eq!(format.writer(DEFAULT_PREDICATE_NAMESPACE).extension(), extension);
}
