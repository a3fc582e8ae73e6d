//! Triple serialisation of generated edge lists.
//!
//! Every edge becomes one RDF statement whose subject and object are blank
//! nodes named after the vertex index and whose predicate is the label,
//! resolved against a predicate namespace.

mod ntriples;
mod rdf_xml;

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use cfpq_data_core::Edge;
use tracing::{debug, instrument, warn};

use crate::error::StoreError;

pub use ntriples::NTriplesWriter;
pub use rdf_xml::RdfXmlWriter;

/// Namespace predicates are minted in when none is configured.
pub const DEFAULT_PREDICATE_NAMESPACE: &str = "http://cfpq-data/label#";

/// Encodes an edge list in one interchange format.
pub trait GraphWriter: Send + Sync {
    /// File extension, without the dot.
    fn extension(&self) -> &'static str;

    /// Streams `edges` to `out`.
    ///
    /// # Errors
    /// Returns any error raised by `out`.
    fn encode(&self, edges: &[Edge], out: &mut dyn Write) -> io::Result<()>;
}

/// Supported interchange formats.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum GraphFormat {
    /// RDF/XML, written with the `xml` extension.
    #[default]
    RdfXml,
    /// N-Triples, written with the `nt` extension.
    NTriples,
}

impl GraphFormat {
    /// File extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::RdfXml => "xml",
            Self::NTriples => "nt",
        }
    }

    /// Stable name recorded in metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RdfXml => "rdf-xml",
            Self::NTriples => "n-triples",
        }
    }

    /// Builds the writer for this format.
    #[must_use]
    pub fn writer(self, namespace: &str) -> Box<dyn GraphWriter> {
        match self {
            Self::RdfXml => Box::new(RdfXmlWriter::new(namespace)),
            Self::NTriples => Box::new(NTriplesWriter::new(namespace)),
        }
    }
}

impl fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown format name.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unsupported graph format `{0}`; expected `xml` or `nt`")]
pub struct UnknownFormat(pub String);

impl FromStr for GraphFormat {
    type Err = UnknownFormat;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "xml" | "rdf-xml" | "rdfxml" => Ok(Self::RdfXml),
            "nt" | "n-triples" | "ntriples" => Ok(Self::NTriples),
            other => Err(UnknownFormat(other.to_owned())),
        }
    }
}

/// Writes `edges` to `destination`, replacing any existing file.
///
/// The encoding is streamed into a sibling `.part` file which is renamed over
/// `destination` only once it has been flushed and synced, so a failure never
/// leaves a truncated graph behind.
///
/// # Errors
/// Returns [`StoreError::Io`] when the destination directory is unwritable or
/// any write fails.
#[instrument(
    name = "format.write_graph",
    err,
    skip_all,
    fields(edges = edges.len(), destination = %destination.display()),
)]
pub fn write_graph(
    writer: &dyn GraphWriter,
    edges: &[Edge],
    destination: &Path,
) -> Result<(), StoreError> {
    write_atomic(destination, |out| writer.encode(edges, out))?;
    debug!(extension = writer.extension(), "graph written");
    Ok(())
}

/// Runs `fill` against a buffered `.part` file and renames it onto `path`.
pub(crate) fn write_atomic<F>(path: &Path, fill: F) -> Result<(), StoreError>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let part = part_path(path);
    let outcome = write_part(&part, fill).and_then(|()| fs::rename(&part, path));
    if let Err(source) = outcome {
        match fs::remove_file(&part) {
            Err(cleanup) if cleanup.kind() != io::ErrorKind::NotFound => {
                warn!(part = %part.display(), error = %cleanup, "failed to remove partial file");
            }
            _ => {}
        }
        return Err(StoreError::io(path, source));
    }
    Ok(())
}

fn write_part<F>(part: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let mut out = BufWriter::new(File::create(part)?);
    fill(&mut out)?;
    out.flush()?;
    let file = out.into_inner().map_err(io::IntoInnerError::into_error)?;
    file.sync_all()
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

/// Blank-node identifier for `vertex`.
pub(crate) fn node_id(vertex: usize) -> String {
    format!("id-{vertex}")
}

#[cfg(test)]
mod tests;
