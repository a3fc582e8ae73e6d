//! On-disk layout: one directory per dataset under a data root.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, instrument};

use crate::error::StoreError;
use crate::format::write_atomic;
use crate::metadata::GraphMetadata;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "CFPQ_DATA_DIR";

const APP_DIR: &str = "cfpq-data";

/// Dataset directories and metadata sidecars beneath a root directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GraphStore {
    root: PathBuf,
}

impl GraphStore {
    /// Creates a store rooted at `root`. Nothing is created until a dataset
    /// directory is allocated.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a store rooted at [`default_data_dir`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(default_data_dir())
    }

    /// Root directory of the store.
    #[must_use]
    #[rustfmt::skip]
    pub fn root(&self) -> &Path { &self.root }

    /// Returns the directory for `dataset_name`, creating it when absent.
    ///
    /// Concurrent callers asking for the same dataset all succeed.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidDatasetName`] unless `dataset_name` is a
    /// single normal path component, and [`StoreError::Io`] when the directory
    /// cannot be created.
    #[instrument(name = "store.allocate_directory", err, skip(self), fields(root = %self.root.display()))]
    pub fn allocate_directory(&self, dataset_name: &str) -> Result<PathBuf, StoreError> {
        validate_dataset_name(dataset_name)?;
        let directory = self.root.join(dataset_name);
        fs::create_dir_all(&directory).map_err(|source| StoreError::io(&directory, source))?;
        debug!(directory = %directory.display(), "dataset directory ready");
        Ok(directory)
    }

    /// Writes `metadata` as pretty JSON beside `graph_path` and returns the
    /// sidecar path, `{stem}.json`.
    ///
    /// # Errors
    /// Returns [`StoreError::Metadata`] if encoding fails and
    /// [`StoreError::Io`] if the sidecar cannot be written.
    #[instrument(
        name = "store.record",
        err,
        skip_all,
        fields(graph = %graph_path.display()),
    )]
    pub fn record(
        &self,
        graph_path: &Path,
        metadata: &GraphMetadata,
    ) -> Result<PathBuf, StoreError> {
        let sidecar = metadata_path(graph_path);
        let encoded =
            serde_json::to_vec_pretty(metadata).map_err(|source| StoreError::Metadata {
                path: sidecar.clone(),
                source,
            })?;
        write_atomic(&sidecar, |out| {
            out.write_all(&encoded)?;
            out.write_all(b"\n")
        })?;
        Ok(sidecar)
    }

    /// Reads the sidecar recorded for `graph_path`.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] if the sidecar cannot be read and
    /// [`StoreError::Metadata`] if it does not decode.
    pub fn load_metadata(&self, graph_path: &Path) -> Result<GraphMetadata, StoreError> {
        let sidecar = metadata_path(graph_path);
        let bytes = fs::read(&sidecar).map_err(|source| StoreError::io(&sidecar, source))?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Metadata {
            path: sidecar,
            source,
        })
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Sidecar path recorded for `graph_path`.
#[must_use]
pub fn metadata_path(graph_path: &Path) -> PathBuf {
    graph_path.with_extension("json")
}

/// Resolves the data root from the process environment.
///
/// The first of `CFPQ_DATA_DIR`, `$XDG_DATA_HOME/cfpq-data` and
/// `$HOME/.local/share/cfpq-data` that is set and non-empty wins; the system
/// temporary directory is the last resort.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    resolve_data_dir(|key| env::var_os(key))
}

fn resolve_data_dir<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<OsString>,
{
    let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty()).map(PathBuf::from);
    if let Some(root) = non_empty(DATA_DIR_ENV) {
        return root;
    }
    if let Some(data_home) = non_empty("XDG_DATA_HOME") {
        return data_home.join(APP_DIR);
    }
    if let Some(home) = non_empty("HOME") {
        return home.join(".local").join("share").join(APP_DIR);
    }
    env::temp_dir().join(APP_DIR)
}

fn validate_dataset_name(name: &str) -> Result<(), StoreError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(component)), None) if component == name => Ok(()),
        _ => Err(StoreError::InvalidDatasetName {
            name: name.to_owned(),
        }),
    }
}
