//! Error type for writing, storing and building graphs.

use std::{io, path::PathBuf};

use cfpq_data_core::{GenerationError, GenerationErrorCode};
use thiserror::Error;

/// Errors raised by the store, the format writers and the builder.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// A filesystem operation failed.
    #[error("I/O failure at `{path}`: {source}")]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Graph generation failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// Metadata could not be encoded or decoded.
    #[error("metadata failure at `{path}`: {source}")]
    Metadata {
        /// Sidecar path being written or read.
        path: PathBuf,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
    /// The dataset name cannot be used as a single directory component.
    #[error("dataset name `{name}` must be a non-empty single path component")]
    InvalidDatasetName {
        /// Rejected dataset name.
        name: String,
    },
}

impl StoreError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "STORE_IO_FAILURE",
            Self::Generation(error) => error.code().as_str(),
            Self::Metadata { .. } => "STORE_METADATA_FAILURE",
            Self::InvalidDatasetName { .. } => "STORE_INVALID_DATASET_NAME",
        }
    }

    /// The generator's code when the error originated in generation.
    #[must_use]
    pub const fn generation_code(&self) -> Option<GenerationErrorCode> {
        match self {
            Self::Generation(error) => Some(error.code()),
            _ => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
