//! Caller-owned cache of built graph artefacts.
//!
//! The cache remembers where a parameter pair was last written so repeated
//! requests within its lifetime skip regeneration. There is no process-wide
//! instance; whoever needs caching owns an [`ArtifactCache`] and passes it to
//! the builder.

use std::path::PathBuf;

use cfpq_data_core::ScaleFreeParams;
use dashmap::DashMap;
use tracing::{debug, instrument};

use crate::metadata::GraphMetadata;

/// Files and summary produced for one parameter pair.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GraphArtifact {
    /// Graph file.
    pub path: PathBuf,
    /// JSON sidecar beside the graph file.
    pub metadata_path: PathBuf,
    /// Contents of the sidecar.
    pub metadata: GraphMetadata,
}

/// Thread-safe map from parameter pairs to their artefacts.
///
/// # Examples
/// ```
/// use cfpq_data_core::ScaleFreeParams;
/// use cfpq_data_store::ArtifactCache;
///
/// let cache = ArtifactCache::new();
/// let params = ScaleFreeParams::new(100, 3).expect("valid parameters");
/// assert!(cache.get(&params).is_none());
/// assert!(cache.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct ArtifactCache {
    entries: DashMap<ScaleFreeParams, GraphArtifact>,
}

impl ArtifactCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the artefact cached for `params`.
    #[must_use]
    pub fn get(&self, params: &ScaleFreeParams) -> Option<GraphArtifact> {
        self.entries.get(params).map(|entry| entry.value().clone())
    }

    /// Caches `artifact` for `params`, returning the entry it replaced.
    pub fn insert(&self, params: ScaleFreeParams, artifact: GraphArtifact) -> Option<GraphArtifact> {
        self.entries.insert(params, artifact)
    }

    /// Forgets `params`, returning the evicted artefact.
    pub fn invalidate(&self, params: &ScaleFreeParams) -> Option<GraphArtifact> {
        self.entries.remove(params).map(|(_, artifact)| artifact)
    }

    /// Forgets every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of cached parameter pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the cached artefact for `params`, or runs `build` and caches
    /// its output.
    ///
    /// `build` runs without holding any shard lock, so it may itself use the
    /// cache or run on a rayon pool. When two callers race on the same key
    /// both build and the later insert wins.
    ///
    /// # Errors
    /// Propagates the error returned by `build`; nothing is cached then.
    #[instrument(name = "cache.get_or_try_insert_with", err, skip(self, build), fields(params = %params))]
    pub fn get_or_try_insert_with<F, E>(
        &self,
        params: ScaleFreeParams,
        build: F,
    ) -> Result<GraphArtifact, E>
    where
        F: FnOnce() -> Result<GraphArtifact, E>,
        E: std::fmt::Display,
    {
        if let Some(artifact) = self.get(&params) {
            debug!("cache hit");
            return Ok(artifact);
        }
        let artifact = build()?;
        self.insert(params, artifact.clone());
        Ok(artifact)
    }
}
