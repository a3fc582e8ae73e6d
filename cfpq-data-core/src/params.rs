//! Generator parameters and the preset parameter grid.

use std::fmt;

use crate::error::ParameterError;

/// Vertex counts enumerated by the preset batch.
pub const PRESET_VERTEX_COUNTS: [usize; 4] = [100, 500, 2_500, 10_000];
/// Attachment degrees enumerated by the preset batch.
pub const PRESET_DEGREES: [usize; 4] = [1, 3, 5, 10];

/// Validated `(vertices_number, vertices_degree)` pair.
///
/// # Examples
/// ```
/// use cfpq_data_core::ScaleFreeParams;
///
/// let params = ScaleFreeParams::new(4, 2).expect("valid parameters");
/// assert_eq!(params.edge_count(), 8);
/// assert_eq!(params.file_stem(), "scale_free_graph_4_2");
/// assert!(ScaleFreeParams::new(5, 7).is_err());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ScaleFreeParams {
    vertices_number: usize,
    vertices_degree: usize,
}

impl ScaleFreeParams {
    /// Validates the pair.
    ///
    /// # Errors
    /// Returns [`ParameterError::ZeroDegree`] when `vertices_degree` is zero,
    /// [`ParameterError::DegreeExceedsVertexCount`] when it exceeds
    /// `vertices_number`, and [`ParameterError::EdgeCountOverflow`] when the
    /// resulting edge count does not fit `usize`.
    pub fn new(vertices_number: usize, vertices_degree: usize) -> Result<Self, ParameterError> {
        if vertices_degree == 0 {
            return Err(ParameterError::ZeroDegree);
        }
        if vertices_degree > vertices_number {
            return Err(ParameterError::DegreeExceedsVertexCount {
                degree: vertices_degree,
                vertices: vertices_number,
            });
        }
        // Every vertex contributes exactly `k` out-edges: k*k seed edges plus
        // k per growth vertex.
        if vertices_number.checked_mul(vertices_degree).is_none() {
            return Err(ParameterError::EdgeCountOverflow {
                vertices: vertices_number,
                degree: vertices_degree,
            });
        }
        Ok(Self {
            vertices_number,
            vertices_degree,
        })
    }

    /// Number of vertices in the generated graph.
    #[must_use]
    #[rustfmt::skip]
    pub const fn vertices_number(&self) -> usize { self.vertices_number }

    /// Number of edges each vertex attaches with.
    #[must_use]
    #[rustfmt::skip]
    pub const fn vertices_degree(&self) -> usize { self.vertices_degree }

    /// Number of edges emitted by the seed phase (`k * k`).
    #[must_use]
    pub const fn seed_edge_count(&self) -> usize {
        self.vertices_degree * self.vertices_degree
    }

    /// Number of edges emitted by the growth phase (`(n - k) * k`).
    #[must_use]
    pub const fn growth_edge_count(&self) -> usize {
        (self.vertices_number - self.vertices_degree) * self.vertices_degree
    }

    /// Total number of generated edges (`k * k + (n - k) * k`).
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.vertices_number * self.vertices_degree
    }

    /// File name stem, `scale_free_graph_{n}_{k}`.
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!(
            "scale_free_graph_{}_{}",
            self.vertices_number, self.vertices_degree
        )
    }
}

impl fmt::Display for ScaleFreeParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},k={}", self.vertices_number, self.vertices_degree)
    }
}

/// Enumerates the preset cross-product of vertex counts and degrees.
///
/// # Examples
/// ```
/// use cfpq_data_core::presets;
///
/// let grid: Vec<_> = presets().collect();
/// assert_eq!(grid.len(), 16);
/// assert_eq!(grid[0].vertices_number(), 100);
/// assert_eq!(grid[0].vertices_degree(), 1);
/// ```
pub fn presets() -> impl Iterator<Item = ScaleFreeParams> {
    PRESET_VERTEX_COUNTS.into_iter().flat_map(|vertices_number| {
        PRESET_DEGREES.into_iter().map(move |vertices_degree| ScaleFreeParams {
            vertices_number,
            vertices_degree,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::minimal(1, 1, 1)]
    #[case::seed_only(3, 3, 9)]
    #[case::concrete(4, 2, 8)]
    #[case::preset(10_000, 10, 100_000)]
    fn edge_count_matches_seed_plus_growth(
        #[case] vertices: usize,
        #[case] degree: usize,
        #[case] expected: usize,
    ) {
        let params = ScaleFreeParams::new(vertices, degree).expect("params must be valid");
        assert_eq!(params.edge_count(), expected);
        assert_eq!(
            params.seed_edge_count() + params.growth_edge_count(),
            expected
        );
    }

    #[test]
    fn zero_degree_is_rejected() {
        assert_eq!(
            ScaleFreeParams::new(10, 0),
            Err(ParameterError::ZeroDegree)
        );
    }

    #[rstest]
    #[case(5, 7)]
    #[case(0, 1)]
    fn degree_above_vertex_count_is_rejected(#[case] vertices: usize, #[case] degree: usize) {
        assert_eq!(
            ScaleFreeParams::new(vertices, degree),
            Err(ParameterError::DegreeExceedsVertexCount { degree, vertices })
        );
    }

    #[test]
    fn overflowing_edge_count_is_rejected() {
        let err = ScaleFreeParams::new(usize::MAX, 2).expect_err("overflow must fail");
        assert!(matches!(err, ParameterError::EdgeCountOverflow { .. }));
    }

    #[test]
    fn presets_cover_the_full_grid_once() {
        let grid: Vec<ScaleFreeParams> = presets().collect();
        assert_eq!(grid.len(), PRESET_VERTEX_COUNTS.len() * PRESET_DEGREES.len());
        for params in &grid {
            assert!(ScaleFreeParams::new(params.vertices_number(), params.vertices_degree()).is_ok());
        }
        let unique: std::collections::HashSet<_> = grid.iter().collect();
        assert_eq!(unique.len(), grid.len());
    }

    #[test]
    fn display_and_stem_name_the_pair() {
        let params = ScaleFreeParams::new(2_500, 5).expect("params must be valid");
        assert_eq!(params.to_string(), "n=2500,k=5");
        assert_eq!(params.file_stem(), "scale_free_graph_2500_5");
    }
}
