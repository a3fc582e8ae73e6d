//! Error types for scale-free graph generation.
//!
//! Parameter problems are reported before any randomness is consumed; a
//! degenerate sampling distribution is an internal invariant failure that
//! valid parameters never reach.

use std::fmt;

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// A generator parameter was rejected during validation.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParameterError {
    /// The attachment degree must be at least one.
    #[error("vertices_degree must be at least 1")]
    ZeroDegree,
    /// The seed phase needs `vertices_degree` vertices to exist.
    #[error("vertices_degree ({degree}) must not exceed vertices_number ({vertices})")]
    DegreeExceedsVertexCount {
        /// Requested attachment degree.
        degree: usize,
        /// Requested vertex count.
        vertices: usize,
    },
    /// The label alphabet contained no symbols.
    #[error("label alphabet must not be empty")]
    EmptyLabels,
    /// The label alphabet listed the same symbol twice.
    #[error("label `{label}` appears more than once in the alphabet")]
    DuplicateLabel {
        /// The repeated symbol.
        label: String,
    },
    /// A label cannot be used as an RDF predicate local name.
    #[error("label `{label}` is not a valid predicate name")]
    InvalidLabel {
        /// The rejected symbol.
        label: String,
    },
    /// `k * k + (n - k) * k` does not fit in `usize`.
    #[error("edge count for vertices_number={vertices}, vertices_degree={degree} overflows usize")]
    EdgeCountOverflow {
        /// Requested vertex count.
        vertices: usize,
        /// Requested attachment degree.
        degree: usize,
    },
}

/// Error type produced by [`crate::generate`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GenerationError {
    /// The parameters were rejected before generation started.
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),
    /// The candidate pool for a growth vertex could not supply enough weighted
    /// draws.
    #[error(
        "degenerate attachment distribution at vertex {vertex}: total weight {total_weight}, {requested} draws requested"
    )]
    DegenerateDistribution {
        /// Growth vertex whose targets were being sampled.
        vertex: usize,
        /// Aggregate weight remaining when sampling failed.
        total_weight: u64,
        /// Number of distinct targets requested.
        requested: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`GenerationError`] variants.
    enum GenerationErrorCode for GenerationError {
        /// The parameters were rejected before generation started.
        InvalidParameter => InvalidParameter(..) => "SCALE_FREE_INVALID_PARAMETER",
        /// The attachment distribution had no usable weight.
        DegenerateDistribution => DegenerateDistribution { .. } => "SCALE_FREE_DEGENERATE_DISTRIBUTION",
    }
}

/// Convenient alias for results returned by the generator API.
pub type Result<T> = core::result::Result<T, GenerationError>;
