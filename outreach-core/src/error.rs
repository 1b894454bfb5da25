//! Error types for the outreach core library.
//!
//! Defines the error enum exposed by the public API, its stable
//! machine-readable codes, and a convenient result alias.

use std::fmt;

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
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
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced by the planning pipeline.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum OutreachError {
    /// The severity bracket token is not one of `alta`, `media`, `baja`, `none`.
    #[error("unrecognised severity bracket `{token}`; expected alta, media, baja or none")]
    InvalidSeverityBracket {
        /// Token supplied by the caller.
        token: String,
    },
    /// A route endpoint does not name a node of the graph.
    #[error("node {node} is out of range for a graph with {node_count} nodes")]
    OutOfRangeNode {
        /// The offending origin or destination index.
        node: usize,
        /// Number of nodes in the graph.
        node_count: usize,
    },
    /// The clustering radius must be finite and non-negative.
    #[error("radius must be a finite, non-negative number of kilometres (got {got})")]
    InvalidRadius {
        /// The rejected radius in kilometres.
        got: f64,
    },
    /// A sanitary-weighted graph was requested but no zone index is configured.
    #[error("sanitary weighting requires a zone index but none was configured")]
    MissingZoneIndex,
}

define_error_codes! {
    /// Stable codes describing [`OutreachError`] variants.
    enum OutreachErrorCode for OutreachError {
        /// The severity bracket token is not recognised.
        InvalidSeverityBracket => InvalidSeverityBracket { .. } => "OUTREACH_INVALID_SEVERITY_BRACKET",
        /// A route endpoint does not name a node of the graph.
        OutOfRangeNode => OutOfRangeNode { .. } => "OUTREACH_OUT_OF_RANGE_NODE",
        /// The clustering radius is negative or not finite.
        InvalidRadius => InvalidRadius { .. } => "OUTREACH_INVALID_RADIUS",
        /// A sanitary-weighted graph was requested without zones.
        MissingZoneIndex => MissingZoneIndex => "OUTREACH_MISSING_ZONE_INDEX",
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, OutreachError>;
