//! Error types for linkage parsing and validation.
//!
//! Defines [`LinkageError`], its stable [`LinkageErrorCode`] and the
//! [`define_error_codes!`](crate::define_error_codes) macro shared with the
//! rendering crate.

use std::io;

use thiserror::Error;

/// Generates a `Copy` error-code enum for an error type together with
/// `as_str`, `Display` and a `code()` accessor on the error.
#[macro_export]
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

        impl ::core::fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
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

/// Errors raised while reading or validating a linkage matrix.
///
/// Parse failures carry the 1-based line number of the offending input line.
/// Validation failures carry the 0-based index of the offending row.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LinkageError {
    /// The underlying reader failed.
    #[error("failed to read linkage data: {source}")]
    Read {
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A line did not contain exactly four fields.
    #[error("line {line}: expected 4 fields but found {found}")]
    FieldCount {
        /// 1-based line number.
        line: usize,
        /// Number of whitespace-separated fields on the line.
        found: usize,
    },
    /// A field could not be parsed as a number.
    #[error("line {line}, column {column}: `{token}` is not a number")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// 1-based column (field) index.
        column: usize,
        /// The offending token.
        token: String,
    },
    /// The input contained no rows.
    #[error("linkage matrix contains no rows; at least two observations are required")]
    Empty,
    /// A cluster id was negative, fractional or non-finite.
    #[error("row {row}: cluster id {value} is not a non-negative integer")]
    InvalidClusterId {
        /// 0-based row index.
        row: usize,
        /// Raw value read from the input.
        value: f64,
    },
    /// A row referenced a cluster that is only formed by itself or a later row.
    #[error("row {row}: cluster id {id} is not formed yet (ids must be below {limit})")]
    ForwardReference {
        /// 0-based row index.
        row: usize,
        /// Referenced cluster id.
        id: usize,
        /// Exclusive upper bound on ids valid for this row.
        limit: usize,
    },
    /// A cluster was merged by more than one row.
    #[error("row {row}: cluster id {id} was already merged by row {previous}")]
    ClusterReused {
        /// 0-based row index.
        row: usize,
        /// Cluster id merged twice.
        id: usize,
        /// Row that merged the cluster first.
        previous: usize,
    },
    /// A row merged a cluster with itself.
    #[error("row {row}: cluster id {id} cannot be merged with itself")]
    SelfMerge {
        /// 0-based row index.
        row: usize,
        /// Cluster id on both sides of the merge.
        id: usize,
    },
    /// A merge distance was negative or non-finite.
    #[error("row {row}: distance {distance} must be finite and non-negative")]
    InvalidDistance {
        /// 0-based row index.
        row: usize,
        /// Offending distance.
        distance: f64,
    },
    /// A cluster size was negative, fractional or non-finite.
    #[error("row {row}: cluster size {value} is not a non-negative integer")]
    InvalidSize {
        /// 0-based row index.
        row: usize,
        /// Raw value read from the input.
        value: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`LinkageError`] variants.
    enum LinkageErrorCode for LinkageError {
        /// The underlying reader failed.
        Read => Read { .. } => "LINKAGE_READ",
        /// A line did not contain exactly four fields.
        FieldCount => FieldCount { .. } => "LINKAGE_FIELD_COUNT",
        /// A field could not be parsed as a number.
        InvalidNumber => InvalidNumber { .. } => "LINKAGE_INVALID_NUMBER",
        /// The input contained no rows.
        Empty => Empty => "LINKAGE_EMPTY",
        /// A cluster id was not a non-negative integer.
        InvalidClusterId => InvalidClusterId { .. } => "LINKAGE_INVALID_CLUSTER_ID",
        /// A row referenced a cluster that was not formed yet.
        ForwardReference => ForwardReference { .. } => "LINKAGE_FORWARD_REFERENCE",
        /// A cluster was merged by more than one row.
        ClusterReused => ClusterReused { .. } => "LINKAGE_CLUSTER_REUSED",
        /// A row merged a cluster with itself.
        SelfMerge => SelfMerge { .. } => "LINKAGE_SELF_MERGE",
        /// A merge distance was negative or non-finite.
        InvalidDistance => InvalidDistance { .. } => "LINKAGE_INVALID_DISTANCE",
        /// A cluster size was not a non-negative integer.
        InvalidSize => InvalidSize { .. } => "LINKAGE_INVALID_SIZE",
    }
}

impl LinkageError {
    /// Returns `true` when the error stems from malformed text rather than an
    /// inconsistent merge history.
    #[must_use]
    pub const fn is_syntax(&self) -> bool {
        matches!(
            self,
            Self::FieldCount { .. } | Self::InvalidNumber { .. } | Self::Read { .. }
        )
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, LinkageError>;
