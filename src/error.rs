//! Error types for signature computation.
//!
//! Every error aborts the computation for a single track only. Batch
//! operations in [`crate::batch`] collect these per track and keep going.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, SimilarityError>;

/// Errors that can occur while turning a track into a signature.
///
/// Equality compares coordinates bitwise, so an error carrying a NaN
/// coordinate still equals its own clone.
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimilarityError {
    /// A sample has a non-finite or out-of-range coordinate.
    #[error("invalid coordinate at sample {index}: ({latitude}, {longitude})")]
    InvalidCoordinate {
        index: usize,
        latitude: f64,
        longitude: f64,
    },

    /// No shingles to take a minimum over. For a track this means the
    /// deduplicated geohash sequence is shorter than the shingle size.
    #[error("empty shingle set")]
    EmptyShingleSet,

    /// Geohash precision outside `1..=12`.
    #[error("geohash precision must be between 1 and 12, got {0}")]
    InvalidPrecision(usize),

    /// Shingle size of zero.
    #[error("shingle size must be at least 1, got {0}")]
    InvalidShingleSize(usize),

    /// Signature with zero components.
    #[error("signature must have at least one component, got {0}")]
    InvalidComponents(usize),

    /// Character outside the geohash base32 alphabet.
    #[error("invalid geohash character {0:?}")]
    InvalidGeohash(char),

    /// Signature bit that is neither 0 nor 1.
    #[error("signature bits must be 0 or 1, got {0}")]
    InvalidSignatureBit(u8),

    /// Flat coordinate buffer whose length is not a multiple of two.
    #[error("flat coordinate buffer must hold lat/lng pairs, got {0} values")]
    OddCoordinateCount(usize),
}

impl PartialEq for SimilarityError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::InvalidCoordinate {
                    index: i1,
                    latitude: lat1,
                    longitude: lng1,
                },
                Self::InvalidCoordinate {
                    index: i2,
                    latitude: lat2,
                    longitude: lng2,
                },
            ) => i1 == i2 && lat1.to_bits() == lat2.to_bits() && lng1.to_bits() == lng2.to_bits(),
            (Self::EmptyShingleSet, Self::EmptyShingleSet) => true,
            (Self::InvalidPrecision(a), Self::InvalidPrecision(b)) => a == b,
            (Self::InvalidShingleSize(a), Self::InvalidShingleSize(b)) => a == b,
            (Self::InvalidComponents(a), Self::InvalidComponents(b)) => a == b,
            (Self::InvalidGeohash(a), Self::InvalidGeohash(b)) => a == b,
            (Self::InvalidSignatureBit(a), Self::InvalidSignatureBit(b)) => a == b,
            (Self::OddCoordinateCount(a), Self::OddCoordinateCount(b)) => a == b,
            _ => false,
        }
    }
}

impl SimilarityError {
    /// Short machine-readable name of the error kind, used in log lines and
    /// batch failure summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCoordinate { .. } => "invalid_coordinate",
            Self::EmptyShingleSet => "empty_shingle_set",
            Self::InvalidPrecision(_) => "invalid_precision",
            Self::InvalidShingleSize(_) => "invalid_shingle_size",
            Self::InvalidComponents(_) => "invalid_components",
            Self::InvalidGeohash(_) => "invalid_geohash",
            Self::InvalidSignatureBit(_) => "invalid_signature_bit",
            Self::OddCoordinateCount(_) => "odd_coordinate_count",
        }
    }
}
