//! # Track Similarity
//!
//! Approximate GPS track similarity using geohash shingles and 1-bit minhash.
//!
//! This library provides:
//! - Geohash encoding of GPS tracks into cell sequences
//! - Shingling of cell sequences with dwell-time deduplication
//! - Compact 1-bit minhash signatures estimating Jaccard similarity
//! - Batch signature computation with per-track failure reporting
//! - Ranking and grouping of tracks by estimated similarity
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel processing with rayon
//! - **`serde`** - Derive `Serialize`/`Deserialize` on public data types
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use track_similarity::{GpsPoint, TrackSignature, SimilarityConfig};
//!
//! // A short walk along a street, one sample every ~100m
//! let track: Vec<GpsPoint> = (0..20)
//!     .map(|i| GpsPoint::new(51.5074 + i as f64 * 0.001, -0.1278))
//!     .collect();
//!
//! let config = SimilarityConfig::default();
//! let sig1 = TrackSignature::from_points("activity-1", &track, &config).unwrap();
//! let sig2 = TrackSignature::from_points("activity-2", &track, &config).unwrap();
//!
//! assert_eq!(sig1.similarity(&sig2), Some(1.0));
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! points -> geohash cells -> dedup -> shingles (set) -> 1-bit minhash
//! ```
//!
//! Nothing is cached between calls; every signature is derived fresh from
//! the points handed in.

use std::collections::HashSet;

use log::debug;

// Unified error handling
pub mod error;
pub use error::{Result, SimilarityError};

// Sliding windows over any iterator
pub mod window;
pub use window::{window, WindowExt, Windows};

// Geohash encoding of points and tracks
pub mod geohash;

// Shingle extraction from symbol sequences
pub mod shingles;
pub use shingles::{dedup_consecutive, make_shingles};

// 1-bit minhash signatures
pub mod minhash;
pub use minhash::{OneBitMinHasher, Signature, DEFAULT_COMPONENTS};

// Common-prefix length of strings
pub mod prefix;
pub use prefix::common_prefix_len;

// Batch signature computation
pub mod batch;
#[cfg(feature = "parallel")]
pub use batch::compute_signatures_parallel;
pub use batch::{compute_signatures_batch, BatchResult, GpsTrack, TrackFailure};

// Similarity ranking and grouping
pub mod grouping;
#[cfg(feature = "parallel")]
pub use grouping::group_signatures_parallel;
pub use grouping::{group_signatures, rank_similar, SimilarityMatch, TrackGroup};

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use track_similarity::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Configuration for signature computation and comparison.
///
/// Signatures are only comparable when computed with the same
/// `geohash_precision`, `shingle_size` and `components`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimilarityConfig {
    /// Geohash length per sample. Larger values give finer cells but make
    /// signatures more sensitive to GPS noise.
    /// Default: 7 (~153m cells)
    pub geohash_precision: usize,

    /// Number of consecutive distinct cells per shingle.
    /// Default: 3
    pub shingle_size: usize,

    /// Number of minhash components (signature bits).
    /// Default: 256
    pub components: usize,

    /// Minimum estimated Jaccard similarity for ranking and grouping.
    /// Default: 0.5
    pub min_similarity: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            geohash_precision: 7,
            shingle_size: 3,
            components: DEFAULT_COMPONENTS,
            min_similarity: 0.5,
        }
    }
}

impl SimilarityConfig {
    /// Check the signature parameters, returning the hasher they describe.
    pub fn hasher(&self) -> Result<OneBitMinHasher> {
        if self.geohash_precision == 0 || self.geohash_precision > geohash::MAX_PRECISION {
            return Err(SimilarityError::InvalidPrecision(self.geohash_precision));
        }
        if self.shingle_size == 0 {
            return Err(SimilarityError::InvalidShingleSize(self.shingle_size));
        }
        OneBitMinHasher::new(self.components)
    }
}

/// A track's signature together with the data needed to interpret it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackSignature {
    /// Unique identifier for the activity/track
    pub track_id: String,
    /// 1-bit minhash signature of the track's shingle set
    pub signature: Signature,
    /// Number of distinct shingles the signature was computed from
    pub shingle_count: usize,
    /// Geohash cell of the first sample
    pub start_cell: String,
}

impl TrackSignature {
    /// Compute the signature of a track.
    ///
    /// Fails with [`SimilarityError::InvalidCoordinate`] if any sample is
    /// invalid and with [`SimilarityError::EmptyShingleSet`] if the track
    /// visits fewer distinct consecutive cells than `shingle_size`.
    ///
    /// # Example
    /// ```
    /// use track_similarity::{GpsPoint, TrackSignature, SimilarityConfig, SimilarityError};
    ///
    /// let config = SimilarityConfig::default();
    ///
    /// // Standing still: a single cell, no shingles
    /// let idle = vec![GpsPoint::new(51.5074, -0.1278); 50];
    /// let err = TrackSignature::from_points("idle", &idle, &config).unwrap_err();
    /// assert_eq!(err, SimilarityError::EmptyShingleSet);
    /// ```
    pub fn from_points(track_id: &str, points: &[GpsPoint], config: &SimilarityConfig) -> Result<Self> {
        let hasher = config.hasher()?;

        let cells = geohash::encode_track(points, config.geohash_precision)?;
        let shingles = make_shingles(&cells, config.shingle_size);

        if shingles.is_empty() {
            debug!(
                "Track {}: {} distinct cells, need {} for a shingle",
                track_id,
                shingles::distinct_run_count(&cells),
                config.shingle_size
            );
            return Err(SimilarityError::EmptyShingleSet);
        }

        let signature = hasher.signature(&shingles)?;
        debug!(
            "Track {}: {} samples -> {} shingles -> {} bit signature",
            track_id,
            points.len(),
            shingles.len(),
            signature.len()
        );

        Ok(Self {
            track_id: track_id.to_string(),
            signature,
            shingle_count: shingles.len(),
            start_cell: cells.first().cloned().unwrap_or_default(),
        })
    }

    /// Estimated Jaccard similarity to another track, or `None` if the two
    /// signatures were computed with different component counts.
    pub fn similarity(&self, other: &TrackSignature) -> Option<f64> {
        self.signature.estimated_jaccard(&other.signature)
    }

    /// Length of the common geohash prefix of the two tracks' start cells.
    ///
    /// A long shared prefix means the tracks start close to each other.
    pub fn shared_start_prefix(&self, other: &TrackSignature) -> usize {
        common_prefix_len(&self.start_cell, &other.start_cell)
    }
}

// ============================================================================
// Core Functions
// ============================================================================

/// Compute the shingle set of a track: geohash every sample, collapse
/// consecutive repeats and take all windows of `shingle_size` cells.
pub fn track_shingles(
    points: &[GpsPoint],
    geohash_precision: usize,
    shingle_size: usize,
) -> Result<HashSet<String>> {
    if shingle_size == 0 {
        return Err(SimilarityError::InvalidShingleSize(shingle_size));
    }
    let cells = geohash::encode_track(points, geohash_precision)?;
    Ok(make_shingles(&cells, shingle_size))
}

/// Compute the 1-bit minhash signature of a track.
///
/// This is the functional entry point of the library; [`TrackSignature`]
/// wraps the same computation with an identifier.
///
/// # Example
/// ```
/// use track_similarity::{GpsPoint, compute_signature};
///
/// let track: Vec<GpsPoint> = (0..10)
///     .map(|i| GpsPoint::new(40.7128 + i as f64 * 0.002, -74.0060))
///     .collect();
///
/// let sig = compute_signature(&track, 7, 3, 128).unwrap();
/// assert_eq!(sig.len(), 128);
/// ```
pub fn compute_signature(
    points: &[GpsPoint],
    geohash_precision: usize,
    shingle_size: usize,
    components: usize,
) -> Result<Signature> {
    let hasher = OneBitMinHasher::new(components)?;
    let shingles = track_shingles(points, geohash_precision, shingle_size)?;
    if shingles.is_empty() {
        return Err(SimilarityError::EmptyShingleSet);
    }
    hasher.signature(&shingles)
}

// ============================================================================
// Tests
// ============================================================================
