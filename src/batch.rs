//! Batch signature computation.
//!
//! Each track is independent: a failure aborts that track only, and the
//! batch reports which tracks failed and why alongside the signatures that
//! succeeded. With the `parallel` feature the work is spread over rayon's
//! thread pool; the only shared input is the read-only config.

use std::time::Instant;

use log::{info, warn};

use crate::{GpsPoint, Result, SimilarityConfig, SimilarityError, TrackSignature};

/// Input for batch signature creation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpsTrack {
    pub track_id: String,
    pub points: Vec<GpsPoint>,
}

impl GpsTrack {
    pub fn new(track_id: impl Into<String>, points: Vec<GpsPoint>) -> Self {
        Self {
            track_id: track_id.into(),
            points,
        }
    }

    /// Build a track from a flat coordinate buffer `[lat1, lng1, lat2, lng2, ...]`.
    ///
    /// Fails with [`SimilarityError::OddCoordinateCount`] if the buffer does
    /// not hold whole pairs.
    pub fn from_flat(track_id: impl Into<String>, coords: &[f64]) -> Result<Self> {
        if coords.len() % 2 != 0 {
            return Err(SimilarityError::OddCoordinateCount(coords.len()));
        }
        let points = coords
            .chunks_exact(2)
            .map(|chunk| GpsPoint::new(chunk[0], chunk[1]))
            .collect();
        Ok(Self::new(track_id, points))
    }
}

/// A track whose signature could not be computed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackFailure {
    pub track_id: String,
    pub error: SimilarityError,
}

/// Outcome of a batch: successes and failures, each in input order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchResult {
    pub signatures: Vec<TrackSignature>,
    pub failures: Vec<TrackFailure>,
}

impl BatchResult {
    fn from_results(results: Vec<(String, Result<TrackSignature>)>) -> Self {
        let mut batch = BatchResult::default();
        for (track_id, result) in results {
            match result {
                Ok(sig) => batch.signatures.push(sig),
                Err(error) => {
                    warn!("Track {} skipped: {} ({})", track_id, error, error.kind());
                    batch.failures.push(TrackFailure { track_id, error });
                }
            }
        }
        batch
    }

    /// Total number of tracks processed.
    pub fn total(&self) -> usize {
        self.signatures.len() + self.failures.len()
    }

    /// True if every track produced a signature.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compute signatures for many tracks sequentially.
///
/// # Example
/// ```
/// use track_similarity::{GpsPoint, GpsTrack, SimilarityConfig, compute_signatures_batch};
///
/// let good: Vec<GpsPoint> = (0..20)
///     .map(|i| GpsPoint::new(51.5074 + i as f64 * 0.001, -0.1278))
///     .collect();
/// let too_short = vec![GpsPoint::new(51.5074, -0.1278)];
///
/// let tracks = vec![GpsTrack::new("good", good), GpsTrack::new("short", too_short)];
/// let result = compute_signatures_batch(&tracks, &SimilarityConfig::default());
///
/// assert_eq!(result.signatures.len(), 1);
/// assert_eq!(result.failures[0].track_id, "short");
/// ```
pub fn compute_signatures_batch(tracks: &[GpsTrack], config: &SimilarityConfig) -> BatchResult {
    let start = Instant::now();

    let results: Vec<(String, Result<TrackSignature>)> = tracks
        .iter()
        .map(|track| {
            (
                track.track_id.clone(),
                TrackSignature::from_points(&track.track_id, &track.points, config),
            )
        })
        .collect();

    let batch = BatchResult::from_results(results);
    info!(
        "Created {} signatures from {} tracks ({} failed) in {:?}",
        batch.signatures.len(),
        tracks.len(),
        batch.failures.len(),
        start.elapsed()
    );
    batch
}

/// Compute signatures for many tracks in parallel.
///
/// Same output as [`compute_signatures_batch`], including ordering.
/// Recommended for large datasets (100+ tracks).
#[cfg(feature = "parallel")]
pub fn compute_signatures_parallel(tracks: &[GpsTrack], config: &SimilarityConfig) -> BatchResult {
    use rayon::prelude::*;

    let start = Instant::now();

    let results: Vec<(String, Result<TrackSignature>)> = tracks
        .par_iter()
        .map(|track| {
            (
                track.track_id.clone(),
                TrackSignature::from_points(&track.track_id, &track.points, config),
            )
        })
        .collect();

    let batch = BatchResult::from_results(results);
    info!(
        "Created {} signatures from {} tracks ({} failed) in {:?} (parallel)",
        batch.signatures.len(),
        tracks.len(),
        batch.failures.len(),
        start.elapsed()
    );
    batch
}
