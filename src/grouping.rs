//! Ranking and grouping of tracks by estimated similarity.
//!
//! Both operate on signatures computed with one [`SimilarityConfig`].
//! Candidates whose signature length differs from the query's come from a
//! different seed space; they are skipped and logged rather than compared.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Instant;

use log::{info, warn};

use crate::{SimilarityConfig, TrackSignature};

/// One candidate's similarity to a query track.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimilarityMatch {
    /// ID of the candidate track
    pub track_id: String,
    /// Fraction of agreeing signature bits (0.5 ~ unrelated, 1.0 = identical)
    pub agreement: f64,
    /// Estimated Jaccard similarity of the shingle sets
    pub estimated_jaccard: f64,
}

/// A group of similar tracks.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackGroup {
    /// Unique identifier for this group (one of its member IDs)
    pub group_id: String,
    /// All track IDs that belong to this group, in input order
    pub track_ids: Vec<String>,
}

fn compare(query: &TrackSignature, candidate: &TrackSignature) -> Option<SimilarityMatch> {
    let agreement = query.signature.agreement(&candidate.signature);
    let estimated_jaccard = query.similarity(candidate);
    match (agreement, estimated_jaccard) {
        (Some(agreement), Some(estimated_jaccard)) => Some(SimilarityMatch {
            track_id: candidate.track_id.clone(),
            agreement,
            estimated_jaccard,
        }),
        _ => {
            warn!(
                "Skipping {} vs {}: signature lengths {} and {} differ",
                query.track_id,
                candidate.track_id,
                query.signature.len(),
                candidate.signature.len()
            );
            None
        }
    }
}

/// Rank candidates by estimated similarity to `query`, most similar first.
///
/// Only candidates reaching `config.min_similarity` are returned. A
/// candidate with the same ID as the query is skipped.
///
/// # Example
/// ```
/// use track_similarity::{GpsPoint, TrackSignature, SimilarityConfig, rank_similar};
///
/// let config = SimilarityConfig::default();
/// let track: Vec<GpsPoint> = (0..20)
///     .map(|i| GpsPoint::new(51.5074 + i as f64 * 0.001, -0.1278))
///     .collect();
///
/// let query = TrackSignature::from_points("q", &track, &config).unwrap();
/// let same = TrackSignature::from_points("same", &track, &config).unwrap();
///
/// let ranked = rank_similar(&query, &[same], &config);
/// assert_eq!(ranked[0].track_id, "same");
/// assert_eq!(ranked[0].agreement, 1.0);
/// ```
pub fn rank_similar(
    query: &TrackSignature,
    candidates: &[TrackSignature],
    config: &SimilarityConfig,
) -> Vec<SimilarityMatch> {
    let mut matches: Vec<SimilarityMatch> = candidates
        .iter()
        .filter(|c| c.track_id != query.track_id)
        .filter_map(|c| compare(query, c))
        .filter(|m| m.estimated_jaccard >= config.min_similarity)
        .collect();

    matches.sort_by(|a, b| {
        b.agreement
            .partial_cmp(&a.agreement)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.track_id.cmp(&b.track_id))
    });
    matches
}

fn should_group(sig1: &TrackSignature, sig2: &TrackSignature, config: &SimilarityConfig) -> bool {
    compare(sig1, sig2).is_some_and(|m| m.estimated_jaccard >= config.min_similarity)
}

/// Group tracks whose estimated similarity reaches `config.min_similarity`.
///
/// Similarity is treated as transitive: if A matches B and B matches C, all
/// three end up in one group (Union-Find over matching pairs). Groups are
/// returned in order of their first member's position in the input.
///
/// # Example
/// ```
/// use track_similarity::{GpsPoint, TrackSignature, SimilarityConfig, group_signatures};
///
/// let config = SimilarityConfig::default();
/// let london: Vec<GpsPoint> = (0..20)
///     .map(|i| GpsPoint::new(51.5074 + i as f64 * 0.001, -0.1278))
///     .collect();
/// let nyc: Vec<GpsPoint> = (0..20)
///     .map(|i| GpsPoint::new(40.7128 + i as f64 * 0.001, -74.0060))
///     .collect();
///
/// let sigs = vec![
///     TrackSignature::from_points("a", &london, &config).unwrap(),
///     TrackSignature::from_points("b", &london, &config).unwrap(),
///     TrackSignature::from_points("c", &nyc, &config).unwrap(),
/// ];
///
/// let groups = group_signatures(&sigs, &config);
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].track_ids, vec!["a", "b"]);
/// ```
pub fn group_signatures(signatures: &[TrackSignature], config: &SimilarityConfig) -> Vec<TrackGroup> {
    if signatures.is_empty() {
        return vec![];
    }

    let start = Instant::now();

    let mut parent: HashMap<String, String> = signatures
        .iter()
        .map(|s| (s.track_id.clone(), s.track_id.clone()))
        .collect();

    for (i, sig1) in signatures.iter().enumerate() {
        for sig2 in &signatures[i + 1..] {
            if sig1.track_id != sig2.track_id && should_group(sig1, sig2, config) {
                union(&mut parent, &sig1.track_id, &sig2.track_id);
            }
        }
    }

    let groups = build_groups(signatures, &mut parent);
    info!(
        "Grouped {} signatures into {} groups in {:?}",
        signatures.len(),
        groups.len(),
        start.elapsed()
    );
    groups
}

/// Group signatures using parallel processing.
///
/// This is the same as [`group_signatures`] but uses rayon for parallel
/// comparison of track pairs.
#[cfg(feature = "parallel")]
pub fn group_signatures_parallel(
    signatures: &[TrackSignature],
    config: &SimilarityConfig,
) -> Vec<TrackGroup> {
    use rayon::prelude::*;

    if signatures.is_empty() {
        return vec![];
    }

    let start = Instant::now();

    // Find matches in parallel
    let matches: Vec<(&str, &str)> = signatures
        .par_iter()
        .enumerate()
        .flat_map(|(i, sig1)| {
            signatures[i + 1..]
                .iter()
                .filter(|sig2| sig1.track_id != sig2.track_id && should_group(sig1, sig2, config))
                .map(|sig2| (sig1.track_id.as_str(), sig2.track_id.as_str()))
                .collect::<Vec<_>>()
        })
        .collect();

    // Union-Find (sequential - fast enough)
    let mut parent: HashMap<String, String> = signatures
        .iter()
        .map(|s| (s.track_id.clone(), s.track_id.clone()))
        .collect();

    for (id1, id2) in matches {
        union(&mut parent, id1, id2);
    }

    let groups = build_groups(signatures, &mut parent);
    info!(
        "Grouped {} signatures into {} groups in {:?} (parallel)",
        signatures.len(),
        groups.len(),
        start.elapsed()
    );
    groups
}

fn build_groups(signatures: &[TrackSignature], parent: &mut HashMap<String, String>) -> Vec<TrackGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<String>> = HashMap::new();

    for sig in signatures {
        let root = find(parent, &sig.track_id);
        let members = groups.entry(root.clone()).or_insert_with(|| {
            order.push(root);
            Vec::new()
        });
        if !members.contains(&sig.track_id) {
            members.push(sig.track_id.clone());
        }
    }

    order
        .into_iter()
        .filter_map(|group_id| {
            let track_ids = groups.remove(&group_id)?;
            Some(TrackGroup { group_id, track_ids })
        })
        .collect()
}

fn find(parent: &mut HashMap<String, String>, id: &str) -> String {
    let current = parent.get(id).cloned().unwrap_or_else(|| id.to_string());
    if current == id {
        return id.to_string();
    }
    let root = find(parent, &current);
    parent.insert(id.to_string(), root.clone());
    root
}

fn union(parent: &mut HashMap<String, String>, id1: &str, id2: &str) {
    let root1 = find(parent, id1);
    let root2 = find(parent, id2);
    if root1 != root2 {
        parent.insert(root2, root1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GpsPoint, Signature};

    fn north_track(start_lat: f64, lng: f64, count: usize) -> Vec<GpsPoint> {
        (0..count)
            .map(|i| GpsPoint::new(start_lat + i as f64 * 0.001, lng))
            .collect()
    }

    fn sig(id: &str, points: &[GpsPoint], config: &SimilarityConfig) -> TrackSignature {
        TrackSignature::from_points(id, points, config).unwrap()
    }

    #[test]
    fn test_rank_similar_orders_by_similarity() {
        let config = SimilarityConfig { components: 1024, min_similarity: 0.0, ..Default::default() };
        let full = north_track(51.5074, -0.1278, 60);

        let query = sig("query", &full, &config);
        let candidates = vec![
            sig("half", &full[..30], &config),
            sig("elsewhere", &north_track(40.7128, -74.0060, 60), &config),
            sig("same", &full, &config),
        ];

        let ranked = rank_similar(&query, &candidates, &config);
        assert_eq!(ranked[0].track_id, "same");
        assert_eq!(ranked[0].estimated_jaccard, 1.0);
        assert_eq!(ranked[1].track_id, "half");
        assert!(ranked[1].agreement > ranked[2].agreement);
    }

    #[test]
    fn test_rank_similar_applies_threshold_and_skips_self() {
        let config = SimilarityConfig::default();
        let track = north_track(51.5074, -0.1278, 20);

        let query = sig("query", &track, &config);
        let candidates = vec![
            sig("query", &track, &config),
            sig("elsewhere", &north_track(40.7128, -74.0060, 20), &config),
        ];

        assert!(rank_similar(&query, &candidates, &config).is_empty());
    }

    #[test]
    fn test_rank_similar_skips_mismatched_lengths() {
        let config = SimilarityConfig { min_similarity: 0.0, ..Default::default() };
        let track = north_track(51.5074, -0.1278, 20);
        let query = sig("query", &track, &config);

        let mut odd = sig("odd", &track, &config);
        odd.signature = Signature::from_bits(&[1, 0, 1]).unwrap();

        assert!(rank_similar(&query, &[odd], &config).is_empty());
    }

    #[test]
    fn test_group_signatures() {
        let config = SimilarityConfig::default();
        let london = north_track(51.5074, -0.1278, 20);
        let paris = north_track(48.8566, 2.3522, 20);

        let sigs = vec![
            sig("test-1", &london, &config),
            sig("test-3", &paris, &config),
            sig("test-2", &london, &config),
        ];

        let groups = group_signatures(&sigs, &config);

        // Should have 2 groups: one with test-1 and test-2, one with test-3
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].track_ids, vec!["test-1", "test-2"]);
        assert_eq!(groups[1].track_ids, vec!["test-3"]);
        assert_eq!(groups[1].group_id, "test-3");
    }

    #[test]
    fn test_group_signatures_transitive() {
        let config = SimilarityConfig { components: 1024, min_similarity: 0.15, ..Default::default() };
        let full = north_track(51.5074, -0.1278, 60);

        // first and last share no shingles, but each overlaps the middle one
        let sigs = vec![
            sig("first", &full[..30], &config),
            sig("last", &full[30..], &config),
            sig("middle", &full[15..45], &config),
        ];

        let groups = group_signatures(&sigs, &config);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].track_ids, vec!["first", "last", "middle"]);
    }

    #[test]
    fn test_group_signatures_empty() {
        assert!(group_signatures(&[], &SimilarityConfig::default()).is_empty());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_group_parallel_matches_sequential() {
        let config = SimilarityConfig::default();
        let sigs: Vec<TrackSignature> = (0..30)
            .map(|i| {
                let lat = 40.0 + (i % 5) as f64;
                sig(&format!("t{:02}", i), &north_track(lat, -0.1278, 20), &config)
            })
            .collect();

        let sequential = group_signatures(&sigs, &config);
        let parallel = group_signatures_parallel(&sigs, &config);
        assert_eq!(sequential, parallel);
        assert_eq!(sequential.len(), 5);
    }
}
