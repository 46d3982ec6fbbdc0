//! Example of batch signature computation and grouping.
//!
//! Run with: cargo run --example batch_grouping --features parallel

use std::time::Instant;

use track_similarity::{
    compute_signatures_parallel, group_signatures_parallel, rank_similar, GpsPoint, GpsTrack,
    SimilarityConfig,
};

fn main() {
    println!("Batch Track Grouping Example\n");

    let base_london = straight_track(51.5074, -0.1278, 30);
    let base_paris = straight_track(48.8566, 2.3522, 30);
    let base_nyc = straight_track(40.7128, -74.0060, 30);

    let mut tracks = Vec::new();

    // London: 3 noisy recordings of the same route
    for i in 0..3 {
        tracks.push(GpsTrack::new(format!("london-{}", i), add_noise(&base_london, 0.00005 * i as f64)));
    }
    // Paris: 3 recordings
    for i in 0..3 {
        tracks.push(GpsTrack::new(format!("paris-{}", i), add_noise(&base_paris, 0.00005 * i as f64)));
    }
    // NYC: 2 recordings
    for i in 0..2 {
        tracks.push(GpsTrack::new(format!("nyc-{}", i), add_noise(&base_nyc, 0.00005 * i as f64)));
    }
    // Broken recordings
    tracks.push(GpsTrack::new("gps-dropout", vec![GpsPoint::new(f64::NAN, 0.0); 5]));
    tracks.push(GpsTrack::new("too-short", base_london[..2].to_vec()));

    let config = SimilarityConfig::default();

    let start = Instant::now();
    let batch = compute_signatures_parallel(&tracks, &config);
    println!(
        "Computed {} signatures ({} failed) in {:?}\n",
        batch.signatures.len(),
        batch.failures.len(),
        start.elapsed()
    );

    for failure in &batch.failures {
        println!("  {} failed: {}", failure.track_id, failure.error);
    }

    let start = Instant::now();
    let groups = group_signatures_parallel(&batch.signatures, &config);
    println!("\nGrouping completed in {:?}", start.elapsed());
    println!("Found {} groups:\n", groups.len());

    for group in &groups {
        println!("  Group '{}': {:?}", group.group_id, group.track_ids);
    }

    if let Some(query) = batch.signatures.first() {
        println!("\nMost similar to {}:", query.track_id);
        for m in rank_similar(query, &batch.signatures, &config) {
            println!("  {} (jaccard ~{:.2})", m.track_id, m.estimated_jaccard);
        }
    }
}

/// A straight track heading north, one sample every ~110m
fn straight_track(lat: f64, lng: f64, count: usize) -> Vec<GpsPoint> {
    (0..count)
        .map(|i| GpsPoint::new(lat + i as f64 * 0.001, lng))
        .collect()
}

/// Add small noise to track points to simulate GPS variation
fn add_noise(track: &[GpsPoint], noise: f64) -> Vec<GpsPoint> {
    track
        .iter()
        .enumerate()
        .map(|(i, p)| {
            GpsPoint::new(
                p.latitude + noise * (i as f64 % 2.0 - 0.5),
                p.longitude + noise * ((i + 1) as f64 % 2.0 - 0.5),
            )
        })
        .collect()
}
