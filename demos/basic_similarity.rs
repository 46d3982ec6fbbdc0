//! Basic example of comparing GPS tracks by signature.
//!
//! Run with: cargo run --example basic_similarity

use track_similarity::{geohash, GpsPoint, SimilarityConfig, TrackSignature};

fn main() {
    // A ~2km track heading north through central London
    let track1: Vec<GpsPoint> = (0..20)
        .map(|i| GpsPoint::new(51.5074 + i as f64 * 0.001, -0.1278))
        .collect();

    // Same route recorded at a higher sample rate with a coffee stop
    let mut track2: Vec<GpsPoint> = Vec::new();
    for p in &track1 {
        track2.push(*p);
        track2.push(*p);
    }
    for _ in 0..30 {
        track2.insert(10, track1[5]);
    }

    // Only the first half of the route
    let track3 = track1[..10].to_vec();

    // Different route (New York)
    let track4: Vec<GpsPoint> = (0..20)
        .map(|i| GpsPoint::new(40.7128 + i as f64 * 0.001, -74.0060))
        .collect();

    let config = SimilarityConfig::default();

    println!("Track Similarity Examples\n");
    println!(
        "Config: precision={}, shingle_size={}, components={}\n",
        config.geohash_precision, config.shingle_size, config.components
    );

    let first = geohash::encode(&track1[0], config.geohash_precision).unwrap();
    println!("track-1 starts in cell {}\n", first);

    let sig1 = TrackSignature::from_points("track-1", &track1, &config).unwrap();
    let tracks = [("track-2", &track2), ("track-3", &track3), ("track-4", &track4)];

    for (id, points) in tracks {
        match TrackSignature::from_points(id, points, &config) {
            Ok(sig) => {
                println!("track-1 vs {}:", id);
                println!("   Shingles: {} vs {}", sig1.shingle_count, sig.shingle_count);
                println!("   Agreement: {:.3}", sig1.signature.agreement(&sig.signature).unwrap_or(0.0));
                println!("   Estimated Jaccard: {:.3}", sig1.similarity(&sig).unwrap_or(0.0));
                println!("   Shared start prefix: {}\n", sig1.shared_start_prefix(&sig));
            }
            Err(e) => println!("{}: no signature ({})\n", id, e),
        }
    }

    // Too short to produce a shingle
    let idle = vec![GpsPoint::new(51.5074, -0.1278); 100];
    match TrackSignature::from_points("idle", &idle, &config) {
        Ok(_) => println!("idle: unexpected signature"),
        Err(e) => println!("idle: {}", e),
    }
}
