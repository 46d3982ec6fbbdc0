//! # Geohash Encoding
//!
//! Turns GPS samples into base32 geohash strings so a continuous trajectory
//! becomes a sequence of discrete grid-cell symbols.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`encode`] | Geohash of a single point |
//! | [`encode_track`] | One geohash per sample of a track, order preserved |
//! | [`decode_bbox`] | Cell rectangle covered by a geohash |
//! | [`decode`] | Center point of a geohash cell |
//!
//! ## Algorithm Notes
//!
//! Standard geohash: the longitude and latitude intervals are bisected
//! alternately (longitude first), each bisection contributing one bit, and
//! every 5 bits select one character of the alphabet
//! `0123456789bcdefghjkmnpqrstuvwxyz`. Strings that share a prefix lie in
//! the same parent cell, so prefix length is a coarse proximity measure
//! (see [`crate::prefix`]).
//!
//! | Precision | Approx. cell size |
//! |-----------|-------------------|
//! | 5 | 4.9km x 4.9km |
//! | 6 | 1.2km x 0.6km |
//! | 7 | 153m x 153m |
//! | 8 | 38m x 19m |
//!
//! Points exactly on a bisection line fall in the lower half.
//!
//! ```rust
//! use track_similarity::{GpsPoint, geohash};
//!
//! let hash = geohash::encode(&GpsPoint::new(57.64911, 10.40744), 11).unwrap();
//! assert_eq!(hash, "u4pruydqqvj");
//! ```

use geo::{Coord, Rect};
use log::debug;

use crate::error::{Result, SimilarityError};
use crate::GpsPoint;

/// Base32 alphabet used by geohash (no `a`, `i`, `l`, `o`).
const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Bits encoded per geohash character.
const BITS_PER_CHAR: u8 = 5;

/// Longest precision accepted by [`encode`]. Twelve characters resolve to
/// a few centimeters, well below GPS noise.
pub const MAX_PRECISION: usize = 12;

fn check_precision(precision: usize) -> Result<()> {
    if precision == 0 || precision > MAX_PRECISION {
        return Err(SimilarityError::InvalidPrecision(precision));
    }
    Ok(())
}

/// Encode a single point as a geohash of `precision` characters.
///
/// A lone point is reported as sample 0 if its coordinates are invalid.
pub fn encode(point: &GpsPoint, precision: usize) -> Result<String> {
    check_precision(precision)?;
    if !point.is_valid() {
        return Err(SimilarityError::InvalidCoordinate {
            index: 0,
            latitude: point.latitude,
            longitude: point.longitude,
        });
    }
    Ok(encode_unchecked(point, precision))
}

fn encode_unchecked(point: &GpsPoint, precision: usize) -> String {
    let (mut lat_lo, mut lat_hi) = (-90.0_f64, 90.0_f64);
    let (mut lng_lo, mut lng_hi) = (-180.0_f64, 180.0_f64);

    let mut hash = String::with_capacity(precision);
    let mut even = true;
    let mut bits = 0u8;
    let mut idx = 0usize;

    while hash.len() < precision {
        idx <<= 1;
        if even {
            let mid = (lng_lo + lng_hi) / 2.0;
            if point.longitude > mid {
                idx |= 1;
                lng_lo = mid;
            } else {
                lng_hi = mid;
            }
        } else {
            let mid = (lat_lo + lat_hi) / 2.0;
            if point.latitude > mid {
                idx |= 1;
                lat_lo = mid;
            } else {
                lat_hi = mid;
            }
        }
        even = !even;

        bits += 1;
        if bits == BITS_PER_CHAR {
            hash.push(BASE32[idx] as char);
            bits = 0;
            idx = 0;
        }
    }

    hash
}

/// Encode every sample of a track, preserving order.
///
/// The output has the same length as `points`. The first invalid sample
/// aborts encoding with [`SimilarityError::InvalidCoordinate`] carrying its
/// index; callers wanting to skip bad samples should filter with
/// [`GpsPoint::is_valid`] first.
///
/// # Example
///
/// ```rust
/// use track_similarity::{GpsPoint, geohash};
///
/// let track = vec![
///     GpsPoint::new(51.5074, -0.1278),
///     GpsPoint::new(51.5080, -0.1290),
/// ];
/// let hashes = geohash::encode_track(&track, 6).unwrap();
/// assert_eq!(hashes.len(), 2);
/// assert!(hashes.iter().all(|h| h.starts_with("gcpv")));
/// ```
pub fn encode_track(points: &[GpsPoint], precision: usize) -> Result<Vec<String>> {
    check_precision(precision)?;

    let hashes = points
        .iter()
        .enumerate()
        .map(|(index, p)| {
            if p.is_valid() {
                Ok(encode_unchecked(p, precision))
            } else {
                Err(SimilarityError::InvalidCoordinate {
                    index,
                    latitude: p.latitude,
                    longitude: p.longitude,
                })
            }
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Encoded {} samples at precision {}",
        hashes.len(),
        precision
    );
    Ok(hashes)
}

/// Decode a geohash into the rectangle of its cell.
///
/// `x` is longitude and `y` is latitude, matching the `geo` convention. The
/// empty string decodes to the whole world.
pub fn decode_bbox(hash: &str) -> Result<Rect<f64>> {
    let (mut lat_lo, mut lat_hi) = (-90.0_f64, 90.0_f64);
    let (mut lng_lo, mut lng_hi) = (-180.0_f64, 180.0_f64);
    let mut even = true;

    for c in hash.chars() {
        let idx = BASE32
            .iter()
            .position(|&b| b as char == c)
            .ok_or(SimilarityError::InvalidGeohash(c))?;

        for shift in (0..BITS_PER_CHAR).rev() {
            let bit = (idx >> shift) & 1 == 1;
            if even {
                let mid = (lng_lo + lng_hi) / 2.0;
                if bit {
                    lng_lo = mid;
                } else {
                    lng_hi = mid;
                }
            } else {
                let mid = (lat_lo + lat_hi) / 2.0;
                if bit {
                    lat_lo = mid;
                } else {
                    lat_hi = mid;
                }
            }
            even = !even;
        }
    }

    Ok(Rect::new(
        Coord { x: lng_lo, y: lat_lo },
        Coord { x: lng_hi, y: lat_hi },
    ))
}

/// Decode a geohash to the center of its cell.
pub fn decode(hash: &str) -> Result<GpsPoint> {
    let center = decode_bbox(hash)?.center();
    Ok(GpsPoint::new(center.y, center.x))
}
