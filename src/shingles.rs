//! Shingle extraction from symbol sequences.
//!
//! A track sitting still produces many samples in the same geohash cell.
//! Runs of identical symbols are collapsed first so that dwell time does not
//! change the shingle set, then every window of `size` symbols becomes one
//! space-joined shingle. Shingles are kept as a set: only membership counts.

use std::collections::HashSet;

use crate::window::window;

/// Separator between symbols inside a shingle.
pub const SHINGLE_SEPARATOR: &str = " ";

/// Collapse runs of equal adjacent elements into a single element.
///
/// The first element is always kept. Applying this twice is the same as
/// applying it once.
///
/// ```rust
/// use track_similarity::shingles::dedup_consecutive;
///
/// assert_eq!(dedup_consecutive(["a", "b", "b", "a"]), vec!["a", "b", "a"]);
/// ```
pub fn dedup_consecutive<I>(symbols: I) -> Vec<I::Item>
where
    I: IntoIterator,
    I::Item: PartialEq,
{
    let mut out: Vec<I::Item> = symbols.into_iter().collect();
    out.dedup();
    out
}

/// Build the shingle set of a symbol sequence.
///
/// Returns an empty set when fewer than `size` symbols remain after
/// deduplication, or when `size` is zero.
///
/// ```rust
/// use std::collections::HashSet;
/// use track_similarity::shingles::make_shingles;
///
/// let shingles = make_shingles(&["a", "b", "b", "a", "b", "c", "d"], 3);
/// let expected: HashSet<String> = ["a b a", "b a b", "a b c", "b c d"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
/// assert_eq!(shingles, expected);
/// ```
pub fn make_shingles<S: AsRef<str>>(symbols: &[S], size: usize) -> HashSet<String> {
    let deduped = dedup_consecutive(symbols.iter().map(AsRef::<str>::as_ref));
    window(deduped, size)
        .map(|group| group.join(SHINGLE_SEPARATOR))
        .collect()
}

/// Number of distinct consecutive symbols, i.e. the length of the sequence
/// after [`dedup_consecutive`]. Used to explain empty shingle sets.
pub fn distinct_run_count<S: AsRef<str>>(symbols: &[S]) -> usize {
    dedup_consecutive(symbols.iter().map(AsRef::<str>::as_ref)).len()
}
