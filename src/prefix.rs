//! Common-prefix length of two strings.
//!
//! For geohashes this is a coarse proximity signal: two cells sharing `n`
//! leading characters lie in the same precision-`n` parent cell.

/// Number of leading characters that match position by position.
///
/// Stops at the first mismatch or at the end of the shorter string, so it
/// returns 0 if either string is empty.
///
/// ```rust
/// use track_similarity::prefix::common_prefix_len;
///
/// assert_eq!(common_prefix_len("abdef", "abc"), 2);
/// assert_eq!(common_prefix_len("abc", "abc"), 3);
/// ```
pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}
