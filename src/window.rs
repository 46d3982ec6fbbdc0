//! Fixed-size sliding windows over any iterator.
//!
//! Unlike [`slice::windows`], this works on lazily produced sequences and
//! only ever buffers `size` elements. Windows advance by one element.
//!
//! ```rust
//! use track_similarity::window::window;
//!
//! let windows: Vec<Vec<i32>> = window(vec![1, 2, 3, 4, 5], 3).collect();
//! assert_eq!(windows, vec![vec![1, 2, 3], vec![2, 3, 4], vec![3, 4, 5]]);
//! ```

use std::collections::VecDeque;
use std::iter::Fuse;

/// Iterator over overlapping windows of `size` consecutive elements.
///
/// Created by [`window`] or [`WindowExt::sliding_windows`]. Forward-only:
/// to restart, build a new one from the source.
pub struct Windows<I: Iterator> {
    iter: Fuse<I>,
    size: usize,
    buf: VecDeque<I::Item>,
}

impl<I: Iterator> Windows<I> {
    fn new(iter: I, size: usize) -> Self {
        Self {
            iter: iter.fuse(),
            size,
            buf: VecDeque::with_capacity(size),
        }
    }

    /// Window size this iterator was created with.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl<I> Iterator for Windows<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.size == 0 {
            return None;
        }

        if self.buf.len() == self.size {
            self.buf.pop_front();
        }
        while self.buf.len() < self.size {
            self.buf.push_back(self.iter.next()?);
        }

        Some(self.buf.iter().cloned().collect())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.size == 0 {
            return (0, Some(0));
        }
        // Elements still needed before the next window can be emitted
        let missing = if self.buf.len() == self.size {
            1
        } else {
            self.size - self.buf.len()
        };
        let (lower, upper) = self.iter.size_hint();
        let remaining = |n: usize| n.saturating_add(1).saturating_sub(missing);
        (remaining(lower), upper.map(remaining))
    }
}

/// Create a sliding-window iterator over `iterable`.
///
/// Yields `len - size + 1` windows when the input has at least `size`
/// elements and nothing otherwise. A `size` of zero yields nothing.
pub fn window<I>(iterable: I, size: usize) -> Windows<I::IntoIter>
where
    I: IntoIterator,
{
    Windows::new(iterable.into_iter(), size)
}

/// Extension trait adding [`sliding_windows`](WindowExt::sliding_windows)
/// to every iterator.
pub trait WindowExt: Iterator + Sized {
    /// See [`window`].
    fn sliding_windows(self, size: usize) -> Windows<Self> {
        Windows::new(self, size)
    }
}

impl<I: Iterator> WindowExt for I {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_non_empty() {
        let actual: Vec<Vec<i32>> = window(vec![1, 2, 3, 4, 5], 3).collect();
        assert_eq!(actual, vec![vec![1, 2, 3], vec![2, 3, 4], vec![3, 4, 5]]);
    }

    #[test]
    fn test_window_empty_input() {
        let actual: Vec<Vec<i32>> = window(Vec::<i32>::new(), 2).collect();
        assert!(actual.is_empty());
    }

    #[test]
    fn test_window_larger_than_input() {
        assert_eq!(window(vec!['a', 'b'], 3).count(), 0);
    }

    #[test]
    fn test_window_size_equals_input() {
        let actual: Vec<Vec<&str>> = window(vec!["a", "b", "c"], 3).collect();
        assert_eq!(actual, vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_window_size_zero_yields_nothing() {
        assert_eq!(window(vec![1, 2, 3], 0).count(), 0);
    }

    #[test]
    fn test_window_count_and_contents() {
        let source: Vec<usize> = (0..20).collect();
        for size in 1..=20 {
            let windows: Vec<Vec<usize>> = window(source.iter().copied(), size).collect();
            assert_eq!(windows.len(), source.len() - size + 1);
            for (i, w) in windows.iter().enumerate() {
                assert_eq!(w.as_slice(), &source[i..i + size]);
            }
        }
    }

    #[test]
    fn test_window_is_lazy() {
        // Would never terminate if the source were materialized
        let first: Vec<Vec<u64>> = (0u64..).sliding_windows(2).take(2).collect();
        assert_eq!(first, vec![vec![0, 1], vec![1, 2]]);
    }

    #[test]
    fn test_window_size_hint() {
        let w = window(vec![1, 2, 3, 4, 5], 3);
        assert_eq!(w.size_hint(), (3, Some(3)));
        assert_eq!(w.size(), 3);

        let mut w = window(vec![1, 2, 3, 4, 5], 3);
        w.next();
        assert_eq!(w.size_hint(), (2, Some(2)));

        let w = window(vec![1], 3);
        assert_eq!(w.size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_window_fused_after_exhaustion() {
        let mut w = window(vec![1, 2], 2);
        assert_eq!(w.next(), Some(vec![1, 2]));
        assert_eq!(w.next(), None);
        assert_eq!(w.next(), None);
    }
}
