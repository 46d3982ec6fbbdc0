//! 1-bit MinHash signatures for Jaccard similarity estimation.
//!
//! For each seed `s` in `0..components`:
//!
//! - hash every shingle with MurmurHash3 (x86, 32-bit, unsigned) seeded by `s`
//! - take the minimum over the set
//! - keep only the least-significant bit of that minimum
//!
//! For two sets with Jaccard similarity `J`, corresponding bits agree with
//! probability `(1 + J) / 2`: when the minima coincide (probability `J`) the
//! bits are equal, otherwise they agree by chance half the time. So the
//! fraction of agreeing bits is an estimator of `J` after rescaling.
//!
//! ## Compatibility
//!
//! Signatures are only comparable when computed with the same hash and the
//! same seed sequence. Seeds are always `0..components`, so two signatures
//! of the same length share a seed space. The hash matches Python's
//! `mmh3.hash(shingle, seed, signed=False)`, which makes signatures produced
//! there bit-identical to the ones produced here.
//!
//! ## Empty Sets
//!
//! The minimum over an empty set is undefined, so [`OneBitMinHasher::signature`]
//! refuses empty input with [`SimilarityError::EmptyShingleSet`] instead of
//! returning a sentinel that would compare as "similar" to other sentinels.
//!
//! ## References
//!
//! - Broder (1997). "On the resemblance and containment of documents"
//! - Li & König (2010). "b-Bit Minwise Hashing"

use std::collections::HashSet;

use mur3::murmurhash3_x86_32;

use crate::error::{Result, SimilarityError};

/// Default signature length.
pub const DEFAULT_COMPONENTS: usize = 256;

const WORD_BITS: usize = u64::BITS as usize;

/// Computes 1-bit minhash signatures with a fixed number of components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneBitMinHasher {
    components: usize,
}

impl Default for OneBitMinHasher {
    fn default() -> Self {
        Self {
            components: DEFAULT_COMPONENTS,
        }
    }
}

impl OneBitMinHasher {
    /// Create a hasher producing `components` bits per signature.
    ///
    /// Seeds are `0..components`, so `components` must fit in a `u32`.
    pub fn new(components: usize) -> Result<Self> {
        if components == 0 || components > u32::MAX as usize {
            return Err(SimilarityError::InvalidComponents(components));
        }
        Ok(Self { components })
    }

    /// Number of bits in every signature this hasher produces.
    pub fn components(&self) -> usize {
        self.components
    }

    /// Compute the signature of a shingle set.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::HashSet;
    /// use track_similarity::minhash::OneBitMinHasher;
    ///
    /// let shingles: HashSet<&str> = ["a b", "b c", "c d"].into_iter().collect();
    /// let hasher = OneBitMinHasher::new(64).unwrap();
    /// let sig = hasher.signature(&shingles).unwrap();
    /// assert_eq!(sig.len(), 64);
    /// assert_eq!(sig, hasher.signature(&shingles).unwrap());
    /// ```
    pub fn signature<S: AsRef<str>>(&self, shingles: &HashSet<S>) -> Result<Signature> {
        if shingles.is_empty() {
            return Err(SimilarityError::EmptyShingleSet);
        }

        let bits = (0..self.components).map(|seed| {
            let min_hash = shingles
                .iter()
                .map(|shingle| murmurhash3_x86_32(shingle.as_ref().as_bytes(), seed as u32))
                .min()
                .unwrap_or(u32::MAX);
            min_hash & 1 == 1
        });

        Ok(Signature::from_bools(bits, self.components))
    }
}

/// A fixed-length 1-bit minhash signature.
///
/// Bit `i` came from seed `i`. Bits are packed into 64-bit words; unused bits
/// of the last word are always zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<u8>", into = "Vec<u8>")
)]
pub struct Signature {
    words: Vec<u64>,
    len: usize,
}

impl Signature {
    fn from_bools(bits: impl Iterator<Item = bool>, len: usize) -> Self {
        let mut words = vec![0u64; len.div_ceil(WORD_BITS)];
        for (i, bit) in bits.enumerate().take(len) {
            if bit {
                words[i / WORD_BITS] |= 1 << (i % WORD_BITS);
            }
        }
        Self { words, len }
    }

    /// Build a signature from explicit 0/1 values, e.g. one computed by
    /// another system with the same hash and seed convention.
    pub fn from_bits(bits: &[u8]) -> Result<Self> {
        if bits.is_empty() {
            return Err(SimilarityError::InvalidComponents(0));
        }
        if let Some(&bad) = bits.iter().find(|&&b| b > 1) {
            return Err(SimilarityError::InvalidSignatureBit(bad));
        }
        Ok(Self::from_bools(bits.iter().map(|&b| b == 1), bits.len()))
    }

    /// Number of bits (= number of seeds).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false for signatures built through this crate.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit at position `index`, or `None` past the end.
    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some((self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1)
    }

    /// Iterate over bits in seed order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| (self.words[i / WORD_BITS] >> (i % WORD_BITS)) & 1 == 1)
    }

    /// Bits as 0/1 values in seed order.
    pub fn to_bits(&self) -> Vec<u8> {
        self.iter().map(u8::from).collect()
    }

    /// Whether two signatures share a seed space and can be compared.
    pub fn is_comparable(&self, other: &Signature) -> bool {
        self.len == other.len
    }

    /// Number of positions where the signatures differ.
    ///
    /// Returns `None` if the signatures have different lengths; such
    /// signatures come from different seed spaces and comparing them is
    /// meaningless.
    pub fn hamming_distance(&self, other: &Signature) -> Option<usize> {
        if !self.is_comparable(other) {
            return None;
        }
        Some(
            self.words
                .iter()
                .zip(other.words.iter())
                .map(|(a, b)| (a ^ b).count_ones() as usize)
                .sum(),
        )
    }

    /// Fraction of agreeing bits, in `[0, 1]`.
    ///
    /// Unrelated sets agree on about half the bits; identical sets agree on
    /// all of them.
    pub fn agreement(&self, other: &Signature) -> Option<f64> {
        let distance = self.hamming_distance(other)?;
        Some(1.0 - distance as f64 / self.len as f64)
    }

    /// Estimated Jaccard similarity of the underlying shingle sets.
    ///
    /// Inverts `agreement = (1 + J) / 2` and clamps to `[0, 1]`, since
    /// sampling noise can push agreement of unrelated sets below one half.
    pub fn estimated_jaccard(&self, other: &Signature) -> Option<f64> {
        let agreement = self.agreement(other)?;
        Some((2.0 * agreement - 1.0).clamp(0.0, 1.0))
    }
}

impl TryFrom<Vec<u8>> for Signature {
    type Error = SimilarityError;

    fn try_from(bits: Vec<u8>) -> Result<Self> {
        Self::from_bits(&bits)
    }
}

impl From<Signature> for Vec<u8> {
    fn from(sig: Signature) -> Self {
        sig.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn random_set(rng: &mut StdRng, size: usize, prefix: &str) -> HashSet<String> {
        (0..size)
            .map(|_| format!("{}{:016x}", prefix, rng.gen::<u64>()))
            .collect()
    }

    #[test]
    fn test_murmur_reference_values() {
        // Reference vectors for MurmurHash3 x86_32
        assert_eq!(murmurhash3_x86_32(b"", 0), 0);
        assert_eq!(murmurhash3_x86_32(b"", 1), 0x514e_28b7);
        assert_eq!(murmurhash3_x86_32(b"hello", 0), 0x248b_fa47);
    }

    #[test]
    fn test_signature_length_matches_components() {
        let shingles = set(&["a b", "b c"]);
        for components in [1, 63, 64, 65, 256] {
            let hasher = OneBitMinHasher::new(components).unwrap();
            let sig = hasher.signature(&shingles).unwrap();
            assert_eq!(sig.len(), components);
            assert_eq!(sig.to_bits().len(), components);
        }
    }

    #[test]
    fn test_signature_deterministic() {
        let shingles = set(&["u4pru u4prv u4pry", "u4prv u4pry u4prz"]);
        let hasher = OneBitMinHasher::default();
        let a = hasher.signature(&shingles).unwrap();
        let b = hasher.signature(&shingles).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.hamming_distance(&b), Some(0));
        assert_eq!(a.agreement(&b), Some(1.0));
        assert_eq!(a.estimated_jaccard(&b), Some(1.0));
    }

    #[test]
    fn test_signature_bits_follow_min_hash() {
        let shingles = set(&["x", "y", "z"]);
        let sig = OneBitMinHasher::new(32).unwrap().signature(&shingles).unwrap();
        for seed in 0..32u32 {
            let expected = ["x", "y", "z"]
                .iter()
                .map(|s| murmurhash3_x86_32(s.as_bytes(), seed))
                .min()
                .unwrap()
                & 1
                == 1;
            assert_eq!(sig.bit(seed as usize), Some(expected));
        }
        assert_eq!(sig.bit(32), None);
    }

    #[test]
    fn test_empty_set_is_rejected() {
        let empty: HashSet<String> = HashSet::new();
        let err = OneBitMinHasher::default().signature(&empty).unwrap_err();
        assert_eq!(err.kind(), "empty_shingle_set");
    }

    #[test]
    fn test_zero_components_rejected() {
        assert_eq!(
            OneBitMinHasher::new(0),
            Err(SimilarityError::InvalidComponents(0))
        );
    }

    #[test]
    fn test_disjoint_sets_agree_about_half() {
        let mut rng = StdRng::seed_from_u64(7);
        let hasher = OneBitMinHasher::new(256).unwrap();

        let trials = 40;
        let mut total = 0.0;
        for _ in 0..trials {
            let a = random_set(&mut rng, 200, "a");
            let b = random_set(&mut rng, 200, "b");
            let sa = hasher.signature(&a).unwrap();
            let sb = hasher.signature(&b).unwrap();
            total += sa.agreement(&sb).unwrap();
        }
        let mean = total / trials as f64;
        // Std of the mean is ~0.005 here
        assert!((mean - 0.5).abs() < 0.05, "mean agreement {}", mean);
    }

    #[test]
    fn test_overlapping_sets_estimate_jaccard() {
        let mut rng = StdRng::seed_from_u64(11);
        let hasher = OneBitMinHasher::new(2048).unwrap();

        // |A ∩ B| = 600, |A ∪ B| = 1000 -> J = 0.6
        let shared = random_set(&mut rng, 600, "s");
        let only_a = random_set(&mut rng, 200, "a");
        let only_b = random_set(&mut rng, 200, "b");
        let a: HashSet<String> = shared.union(&only_a).cloned().collect();
        let b: HashSet<String> = shared.union(&only_b).cloned().collect();

        let sa = hasher.signature(&a).unwrap();
        let sb = hasher.signature(&b).unwrap();
        let estimate = sa.estimated_jaccard(&sb).unwrap();
        assert!((estimate - 0.6).abs() < 0.1, "estimate {}", estimate);
    }

    #[test]
    fn test_mismatched_lengths_not_comparable() {
        let shingles = set(&["a b"]);
        let short = OneBitMinHasher::new(64).unwrap().signature(&shingles).unwrap();
        let long = OneBitMinHasher::new(128).unwrap().signature(&shingles).unwrap();
        assert!(!short.is_comparable(&long));
        assert_eq!(short.hamming_distance(&long), None);
        assert_eq!(short.agreement(&long), None);
        assert_eq!(short.estimated_jaccard(&long), None);
    }

    #[test]
    fn test_from_bits() {
        let sig = Signature::from_bits(&[1, 0, 1, 1]).unwrap();
        assert_eq!(sig.len(), 4);
        assert_eq!(sig.to_bits(), vec![1, 0, 1, 1]);
        assert_eq!(sig.iter().collect::<Vec<_>>(), vec![true, false, true, true]);

        let other = Signature::from_bits(&[1, 1, 1, 0]).unwrap();
        assert_eq!(sig.hamming_distance(&other), Some(2));
        assert_eq!(sig.agreement(&other), Some(0.5));
        assert_eq!(sig.estimated_jaccard(&other), Some(0.0));

        assert_eq!(
            Signature::from_bits(&[0, 2]),
            Err(SimilarityError::InvalidSignatureBit(2))
        );
        assert_eq!(
            Signature::from_bits(&[]),
            Err(SimilarityError::InvalidComponents(0))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_as_bit_array() {
        let sig = Signature::from_bits(&[1, 0, 1]).unwrap();
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, "[1,0,1]");

        let back: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
        assert!(serde_json::from_str::<Signature>("[1,2]").is_err());
    }

    #[test]
    fn test_from_bits_roundtrips_computed_signature() {
        let sig = OneBitMinHasher::new(100)
            .unwrap()
            .signature(&set(&["a b", "c d"]))
            .unwrap();
        let rebuilt = Signature::try_from(Vec::<u8>::from(sig.clone())).unwrap();
        assert_eq!(sig, rebuilt);
    }
}
