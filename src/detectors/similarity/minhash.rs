//! MinHash signature construction.
//!
//! Each document's shingle set is reduced to a fixed-width vector of 32-bit
//! values. A single xxh3 base hash per shingle is passed through a family of
//! universal-hash permutations whose coefficients are drawn deterministically
//! from the configured seed, so identical inputs produce identical signatures
//! across runs and the fraction of matching positions is an unbiased
//! estimator of Jaccard similarity.

use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::core::errors::{Result, ShelfscanError};

/// Mersenne prime modulus for the permutation family.
const MERSENNE_PRIME: u64 = (1 << 61) - 1;

/// Signature values are truncated to 32 bits.
const MAX_HASH: u64 = (1 << 32) - 1;

/// MinHash signature builder with a fixed permutation family.
#[derive(Debug, Clone)]
pub struct MinHasher {
    /// Per-permutation (a, b) coefficients
    coefficients: Vec<(u64, u64)>,
    seed: u64,
}

impl MinHasher {
    /// Create a builder with `num_permutations` permutations derived from `seed`.
    pub fn new(num_permutations: usize, seed: u64) -> Self {
        let coefficients = (0..num_permutations as u64)
            .map(|i| {
                // a must be non-zero for the permutation to be injective.
                let a = xxh3_64_with_seed(&(i * 2).to_le_bytes(), seed) % (MERSENNE_PRIME - 1) + 1;
                let b = xxh3_64_with_seed(&(i * 2 + 1).to_le_bytes(), seed) % MERSENNE_PRIME;
                (a, b)
            })
            .collect();

        Self { coefficients, seed }
    }

    /// Number of permutations (signature width).
    pub fn num_permutations(&self) -> usize {
        self.coefficients.len()
    }

    /// The seed the permutation family was derived from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Compute the MinHash signature of a shingle set.
    ///
    /// An empty shingle set is a precondition violation from the tokenizer
    /// and is refused.
    pub fn signature<I, S>(&self, shingles: I) -> Result<Vec<u32>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut signature = vec![u32::MAX; self.coefficients.len()];
        let mut any = false;

        for shingle in shingles {
            any = true;
            let base = xxh3_64_with_seed(shingle.as_ref().as_bytes(), self.seed) % MERSENNE_PRIME;

            for (slot, &(a, b)) in signature.iter_mut().zip(self.coefficients.iter()) {
                let permuted =
                    ((u128::from(a) * u128::from(base) + u128::from(b)) % u128::from(MERSENNE_PRIME))
                        as u64
                        & MAX_HASH;
                let permuted = permuted as u32;
                if permuted < *slot {
                    *slot = permuted;
                }
            }
        }

        if !any {
            return Err(ShelfscanError::validation(
                "cannot build a MinHash signature from an empty shingle set",
            ));
        }

        Ok(signature)
    }
}

/// Estimated Jaccard similarity of two signatures: the fraction of matching
/// positions. Returns 0.0 for signatures of different widths.
pub fn estimate_similarity(sig1: &[u32], sig2: &[u32]) -> f64 {
    if sig1.len() != sig2.len() || sig1.is_empty() {
        return 0.0;
    }

    let matching = sig1.iter().zip(sig2.iter()).filter(|(a, b)| a == b).count();
    matching as f64 / sig1.len() as f64
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn shingle_set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_signature_width() {
        let hasher = MinHasher::new(64, 7);
        let sig = hasher.signature(&shingle_set(&["a b c", "b c d"])).unwrap();
        assert_eq!(sig.len(), 64);
        assert!(sig.iter().any(|&v| v != u32::MAX));
    }

    #[test]
    fn test_identical_inputs_identical_signatures() {
        let hasher = MinHasher::new(128, 42);
        let set = shingle_set(&["one two three", "two three four"]);

        let sig1 = hasher.signature(&set).unwrap();
        let sig2 = hasher.signature(&set).unwrap();
        assert_eq!(sig1, sig2);
        assert_eq!(estimate_similarity(&sig1, &sig2), 1.0);
    }

    #[test]
    fn test_separate_builders_agree_given_the_same_seed() {
        let set = shingle_set(&["alpha beta gamma", "beta gamma delta"]);
        let sig1 = MinHasher::new(128, 9).signature(&set).unwrap();
        let sig2 = MinHasher::new(128, 9).signature(&set).unwrap();
        assert_eq!(sig1, sig2);
    }

    #[test]
    fn test_seed_changes_signature() {
        let set = shingle_set(&["alpha beta gamma"]);
        let sig1 = MinHasher::new(128, 1).signature(&set).unwrap();
        let sig2 = MinHasher::new(128, 2).signature(&set).unwrap();
        assert_ne!(sig1, sig2);
    }

    #[test]
    fn test_empty_shingle_set_refused() {
        let hasher = MinHasher::new(32, 0);
        let empty: BTreeSet<String> = BTreeSet::new();
        assert!(hasher.signature(&empty).is_err());
    }

    #[test]
    fn test_disjoint_sets_low_similarity() {
        let hasher = MinHasher::new(128, 5);
        let set1: BTreeSet<String> = (0..200).map(|i| format!("left {i}")).collect();
        let set2: BTreeSet<String> = (0..200).map(|i| format!("right {i}")).collect();

        let sig1 = hasher.signature(&set1).unwrap();
        let sig2 = hasher.signature(&set2).unwrap();
        assert!(estimate_similarity(&sig1, &sig2) < 0.1);
    }

    #[test]
    fn test_estimator_tracks_jaccard() {
        // Sets with known Jaccard 0.5: 200 shared, 100 unique each side.
        let hasher = MinHasher::new(128, 11);
        let shared: Vec<String> = (0..200).map(|i| format!("shared {i}")).collect();
        let mut set1: BTreeSet<String> = shared.iter().cloned().collect();
        let mut set2: BTreeSet<String> = shared.into_iter().collect();
        set1.extend((0..100).map(|i| format!("only-a {i}")));
        set2.extend((0..100).map(|i| format!("only-b {i}")));

        let sig1 = hasher.signature(&set1).unwrap();
        let sig2 = hasher.signature(&set2).unwrap();
        let estimate = estimate_similarity(&sig1, &sig2);
        assert!((estimate - 0.5).abs() < 0.15, "estimate was {estimate}");
    }

    #[test]
    fn test_mismatched_widths() {
        assert_eq!(estimate_similarity(&[1, 2], &[1, 2, 3]), 0.0);
    }
}
