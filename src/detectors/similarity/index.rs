//! Banded LSH index over MinHash signatures.
//!
//! The signature is partitioned into bands; two documents collide when any
//! band's rows are equal. Queries return candidates with false positives by
//! design and no false filtering: re-thresholding on estimated similarity is
//! the cluster builder's job.

use std::collections::{BTreeSet, HashMap};
use std::hash::{Hash, Hasher};

use ahash::AHasher;

use super::params::BandParams;

/// LSH index mapping banded signature fragments to file ids.
#[derive(Debug)]
pub struct LshIndex {
    params: BandParams,

    /// One collision table per band, keyed by the band-content hash
    bands: Vec<HashMap<u64, BTreeSet<u32>>>,

    /// Number of distinct files inserted
    len: usize,
}

impl LshIndex {
    /// Create an empty index with the given band layout.
    pub fn new(params: BandParams) -> Self {
        Self {
            params,
            bands: vec![HashMap::new(); params.bands],
            len: 0,
        }
    }

    /// The band layout this index was built with.
    pub fn params(&self) -> BandParams {
        self.params
    }

    /// Number of files inserted.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when no file has been inserted.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a file's signature. Idempotent on identical inputs; the caller
    /// is responsible for `file_index` uniqueness.
    pub fn insert(&mut self, file_index: u32, signature: &[u32]) {
        let mut inserted = false;
        for (band_idx, band) in self.bands.iter_mut().enumerate() {
            let Some(rows) = band_rows(signature, band_idx, self.params.rows) else {
                continue;
            };
            inserted |= band.entry(hash_band(rows)).or_default().insert(file_index);
        }
        if inserted {
            self.len += 1;
        }
    }

    /// Every file whose signature collides with `signature` in at least one
    /// band, the queried file itself included when present.
    pub fn query(&self, signature: &[u32]) -> BTreeSet<u32> {
        let mut candidates = BTreeSet::new();
        for (band_idx, band) in self.bands.iter().enumerate() {
            let Some(rows) = band_rows(signature, band_idx, self.params.rows) else {
                continue;
            };
            if let Some(ids) = band.get(&hash_band(rows)) {
                candidates.extend(ids.iter().copied());
            }
        }
        candidates
    }
}

/// The rows of band `band_idx` within a signature, if fully present.
fn band_rows(signature: &[u32], band_idx: usize, rows: usize) -> Option<&[u32]> {
    let start = band_idx * rows;
    let end = start + rows;
    signature.get(start..end)
}

/// Hash a band's rows into a collision key.
fn hash_band(rows: &[u32]) -> u64 {
    let mut hasher = AHasher::default();
    rows.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> BandParams {
        BandParams { bands: 4, rows: 2 }
    }

    #[test]
    fn test_identical_signatures_collide() {
        let mut index = LshIndex::new(params());
        let sig = vec![1, 2, 3, 4, 5, 6, 7, 8];

        index.insert(0, &sig);
        index.insert(1, &sig);

        let candidates = index.query(&sig);
        assert!(candidates.contains(&0));
        assert!(candidates.contains(&1));
    }

    #[test]
    fn test_partial_band_match_collides() {
        let mut index = LshIndex::new(params());
        index.insert(0, &[1, 2, 3, 4, 5, 6, 7, 8]);

        // Shares only the first band.
        let candidates = index.query(&[1, 2, 99, 99, 99, 99, 99, 99]);
        assert!(candidates.contains(&0));
    }

    #[test]
    fn test_no_shared_band_no_collision() {
        let mut index = LshIndex::new(params());
        index.insert(0, &[1, 2, 3, 4, 5, 6, 7, 8]);

        let candidates = index.query(&[9, 10, 11, 12, 13, 14, 15, 16]);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_insert_idempotent() {
        let mut index = LshIndex::new(params());
        let sig = vec![1, 2, 3, 4, 5, 6, 7, 8];

        index.insert(7, &sig);
        index.insert(7, &sig);

        assert_eq!(index.len(), 1);
        assert_eq!(index.query(&sig).len(), 1);
    }

    #[test]
    fn test_query_includes_self() {
        let mut index = LshIndex::new(params());
        let sig = vec![1, 2, 3, 4, 5, 6, 7, 8];
        index.insert(3, &sig);
        assert!(index.query(&sig).contains(&3));
    }

    #[test]
    fn test_excess_signature_positions_ignored() {
        // 4 bands x 2 rows uses positions 0..8; the tail is inert.
        let mut index = LshIndex::new(params());
        index.insert(0, &[1, 2, 3, 4, 5, 6, 7, 8, 100, 200]);

        let candidates = index.query(&[1, 2, 3, 4, 5, 6, 7, 8, 300, 400]);
        assert!(candidates.contains(&0));
    }
}
