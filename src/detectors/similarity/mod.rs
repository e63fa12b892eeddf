//! Shingle / MinHash / LSH similarity engine.
//!
//! Data flow: document text -> shingles -> MinHash signature -> banded LSH
//! index -> candidate edges -> clusters, with a sanity pass over the
//! aggregate statistics at the end.

pub mod clusters;
pub mod index;
pub mod minhash;
pub mod params;
pub mod sanity;
pub mod shingles;

pub use clusters::ClusterBuilder;
pub use index::LshIndex;
pub use minhash::{estimate_similarity, MinHasher};
pub use params::{optimal_params, BandParams};
pub use sanity::{Confidence, SanityChecker, SanityOutcome, SanitySample};
pub use shingles::ShingleGenerator;
