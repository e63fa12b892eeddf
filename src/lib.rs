//! # Shelfscan: Marketplace Similarity Scanner
//!
//! Shelfscan indexes a corpus of markdown documents organized into
//! marketplaces and plugins, detects near-duplicate content with MinHash
//! signatures and banded locality-sensitive hashing, and answers queries
//! about where similar content lives and how much of a candidate install
//! would be genuinely new.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        CLI Layer                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scan Engine   │  Similarity   │  Report    │  Queries      │
//! │                │  Detectors    │  Artifact  │               │
//! │ • Discovery    │ • Shingles    │ • Schema   │ • where       │
//! │ • Signatures   │ • MinHash     │ • Indices  │ • compare     │
//! │ • Clustering   │ • LSH bands   │ • Loader   │ • impact      │
//! │ • Sanity       │ • Union-find  │            │ • stats       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shelfscan::{ScanEngine, ShelfscanConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = ScanEngine::new(ShelfscanConfig::default())?;
//!     let report = engine.scan("/path/to/marketplaces".as_ref())?;
//!     report.save("similarity_report.json".as_ref())?;
//!     println!("{} files in {} clusters", report.summary.files_in_clusters,
//!         report.summary.unique_clusters);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

// Core configuration and error types
pub mod core {
    //! Configuration and error handling shared by every stage.

    pub mod config;
    pub mod errors;
}

// Similarity detection algorithms
pub mod detectors {
    //! The shingle / MinHash / LSH similarity engine.

    pub mod similarity;
}

// Corpus discovery, the report artifact, and the install inventory
pub mod io {
    //! I/O: corpus discovery, report persistence, install inventory.

    pub mod discovery;
    pub mod installed;
    pub mod report;
}

// High-level engine and query surface
pub mod api {
    //! High-level scan pipeline and report queries.

    pub mod engine;
    pub mod queries;
}

// Re-export primary types for convenience
pub use crate::api::engine::ScanEngine;
pub use crate::api::queries::ReportQueries;
pub use crate::core::config::ShelfscanConfig;
pub use crate::core::errors::{Result, ShelfscanError};
pub use crate::io::report::SimilarityReport;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
