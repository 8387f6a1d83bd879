//! # CloneSeek-RS: Semantic Clone Detection Between Program Dependence Graphs
//!
//! A Rust engine that finds semantic clones between two JavaScript programs
//! represented as Program Dependence Graphs (PDGs). Given a "benign" and a
//! "malicious" PDG it reports:
//!
//! - **Matched sub-ASTs**: maximal pairs of subgraphs with the same abstract
//!   syntax shape and the same control/data dependency structure
//! - **Uncovered nodes**: malicious-side nodes not participating in any clone
//! - **Token discrepancies**: literal-category mismatches inside otherwise
//!   structurally identical clones
//! - **Coverage**: the fraction of each input covered by clones
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      CloneAnalyzer                         │
//! ├────────────────────────────────────────────────────────────┤
//! │ Equivalence │ Structural │  Dedup &   │ Annotation &       │
//! │ partitioner │ matcher    │  tokens    │ coverage           │
//! │             │ (backward  │            │                    │
//! │ • per-kind  │  slicing)  │ • subsume  │ • clone flags      │
//! │   buckets   │ • clone    │ • literal  │ • dissimilar walk  │
//! │             │   store    │   report   │ • ratios           │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! PDG construction, persistence, and batch fan-out live outside this crate:
//! the engine consumes two already-built [`Pdg`] values and returns a typed
//! [`PairReport`].
//!
//! ## Quick Start
//!
//! ```rust
//! use cloneseek_rs::{CloneAnalyzer, PdgBuilder};
//!
//! # fn main() -> cloneseek_rs::Result<()> {
//! let mut builder = PdgBuilder::new("Program");
//! let root = builder.root();
//! let stmt = builder.add_child(root, "BreakStatement")?;
//! builder.add_control_dep(root, stmt)?;
//! let benign = builder.build();
//!
//! let mut builder = PdgBuilder::new("Program");
//! let root = builder.root();
//! let stmt = builder.add_child(root, "BreakStatement")?;
//! builder.add_control_dep(root, stmt)?;
//! let malicious = builder.build();
//!
//! let report = CloneAnalyzer::default().analyze_pair(&benign, &malicious);
//! assert!(report.is_complete());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

// Core data model and shared plumbing
pub mod core {
    //! Core data structures shared by the detection pipeline.

    pub mod config;
    pub mod errors;
    pub mod pdg;
}

// Detection algorithms
pub mod detectors {
    //! Clone detection over PDG pairs.

    pub mod clones;
}

// Re-export primary types for convenience
pub use crate::core::config::{CloneConfig, KindConfig};
pub use crate::core::errors::{CloneSeekError, Result};
pub use crate::core::pdg::{DepLabel, LiteralCategory, Node, NodeId, Pdg, PdgBuilder};
pub use crate::detectors::clones::{CloneAnalyzer, PairReport};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
