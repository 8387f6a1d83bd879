//! Semantic clone detection between two program dependence graphs.
//!
//! The pipeline runs leaves first over one (benign, malicious) pair:
//!
//! 1. [`EquivalenceClasses`] buckets candidate statements by AST kind.
//! 2. [`find_all_clones`] tries every cross-product anchor pair, descending
//!    along control and data dependencies and slicing backwards over benign
//!    data dependencies when shapes diverge.
//! 3. [`remove_duplicate_clones`] collapses duplicate and subsumed groups
//!    and records literal-token discrepancies.
//! 4. [`annotate_clones`], [`collect_dissimilar`] and [`coverage`] flag the
//!    surviving clones and measure how much of each input they cover.
//!
//! [`CloneAnalyzer::analyze_pair`] wires the stages together and never
//! fails: unmatched shapes and empty dependency sets are ordinary outcomes.

mod annotate;
mod bilist;
mod dedup;
mod equivalence;
mod matcher;
pub mod types;

pub use annotate::{annotate_clones, collect_dissimilar, coverage, CloneFlags};
pub use bilist::{BiList, CloneStore, Side};
pub use dedup::remove_duplicate_clones;
pub use equivalence::EquivalenceClasses;
pub use matcher::{find_all_clones, HandledSet};
pub use types::{Benchmarks, Coverage, PairReport};

use std::time::Instant;

use tracing::{debug, info};

use crate::core::config::CloneConfig;
use crate::core::pdg::Pdg;


/// Primary entry point for pairwise clone analysis.
#[derive(Debug, Default)]
pub struct CloneAnalyzer {
    config: CloneConfig,
}

impl CloneAnalyzer {
    /// Create an analyzer with the given configuration.
    pub fn new(config: CloneConfig) -> Self {
        Self { config }
    }

    /// Run the full pipeline over one PDG pair and assemble the report.
    pub fn analyze_pair(&self, benign: &Pdg, malicious: &Pdg) -> PairReport {
        let mut report = PairReport::new(benign.source(), malicious.source());

        let detection_start = Instant::now();
        let mut store = find_all_clones(benign, malicious);
        let clones_detected = detection_start.elapsed().as_secs_f64();
        debug!(
            groups = store.len(),
            "clone discovery finished without duplicate suppression"
        );

        let selection_start = Instant::now();
        remove_duplicate_clones(&mut store, benign, malicious, &mut report);
        let mut flags = CloneFlags::new(benign, malicious);
        annotate_clones(&store, benign, malicious, &mut flags, &mut report);
        collect_dissimilar(malicious, &flags, &mut report);
        let clones_selected = selection_start.elapsed().as_secs_f64();
        debug!(groups = store.len(), "clone selection finished");

        report.benign_coverage = coverage(benign, |id| flags.benign_cloned(id));
        report.malicious_coverage = coverage(malicious, |id| flags.malicious_cloned(id));

        if self.config.record_benchmarks {
            report.benchmarks = Some(Benchmarks {
                clones_detected,
                clones_selected,
            });
        }

        info!(
            percent = 100.0 * report.malicious_ratio(),
            "malicious nodes found in the benign AST"
        );
        report
    }
}
