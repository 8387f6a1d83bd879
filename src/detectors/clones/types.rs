//! Typed result records for one (benign, malicious) analysis.

use serde::{Deserialize, Serialize};

/// Cloned-over-total node counts for one input side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    /// Nodes participating in a surviving clone
    pub cloned: usize,
    /// Nodes considered (cloned or non-comment), root excluded
    pub total: usize,
}

impl Coverage {
    /// Cloned fraction; zero for an empty side.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.cloned as f64 / self.total as f64
        }
    }
}

/// Wall-clock timings of the two pipeline halves, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Benchmarks {
    /// Clone discovery (partitioning and matching)
    #[serde(rename = "Clones detected")]
    pub clones_detected: f64,
    /// Clone selection (deduplication, annotation, dissimilar walk)
    #[serde(rename = "Clones selected")]
    pub clones_selected: f64,
}

/// Result record for one analysed PDG pair.
///
/// The typed counterpart of the reference result dictionary: source labels,
/// matched and unmatched malicious kinds, literal-token discrepancies, and
/// per-side coverage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairReport {
    /// Source label of the benign input
    pub benign: String,
    /// Source label of the malicious input
    pub malicious: String,
    /// Per-clone malicious-side AST kind labels, one list per matched
    /// malicious statement
    pub similar: Vec<Vec<String>>,
    /// Malicious-side non-comment kinds not covered by any clone
    pub dissimilar: Vec<String>,
    /// Token-category mismatch pairs, `[malicious, benign]`
    pub pb_tokens: Vec<[String; 2]>,
    /// Benign-side coverage counts
    #[serde(rename = "%benign")]
    pub benign_coverage: Coverage,
    /// Malicious-side coverage counts
    #[serde(rename = "%malicious")]
    pub malicious_coverage: Coverage,
    /// Pipeline timings, when enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmarks: Option<Benchmarks>,
}

impl PairReport {
    /// Empty report carrying only the two source labels.
    pub fn new(benign: impl Into<String>, malicious: impl Into<String>) -> Self {
        Self {
            benign: benign.into(),
            malicious: malicious.into(),
            similar: Vec::new(),
            dissimilar: Vec::new(),
            pb_tokens: Vec::new(),
            benign_coverage: Coverage::default(),
            malicious_coverage: Coverage::default(),
            benchmarks: None,
        }
    }

    /// Fraction of the malicious input covered by clones, the scalar score
    /// the batch driver ranks pairs by.
    pub fn malicious_ratio(&self) -> f64 {
        self.malicious_coverage.ratio()
    }

    /// Whether every counted malicious node is covered by a clone.
    ///
    /// An empty malicious side (no non-comment nodes below the root) counts
    /// as complete.
    pub fn is_complete(&self) -> bool {
        self.malicious_coverage.cloned == self.malicious_coverage.total
    }
}
