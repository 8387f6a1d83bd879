//! Clone annotation, dissimilar-node reporting, and coverage counting.

use crate::core::pdg::{NodeId, Pdg};
use crate::detectors::clones::bilist::CloneStore;
use crate::detectors::clones::types::{Coverage, PairReport};

/// Per-analysis clone flags, one table per input side.
///
/// The PDGs stay read-only; all mutable analysis state lives here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneFlags {
    benign: Vec<bool>,
    malicious: Vec<bool>,
}

impl CloneFlags {
    /// Fresh flag tables for one (benign, malicious) pair.
    pub fn new(benign: &Pdg, malicious: &Pdg) -> Self {
        Self {
            benign: vec![false; benign.len()],
            malicious: vec![false; malicious.len()],
        }
    }

    /// Whether a benign-side node participates in a clone.
    pub fn benign_cloned(&self, id: NodeId) -> bool {
        self.benign[id.index()]
    }

    /// Whether a malicious-side node participates in a clone.
    pub fn malicious_cloned(&self, id: NodeId) -> bool {
        self.malicious[id.index()]
    }

    fn mark_benign(&mut self, id: NodeId) {
        self.benign[id.index()] = true;
    }

    fn mark_malicious(&mut self, id: NodeId) {
        self.malicious[id.index()] = true;
    }
}

/// Flag every node of every surviving clone group, descendants included,
/// and collect the malicious-side kind labels into `report.similar`.
///
/// One label list is produced per malicious statement node in a group;
/// comment nodes are left out of the labels (their flags are still set).
pub fn annotate_clones(
    store: &CloneStore,
    benign: &Pdg,
    malicious: &Pdg,
    flags: &mut CloneFlags,
    report: &mut PairReport,
) {
    report.similar.clear();
    for group in store.iter() {
        for &id in group.benign() {
            flags.mark_benign(id);
            for descendant in benign.descendants(id) {
                flags.mark_benign(descendant);
            }
        }
        for &id in group.malicious() {
            flags.mark_malicious(id);
            let mut labels = Vec::new();
            let node = malicious.node(id);
            if !node.is_comment() {
                labels.push(node.name().to_string());
            }
            for descendant in malicious.descendants(id) {
                flags.mark_malicious(descendant);
                let child = malicious.node(descendant);
                if !child.is_comment() {
                    labels.push(child.name().to_string());
                }
            }
            report.similar.push(labels);
        }
    }
}

/// List the kind labels of malicious nodes left uncovered by every clone.
///
/// The walk descends through cloned nodes as well; a cloned node itself is
/// never listed, and neither are comments.
pub fn collect_dissimilar(malicious: &Pdg, flags: &CloneFlags, report: &mut PairReport) {
    report.dissimilar.clear();
    let mut stack = vec![malicious.root()];
    while let Some(id) = stack.pop() {
        let node = malicious.node(id);
        if !flags.malicious_cloned(id) && !node.is_comment() {
            report.dissimilar.push(node.name().to_string());
        }
        stack.extend(node.children().iter().rev().copied());
    }
}

/// Count cloned and total nodes below the root.
///
/// The root itself is excluded. A node counts towards the total when it is
/// cloned or not a comment; it counts as cloned only when flagged.
pub fn coverage(pdg: &Pdg, cloned_flag: impl Fn(NodeId) -> bool) -> Coverage {
    let mut cloned = 0;
    let mut total = 0;
    let mut stack: Vec<NodeId> = pdg.node(pdg.root()).children().to_vec();
    while let Some(id) = stack.pop() {
        if cloned_flag(id) {
            cloned += 1;
            total += 1;
        } else if !pdg.node(id).is_comment() {
            total += 1;
        }
        stack.extend(pdg.node(id).children().iter().copied());
    }
    Coverage { cloned, total }
}
