//! Equivalence-class partitioning of statement nodes by AST kind.

use indexmap::IndexMap;
use tracing::debug;

use crate::core::pdg::{DepLabel, Pdg};
use crate::detectors::clones::bilist::{BiList, Side};

/// Candidate anchors bucketed by AST kind, one bucket side per input PDG.
///
/// Buckets iterate in creation order, which pins down the order in which
/// anchor pairs are tried and therefore the order of groups in the clone
/// store.
#[derive(Debug, Default)]
pub struct EquivalenceClasses {
    classes: IndexMap<String, BiList>,
}

impl EquivalenceClasses {
    /// Partition both PDGs.
    ///
    /// A node is registered iff it is a statement with no outgoing
    /// control-dependency edges; statements that control others are reached
    /// through backward slicing from one of their dependents instead. The
    /// root is never inspected for itself. Programs whose statements all
    /// carry control-dep children therefore produce no buckets at all; the
    /// matcher then has no anchors and reports an empty store.
    pub fn build(benign: &Pdg, malicious: &Pdg) -> Self {
        let mut classes = Self::default();
        classes.scan(benign, Side::Benign);
        classes.scan(malicious, Side::Malicious);
        classes
    }

    fn scan(&mut self, pdg: &Pdg, side: Side) {
        let root = pdg.root();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = pdg.node(id);
            if id != root
                && node.is_statement()
                && node.edges(DepLabel::ControlChildren).is_empty()
            {
                let bucket = self
                    .classes
                    .entry(node.name().to_string())
                    .or_insert_with(|| {
                        debug!(kind = node.name(), "equivalence class created");
                        BiList::new()
                    });
                bucket.push_side(side, id);
            }
            stack.extend(node.children().iter().rev().copied());
        }
    }

    /// Buckets in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BiList)> {
        self.classes.iter().map(|(kind, bucket)| (kind.as_str(), bucket))
    }

    /// Number of distinct AST kinds registered.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True when no statement was registered on either side.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Bucket for one AST kind, when present.
    pub fn get(&self, kind: &str) -> Option<&BiList> {
        self.classes.get(kind)
    }
}
