//! Dependency-directed structural matcher with backward slicing.

use ahash::AHashSet;
use tracing::debug;

use crate::core::pdg::{DepLabel, NodeId, Pdg};
use crate::detectors::clones::bilist::{BiList, CloneStore};
use crate::detectors::clones::equivalence::EquivalenceClasses;

/// Pairs `(benign_id, malicious_id)` already visited during one discovery
/// run; keeps backward slicing from revisiting the same alignment.
pub type HandledSet = AHashSet<(NodeId, NodeId)>;

/// Try every candidate anchor pair and collect the discovered clone groups.
///
/// The handled set is shared across anchor attempts; each attempt opens a
/// fresh group in the store and the group is dropped again when nothing was
/// recorded for it.
pub fn find_all_clones(benign: &Pdg, malicious: &Pdg) -> CloneStore {
    let classes = EquivalenceClasses::build(benign, malicious);
    let matcher = Matcher { benign, malicious };
    let mut store = CloneStore::new();
    let mut handled = HandledSet::default();

    for (_kind, bucket) in classes.iter() {
        for &candidate2 in bucket.malicious() {
            for &candidate1 in bucket.benign() {
                store.push(BiList::new());
                matcher.find_clones(candidate1, candidate2, &mut store, &mut handled, 0, 0);
                store.drop_last_if_empty();
            }
        }
    }

    store
}

struct Matcher<'a> {
    benign: &'a Pdg,
    malicious: &'a Pdg,
}

impl Matcher<'_> {
    /// AST-shape test: anchor kinds equal and descendant name sequences
    /// equal, compared lock-step over both trees.
    fn shape_matches(&self, n1: NodeId, n2: NodeId) -> bool {
        if self.benign.node(n1).name() != self.malicious.node(n2).name() {
            return false;
        }
        let mut left = self.benign.descendant_names(n1);
        let mut right = self.malicious.descendant_names(n2);
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if a == b => {}
                _ => return false,
            }
        }
    }

    /// Compare two statement nodes and record a clone when they share the
    /// same shape; otherwise jump backwards over benign data dependencies
    /// looking for an ancestor anchor that does.
    ///
    /// `jump` counts data-dependency jumps within this anchor attempt and
    /// `jump_match` counts the jumps that ended in a match. A match reached
    /// after an earlier jump-match is disconnected from the clone chain
    /// built so far, so the current group minus its freshest pair is kept
    /// as its own group before recording continues.
    fn find_clones(
        &self,
        n1: NodeId,
        n2: NodeId,
        store: &mut CloneStore,
        handled: &mut HandledSet,
        mut jump: u32,
        mut jump_match: u32,
    ) -> (u32, u32) {
        if self.shape_matches(n1, n2) {
            debug!(
                kind = self.benign.node(n1).name(),
                benign = %n1,
                malicious = %n2,
                "clone found"
            );

            if jump_match > 0 {
                if let Some(current) = store.last_mut() {
                    let history = current.prefix_snapshot();
                    store.push(history);
                }
            }
            handled.insert((n1, n2));
            self.record_match(n1, n2, store);

            if jump != 0 {
                jump_match += 1;
            }
            return (jump, jump_match);
        }

        for edge in self.benign.node(n1).edges(DepLabel::DataParents) {
            let parent = edge.extremity;
            if handled.contains(&(parent, n2)) {
                continue;
            }
            jump += 1;
            debug!(
                benign = %parent,
                malicious = %n2,
                "jump over a benign data dependency"
            );
            handled.insert((parent, n2));
            let (next_jump, next_jump_match) =
                self.find_clones(parent, n2, store, handled, jump, jump_match);
            jump = next_jump;
            jump_match = next_jump_match;
        }

        (jump, jump_match)
    }

    /// Record a matched pair into the current group, dropping any pairs it
    /// subsumes, then keep matching along the dependency edges.
    ///
    /// A recorded pair whose parents are the new anchors is a descendant of
    /// the new match and redundant inside the group.
    fn record_match(&self, n1: NodeId, n2: NodeId, store: &mut CloneStore) {
        if let Some(group) = store.last_mut() {
            group.retain_pairs(|benign, malicious| {
                let subsumed = self.benign.node(benign).parent() == Some(n1)
                    && self.malicious.node(malicious).parent() == Some(n2);
                if subsumed {
                    debug!(
                        child = self.benign.node(benign).name(),
                        parent = self.benign.node(n1).name(),
                        "dropping pair subsumed by its parents"
                    );
                }
                !subsumed
            });
            group.append_pair(n1, n2);
        }
        self.follow_dependencies(n1, n2, store);
    }

    /// Backward slicing from a matched pair: control dependencies first,
    /// then data dependencies. The order is observable in the store.
    fn follow_dependencies(&self, n1: NodeId, n2: NodeId, store: &mut CloneStore) {
        self.follow_dependency(n1, n2, DepLabel::ControlParents, store);
        self.follow_dependency(n1, n2, DepLabel::DataParents, store);
    }

    /// Every cross-product of the two nodes' edges of one family starts a
    /// fresh alignment attempt; self-loops are skipped by id comparison.
    fn follow_dependency(&self, n1: NodeId, n2: NodeId, label: DepLabel, store: &mut CloneStore) {
        for edge1 in self.benign.node(n1).edges(label) {
            if edge1.extremity == n1 {
                continue;
            }
            for edge2 in self.malicious.node(n2).edges(label) {
                if edge2.extremity == n2 {
                    continue;
                }
                let mut fresh = HandledSet::default();
                self.find_clones(edge1.extremity, edge2.extremity, store, &mut fresh, 0, 0);
            }
        }
    }
}
