//! Duplicate suppression and token comparison over the clone store.

use tracing::{debug, info};

use crate::core::pdg::{LiteralCategory, NodeId, Pdg};
use crate::detectors::clones::bilist::CloneStore;
use crate::detectors::clones::types::PairReport;

/// Outcome of comparing two groups.
enum Removal {
    Keep,
    RemoveJ,
    RemoveI,
}

/// Collapse duplicate and subsumed clone groups, then report literal-token
/// mismatches inside the survivors.
///
/// Backward slicing reports some clones several times; exact duplicates keep
/// one copy, groups sharing a side keep the one whose tokens line up, and a
/// group wholly contained in a larger one is dropped. Removing the group at
/// position `i` restarts the scan from the same position with `j = i + 1`.
pub fn remove_duplicate_clones(
    store: &mut CloneStore,
    benign: &Pdg,
    malicious: &Pdg,
    report: &mut PairReport,
) {
    let mut i = 0;
    while i < store.len() {
        let mut j = i + 1;
        while j < store.len() {
            match compare_groups(store, benign, malicious, i, j) {
                Removal::Keep => j += 1,
                Removal::RemoveJ => {
                    store.remove(j);
                }
                Removal::RemoveI => {
                    store.remove(i);
                    j = i + 1;
                }
            }
        }
        i += 1;
    }

    report.pb_tokens.clear();
    change_literal(store, benign, malicious, report);
}

fn compare_groups(
    store: &CloneStore,
    benign: &Pdg,
    malicious: &Pdg,
    i: usize,
    j: usize,
) -> Removal {
    let group_i = store.get(i);
    let group_j = store.get(j);

    if group_i.benign() == group_j.benign() && group_i.malicious() == group_j.malicious() {
        debug!(index = j, "exact duplicate group dropped");
        return Removal::RemoveJ;
    }

    if group_i.benign() == group_j.benign() {
        return same_tokens(
            benign,
            group_i.benign(),
            malicious,
            group_i.malicious(),
            group_j.malicious(),
        );
    }

    if group_i.malicious() == group_j.malicious() {
        return same_tokens(
            malicious,
            group_i.malicious(),
            benign,
            group_i.benign(),
            group_j.benign(),
        );
    }

    remove_subsumed(group_i.malicious(), group_j.malicious())
        .or_else(|| remove_subsumed(group_i.benign(), group_j.benign()))
        .unwrap_or(Removal::Keep)
}

/// Two groups share one side; keep the one whose other-side literal tokens
/// reproduce the shared side's tokens.
fn same_tokens(
    shared_pdg: &Pdg,
    shared: &[NodeId],
    other_pdg: &Pdg,
    other_i: &[NodeId],
    other_j: &[NodeId],
) -> Removal {
    debug!("a clone was found twice");

    let tokens_a = literal_types(shared_pdg, shared);
    let tokens_bi = literal_types(other_pdg, other_i);
    let tokens_bj = literal_types(other_pdg, other_j);

    if tokens_a == tokens_bi && tokens_a == tokens_bj {
        // Both alternatives reproduce the tokens; clone selection beyond
        // this point is out of scope.
        Removal::Keep
    } else if tokens_a == tokens_bi {
        Removal::RemoveJ
    } else if tokens_a == tokens_bj {
        Removal::RemoveI
    } else {
        Removal::Keep
    }
}

/// Drop the group whose sides are wholly contained in the other, larger
/// group. The malicious sides are compared first.
fn remove_subsumed(side_i: &[NodeId], side_j: &[NodeId]) -> Option<Removal> {
    let contains_all =
        |haystack: &[NodeId], needles: &[NodeId]| needles.iter().all(|id| haystack.contains(id));

    if side_i.len() > side_j.len() && contains_all(side_i, side_j) {
        debug!("subsumed group dropped in favour of the larger clone");
        return Some(Removal::RemoveJ);
    }
    if side_i.len() < side_j.len() && contains_all(side_j, side_i) {
        debug!("subsumed group dropped in favour of the larger clone");
        return Some(Removal::RemoveI);
    }
    None
}

/// All `Literal` descendants of the given nodes, in positional order.
///
/// A literal node is collected as-is; any other node is searched through its
/// children.
fn collect_literals(pdg: &Pdg, roots: &[NodeId]) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack: Vec<NodeId> = roots.iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        let node = pdg.node(id);
        if node.name() == "Literal" {
            out.push(id);
        } else {
            stack.extend(node.children().iter().rev().copied());
        }
    }
    out
}

fn literal_types(pdg: &Pdg, roots: &[NodeId]) -> Vec<LiteralCategory> {
    collect_literals(pdg, roots)
        .into_iter()
        .filter_map(|id| pdg.node(id).literal_type())
        .collect()
}

/// Report token categories that differ while the ASTs matched.
fn change_literal(store: &CloneStore, benign: &Pdg, malicious: &Pdg, report: &mut PairReport) {
    for group in store.iter() {
        let malicious_literals = collect_literals(malicious, group.malicious());
        let benign_literals = collect_literals(benign, group.benign());

        for (mal_id, ben_id) in malicious_literals.into_iter().zip(benign_literals) {
            let mal_node = malicious.node(mal_id);
            let ben_node = benign.node(ben_id);
            let (Some(mal_type), Some(ben_type)) = (mal_node.literal_type(), ben_node.literal_type())
            else {
                continue;
            };
            if mal_type != ben_type {
                info!(
                    malicious = mal_node.raw().unwrap_or_default(),
                    benign = ben_node.raw().unwrap_or_default(),
                    "literal tokens do not match"
                );
                report
                    .pb_tokens
                    .push([mal_type.to_string(), ben_type.to_string()]);
            }
        }
    }
}
