use crate::core::distances::DistanceTable;
use crate::core::models::ids::LabelId;
use crate::core::models::tree::Dendrogram;
use tracing::{debug, trace};

/// Member labels of one flat cluster, in pre-order of the dendrogram.
pub type Cluster = Vec<String>;

struct Member<'a> {
    label: &'a str,
    id: Option<LabelId>,
}

/// Returns whether every pair of `members` has a recorded distance at or below `threshold`.
///
/// A pair without a recorded distance fails, so subtrees the table does not fully cover are
/// always split rather than merged. Identical labels are at distance zero.
fn all_within(members: &[Member<'_>], table: &DistanceTable, threshold: f64) -> bool {
    members.iter().enumerate().all(|(i, a)| {
        members[i + 1..].iter().all(|b| {
            if a.label == b.label {
                return true;
            }
            match (a.id, b.id) {
                (Some(x), Some(y)) => table.get(x, y).is_some_and(|d| d <= threshold),
                _ => false,
            }
        })
    })
}

/// Cuts `tree` into flat clusters of mutually close leaves.
///
/// Starting at the root, a subtree whose labeled leaves are all pairwise within `threshold`
/// becomes a single cluster. Otherwise each child is cut independently and the results are
/// concatenated in child order. Unlabeled leaves and internal-node labels are ignored, and
/// the clusters partition the labeled leaves of `tree`.
///
/// Testing a node costs O(k^2) distance lookups for its k labeled leaves. The total cost is
/// bounded by the sum of k^2 over every visited node, which is O(n^3) for a caterpillar tree
/// that never collapses.
pub fn cut_tree(tree: &Dendrogram, table: &DistanceTable, threshold: f64) -> Vec<Cluster> {
    let mut clusters = Vec::new();
    // Children are pushed in reverse so clusters come out in the same order as a recursive
    // left-to-right descent.
    let mut pending = vec![tree];

    while let Some(node) = pending.pop() {
        if node.is_leaf() {
            if let Some(label) = node.leaf_label() {
                clusters.push(vec![label.to_string()]);
            }
            continue;
        }

        let members: Vec<Member<'_>> = node
            .leaf_labels()
            .map(|label| Member {
                label,
                id: table.lookup(label),
            })
            .collect();
        if members.is_empty() {
            continue;
        }

        if all_within(&members, table, threshold) {
            trace!("Collapsing subtree of {} leaves into one cluster.", members.len());
            clusters.push(members.iter().map(|m| m.label.to_string()).collect());
        } else {
            pending.extend(node.children.iter().rev());
        }
    }

    debug!(
        "Cut dendrogram at threshold {} into {} cluster(s).",
        threshold,
        clusters.len()
    );
    clusters
}
