//! Root document resolution.
//!
//! Starting from a node, repeatedly step to the smallest-id document it
//! updates. The walk stops at a node that updates nothing resolved, at a node
//! whose smallest predecessor is itself, or when it re-enters a document it
//! already passed; in that last case the smallest id on the cycle wins, so the
//! answer does not depend on where the walk entered the cycle.

use crate::model::{DocumentGraph, DocumentNode};
use rfcgraph_scanner::{DocumentId, RelationKind};
use std::collections::HashMap;
use tracing::debug;

pub fn find_root<'g>(graph: &'g DocumentGraph, node: &'g DocumentNode) -> &'g DocumentNode {
    let mut path: Vec<&'g DocumentNode> = vec![node];
    let mut positions: HashMap<DocumentId, usize> = HashMap::from([(node.id, 0)]);
    let mut candidate = node;

    loop {
        let Some(next) = graph
            .refs(candidate, RelationKind::Updates)
            .min_by_key(|n| n.id)
        else {
            return candidate;
        };

        if next == candidate {
            return candidate;
        }

        if let Some(&start) = positions.get(&next.id) {
            debug!("Root walk from rfc{} entered a cycle at rfc{}", node.id, next.id);
            return path[start..]
                .iter()
                .copied()
                .min_by_key(|n| n.id)
                .unwrap_or(candidate);
        }

        positions.insert(next.id, path.len());
        path.push(next);
        candidate = next;
    }
}

impl DocumentGraph {
    /// Root document of the seed, if the seed was resolved.
    pub fn root(&self) -> Option<&DocumentNode> {
        self.seed_node().map(|seed| find_root(self, seed))
    }
}
