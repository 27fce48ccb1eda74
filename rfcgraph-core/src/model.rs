use rfcgraph_scanner::{DocumentId, RelationKind, RelationSet, Relations};
use serde::Serialize;
use std::collections::HashMap;

/// One document of a crawl session.
///
/// `relations` holds the ids exactly as the relation source reported them;
/// `refs` holds the subset that resolved to a node of the same session.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentNode {
    pub id: DocumentId,
    pub title: String,
    pub url: Option<String>,
    pub relations: Relations,
    pub refs: Relations,
}

impl DocumentNode {
    pub fn new(id: DocumentId, set: RelationSet) -> Self {
        let set = set.normalized();
        Self {
            id,
            title: set.title,
            url: set.url,
            relations: set.relations,
            refs: Relations::default(),
        }
    }

    pub fn ids(&self, kind: RelationKind) -> &[DocumentId] {
        self.relations.get(kind)
    }

    pub fn ref_ids(&self, kind: RelationKind) -> &[DocumentId] {
        self.refs.get(kind)
    }

    pub fn is_obsoleted(&self) -> bool {
        !self.relations.obsoleted_by.is_empty()
    }

    pub fn is_updated(&self) -> bool {
        !self.relations.updated_by.is_empty()
    }
}

// Identity only; relation lists may point back at the node itself.
impl PartialEq for DocumentNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DocumentNode {}

/// Arena of every node resolved by one crawl session.
#[derive(Debug, Clone)]
pub struct DocumentGraph {
    seed: DocumentId,
    max_depth: usize,
    nodes: Vec<DocumentNode>,
    index: HashMap<DocumentId, usize>,
}

impl DocumentGraph {
    pub(crate) fn new(seed: DocumentId, max_depth: usize) -> Self {
        Self {
            seed,
            max_depth,
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Returns false, leaving the graph untouched, when `id` is already present.
    pub(crate) fn insert(&mut self, node: DocumentNode) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        self.index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        true
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [DocumentNode] {
        &mut self.nodes
    }

    pub fn seed(&self) -> DocumentId {
        self.seed
    }

    /// 0 means the crawl was unbounded.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn seed_node(&self) -> Option<&DocumentNode> {
        self.get(self.seed)
    }

    pub fn get(&self, id: DocumentId) -> Option<&DocumentNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.index.contains_key(&id)
    }

    /// Resolved neighbours of `node` for one relation kind.
    pub fn refs<'g>(
        &'g self,
        node: &'g DocumentNode,
        kind: RelationKind,
    ) -> impl Iterator<Item = &'g DocumentNode> + 'g {
        node.ref_ids(kind).iter().filter_map(|id| self.get(*id))
    }

    /// Nodes in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u32, title: &str) -> DocumentNode {
        DocumentNode::new(DocumentId::new(id), RelationSet::new(title))
    }

    #[test]
    fn test_node_equality_is_by_id() {
        let a = DocumentNode::new(
            DocumentId::new(1),
            RelationSet::new("one").with(RelationKind::Updates, [2]),
        );
        let b = node(1, "other title");
        assert_eq!(a, b);
        assert_ne!(a, node(2, "one"));
    }

    #[test]
    fn test_insert_keeps_first_instance() {
        let mut graph = DocumentGraph::new(DocumentId::new(1), 0);
        assert!(graph.insert(node(1, "first")));
        assert!(!graph.insert(node(1, "second")));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.get(DocumentId::new(1)).unwrap().title, "first");
    }

    #[test]
    fn test_refs_skip_ids_outside_the_arena() {
        let mut graph = DocumentGraph::new(DocumentId::new(1), 0);
        let mut seed = node(1, "seed");
        seed.refs.updates = vec![DocumentId::new(2), DocumentId::new(3)];
        graph.insert(seed);
        graph.insert(node(2, "two"));

        let seed = graph.seed_node().unwrap();
        let ids: Vec<DocumentId> = graph
            .refs(seed, RelationKind::Updates)
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![DocumentId::new(2)]);
    }
}
