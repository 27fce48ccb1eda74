use crate::model::{DocumentGraph, DocumentNode};
use rfcgraph_scanner::{DocumentId, RelationKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Rendering category of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Obsoleted,
    Updated,
    Latest,
}

impl Category {
    /// Fixed legend order.
    pub const ALL: [Category; 3] = [Category::Obsoleted, Category::Updated, Category::Latest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Obsoleted => "obsoleted",
            Category::Updated => "updated",
            Category::Latest => "latest",
        }
    }

    /// Position in [`Category::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Category::Obsoleted => 0,
            Category::Updated => 1,
            Category::Latest => 2,
        }
    }

    pub fn shown_by_default(&self) -> bool {
        !matches!(self, Category::Obsoleted)
    }
}

pub fn categories() -> Vec<String> {
    Category::ALL.iter().map(|c| c.as_str().to_string()).collect()
}

/// Obsoleted beats updated; a node with neither is the latest of its line.
pub fn classify(node: &DocumentNode) -> Category {
    if node.is_obsoleted() {
        Category::Obsoleted
    } else if node.is_updated() {
        Category::Updated
    } else {
        Category::Latest
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Update,
    Obsolete,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Update => "update",
            LinkKind::Obsolete => "obsolete",
        }
    }
}

impl From<RelationKind> for LinkKind {
    fn from(kind: RelationKind) -> Self {
        if kind.is_obsolescence() {
            LinkKind::Obsolete
        } else {
            LinkKind::Update
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapNode {
    pub id: DocumentId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub category: Category,
    pub visible: bool,
    pub seed: bool,
}

/// Undirected; `source` is always the smaller id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapLink {
    pub source: DocumentId,
    pub target: DocumentId,
    pub relation: LinkKind,
}

/// Deduplicated nodes and links handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    pub seed: DocumentId,
    pub root: DocumentId,
    pub max_depth: usize,
    pub categories: Vec<String>,
    pub nodes: Vec<MapNode>,
    pub links: Vec<MapLink>,
}

impl GraphView {
    pub fn node(&self, id: DocumentId) -> Option<&MapNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn has_link(&self, a: DocumentId, b: DocumentId) -> bool {
        let (source, target) = ordered(a, b);
        self.links
            .iter()
            .any(|l| l.source == source && l.target == target)
    }

    pub fn category_counts(&self) -> [(Category, usize); 3] {
        Category::ALL.map(|c| (c, self.nodes.iter().filter(|n| n.category == c).count()))
    }

    /// `RFC{seed}-DEPTH-{depth}`
    pub fn title(&self) -> String {
        format!("RFC{}-DEPTH-{}", self.seed, self.max_depth)
    }
}

fn ordered(a: DocumentId, b: DocumentId) -> (DocumentId, DocumentId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Walk everything reachable from `start` through resolved references.
///
/// Both marker sets belong to this call, so repeated passes over the same
/// graph produce the same view.
pub fn materialize(graph: &DocumentGraph, start: &DocumentNode) -> GraphView {
    let mut emitted: HashSet<DocumentId> = HashSet::new();
    let mut linked: HashSet<(DocumentId, DocumentId)> = HashSet::new();
    let mut nodes = Vec::new();
    let mut links = Vec::new();
    let mut stack = vec![start.id];

    while let Some(id) = stack.pop() {
        if !emitted.insert(id) {
            continue;
        }
        let Some(node) = graph.get(id) else {
            continue;
        };

        let category = classify(node);
        nodes.push(MapNode {
            id: node.id,
            title: node.title.clone(),
            url: node.url.clone(),
            category,
            visible: category.shown_by_default(),
            seed: node.id == graph.seed(),
        });

        for kind in RelationKind::ALL {
            for &neighbour in node.ref_ids(kind) {
                let key = ordered(node.id, neighbour);
                if neighbour != node.id && linked.insert(key) {
                    links.push(MapLink {
                        source: key.0,
                        target: key.1,
                        relation: kind.into(),
                    });
                }
            }
        }

        // Reversed so the first reference of the first kind is visited next.
        for kind in RelationKind::ALL.iter().rev() {
            for &neighbour in node.ref_ids(*kind).iter().rev() {
                if !emitted.contains(&neighbour) {
                    stack.push(neighbour);
                }
            }
        }
    }

    GraphView {
        seed: graph.seed(),
        root: start.id,
        max_depth: graph.max_depth(),
        categories: categories(),
        nodes,
        links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rfcgraph_scanner::RelationSet;

    fn node_with(kind: RelationKind, ids: &[u32]) -> DocumentNode {
        DocumentNode::new(
            DocumentId::new(1),
            RelationSet::new("x").with(kind, ids.iter().copied()),
        )
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&node_with(RelationKind::Updates, &[5])), Category::Latest);
        assert_eq!(classify(&node_with(RelationKind::UpdatedBy, &[5])), Category::Updated);
        assert_eq!(
            classify(&node_with(RelationKind::ObsoletedBy, &[5])),
            Category::Obsoleted
        );
    }

    #[test]
    fn test_categories_order() {
        assert_eq!(categories(), vec!["obsoleted", "updated", "latest"]);
        for (i, c) in Category::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn test_link_kind_from_relation() {
        assert_eq!(LinkKind::from(RelationKind::UpdatedBy), LinkKind::Update);
        assert_eq!(LinkKind::from(RelationKind::Updates), LinkKind::Update);
        assert_eq!(LinkKind::from(RelationKind::ObsoletedBy), LinkKind::Obsolete);
        assert_eq!(LinkKind::from(RelationKind::Obsoletes), LinkKind::Obsolete);
    }

    #[test]
    fn test_ordered_pair() {
        let (a, b) = (DocumentId::new(9), DocumentId::new(3));
        assert_eq!(ordered(a, b), (b, a));
        assert_eq!(ordered(b, a), (b, a));
    }
}
