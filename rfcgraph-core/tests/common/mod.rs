// Shared fixtures for the integration tests

#![allow(dead_code)]

use rfcgraph_scanner::{DocumentId, MemorySource, RelationKind, RelationSet, RelationSource, ScanError};
use std::sync::Mutex;

/// Memory-backed source that records every fetch.
pub struct RecordingSource {
    inner: MemorySource,
    fetches: Mutex<Vec<DocumentId>>,
}

impl RecordingSource {
    pub fn new(inner: MemorySource) -> Self {
        Self {
            inner,
            fetches: Mutex::new(Vec::new()),
        }
    }

    pub fn fetches(&self) -> Vec<DocumentId> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }
}

impl RelationSource for RecordingSource {
    async fn fetch(&self, id: DocumentId) -> Result<RelationSet, ScanError> {
        self.fetches.lock().unwrap().push(id);
        self.inner.fetch(id).await
    }
}

pub fn id(number: u32) -> DocumentId {
    DocumentId::new(number)
}

pub fn ids(numbers: &[u32]) -> Vec<DocumentId> {
    numbers.iter().copied().map(DocumentId::new).collect()
}

pub fn doc(title: &str) -> RelationSet {
    RelationSet::new(title)
}

/// Source where every listed document exists, with the given relations.
pub fn source(documents: Vec<(u32, RelationSet)>) -> MemorySource {
    documents
        .into_iter()
        .fold(MemorySource::new(), |source, (id, set)| source.with_document(id, set))
}

/// 1 <-> 2 through "updates"/"updated by", plus 2 obsoleted by 3.
pub fn small_lineage() -> MemorySource {
    source(vec![
        (1, doc("one").with(RelationKind::UpdatedBy, [2])),
        (
            2,
            doc("two")
                .with(RelationKind::Updates, [1])
                .with(RelationKind::ObsoletedBy, [3]),
        ),
        (3, doc("three").with(RelationKind::Obsoletes, [2])),
    ])
}
