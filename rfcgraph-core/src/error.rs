use rfcgraph_scanner::{DocumentId, ScanError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("No relation data for seed document {id}: {source}")]
    SeedUnavailable {
        id: DocumentId,
        #[source]
        source: ScanError,
    },

    #[error("Document {0} is not part of the crawled graph")]
    UnknownDocument(DocumentId),

    #[error("Crawl task failed: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
