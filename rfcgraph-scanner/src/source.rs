use crate::error::{Result, ScanError};
use crate::extract::parse_relation_page;
use crate::result::{DocumentId, RelationSet};
use reqwest::Client;
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.rfc-editor.org/rfc/";

/// Resolves a document id to its title and relation lists.
///
/// Implementations must be shareable across crawl sessions; a session never
/// retries a failed fetch.
pub trait RelationSource: Send + Sync {
    fn fetch(&self, id: DocumentId) -> impl Future<Output = Result<RelationSet>> + Send;
}

impl<S: RelationSource> RelationSource for Arc<S> {
    fn fetch(&self, id: DocumentId) -> impl Future<Output = Result<RelationSet>> + Send {
        (**self).fetch(id)
    }
}

/// Reads relations from the rfc-editor.org HTML pages.
pub struct RfcEditorSource {
    client: Client,
    base_url: Url,
}

impl RfcEditorSource {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_BASE_URL, 10)
    }

    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let base_url = Self::parse_base_url(base_url)?;
        let client = Client::builder()
            .user_agent(concat!("rfcgraph/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client, base_url })
    }

    fn parse_base_url(base_url: &str) -> Result<Url> {
        // Url::join drops the last segment unless the base ends with a slash
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        Url::parse(&normalized).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", base_url, e)))
    }

    pub fn document_url(&self, id: DocumentId) -> Result<Url> {
        self.base_url
            .join(&format!("rfc{}", id))
            .map_err(|e| ScanError::InvalidUrl(e.to_string()))
    }
}

impl RelationSource for RfcEditorSource {
    async fn fetch(&self, id: DocumentId) -> Result<RelationSet> {
        let url = self.document_url(id)?;
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::StatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!("rfc{} fetched in {:?} ({} bytes)", id, start.elapsed(), body.len());

        Ok(parse_relation_page(&body)?.with_url(url.as_str()))
    }
}

/// Fixed relation data, for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<DocumentId, RelationSet>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, id: u32, set: RelationSet) -> Self {
        self.insert(DocumentId::new(id), set);
        self
    }

    pub fn insert(&mut self, id: DocumentId, set: RelationSet) {
        self.documents.insert(id, set.normalized());
    }

    /// Load a `{"1034": {"title": ..., "updated_by": [...]}, ...}` map.
    pub fn from_json(json: &str) -> Result<Self> {
        let documents: HashMap<DocumentId, RelationSet> = serde_json::from_str(json)?;
        let mut source = Self::new();
        for (id, set) in documents {
            source.insert(id, set);
        }
        Ok(source)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl RelationSource for MemorySource {
    async fn fetch(&self, id: DocumentId) -> Result<RelationSet> {
        self.documents
            .get(&id)
            .cloned()
            .ok_or(ScanError::NotFound(id))
    }
}
