use crate::error::CrawlError;
use crate::map::{GraphView, materialize};
use crate::model::{DocumentGraph, DocumentNode};
use crate::root::find_root;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use rfcgraph_scanner::{DocumentId, RelationKind, RelationSet, RelationSource, ScanError};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

pub const DEFAULT_CONCURRENCY: usize = 4;

/// Called with every document id just before it is fetched.
pub type FetchProgressCallback = Arc<dyn Fn(DocumentId) + Send + Sync>;

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub seed: DocumentId,
    /// 0 means unbounded
    pub max_depth: usize,
    pub concurrency: usize,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn new(seed: DocumentId) -> Self {
        Self {
            seed,
            max_depth: 0,
            concurrency: DEFAULT_CONCURRENCY,
            show_progress_bars: false,
        }
    }
}

/// Expands a seed document into a [`DocumentGraph`].
///
/// Every call to [`Crawler::crawl`] is its own session with its own visited
/// map, so one crawler can serve any number of seeds.
pub struct Crawler<S> {
    source: S,
    max_depth: usize,
    concurrency: usize,
    progress_callback: Option<FetchProgressCallback>,
}

impl<S: RelationSource> Crawler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            max_depth: 0,
            concurrency: DEFAULT_CONCURRENCY,
            progress_callback: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Upper bound on fetches in flight for documents at the same depth.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_progress_callback(mut self, callback: FetchProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn crawl(&self, seed: DocumentId) -> Result<DocumentGraph, CrawlError> {
        let session_id = Uuid::new_v4();
        let span = info_span!(
            "crawl",
            session = %session_id,
            seed = %seed,
            max_depth = self.max_depth
        );
        self.run_session(seed).instrument(span).await
    }

    async fn run_session(&self, seed: DocumentId) -> Result<DocumentGraph, CrawlError> {
        info!("Starting crawl of rfc{}", seed);

        let mut session = CrawlSession::new(seed, self.max_depth);
        let (_, fetched) = self.fetch_one(seed).await;
        let set = fetched.map_err(|source| CrawlError::SeedUnavailable { id: seed, source })?;

        // Breadth-first, so every document is expanded at its shortest hop distance
        let mut wave = session.resolve(seed, 0, set);
        let mut depth = 1;

        while !wave.is_empty() {
            debug!("Fetching {} documents at depth {}", wave.len(), depth);

            let mut next = Vec::new();
            for chunk in wave.chunks(self.concurrency) {
                let mut requests = Vec::with_capacity(chunk.len());
                for &id in chunk {
                    requests.push(self.fetch_one(id));
                }

                for (id, result) in join_all(requests).await {
                    match result {
                        Ok(set) => next.extend(session.resolve(id, depth, set)),
                        Err(e) => {
                            warn!("Leaving rfc{} unresolved: {}", id, e);
                            session.mark_failed(id);
                        }
                    }
                }
            }

            wave = next;
            depth += 1;
        }

        let graph = session.finish();
        info!("Crawl complete. Resolved {} documents", graph.len());
        Ok(graph)
    }

    async fn fetch_one(&self, id: DocumentId) -> (DocumentId, Result<RelationSet, ScanError>) {
        if let Some(ref callback) = self.progress_callback {
            callback(id);
        }
        (id, self.source.fetch(id).await)
    }
}

fn within_bound(max_depth: usize, depth: usize) -> bool {
    max_depth == 0 || depth <= max_depth
}

/// Mutable state of one crawl. Never outlives [`Crawler::crawl`].
struct CrawlSession {
    graph: DocumentGraph,
    max_depth: usize,
    /// Fetched or queued ids; a document is scheduled at most once.
    scheduled: HashSet<DocumentId>,
    failed: HashSet<DocumentId>,
}

impl CrawlSession {
    fn new(seed: DocumentId, max_depth: usize) -> Self {
        Self {
            graph: DocumentGraph::new(seed, max_depth),
            max_depth,
            scheduled: HashSet::from([seed]),
            failed: HashSet::new(),
        }
    }

    /// Records a fetched document and returns the neighbours that still need fetching.
    fn resolve(&mut self, id: DocumentId, depth: usize, set: RelationSet) -> Vec<DocumentId> {
        let node = DocumentNode::new(id, set);
        let mut next = Vec::new();

        if within_bound(self.max_depth, depth + 1) {
            for (_, neighbour) in node.relations.iter() {
                if self.scheduled.insert(neighbour) {
                    next.push(neighbour);
                }
            }
        } else {
            debug!("rfc{} is at the depth limit, not expanding", id);
        }

        self.graph.insert(node);
        next
    }

    fn mark_failed(&mut self, id: DocumentId) {
        self.failed.insert(id);
    }

    /// Turns raw relation ids into references to resolved nodes.
    ///
    /// Frontier nodes keep their references to documents of the session; only
    /// ids that were never fetched stay unresolved.
    fn finish(mut self) -> DocumentGraph {
        let resolved: HashSet<DocumentId> = self.graph.iter().map(|node| node.id).collect();

        for node in self.graph.nodes_mut() {
            for kind in RelationKind::ALL {
                let refs: Vec<DocumentId> = node
                    .relations
                    .get(kind)
                    .iter()
                    .copied()
                    .filter(|id| resolved.contains(id))
                    .collect();
                *node.refs.get_mut(kind) = refs;
            }
        }

        if !self.failed.is_empty() {
            info!("{} documents could not be fetched", self.failed.len());
        }
        self.graph
    }
}

/// Resolve the root of a crawled graph and materialize it for rendering.
pub fn build_view(graph: &DocumentGraph) -> Result<GraphView, CrawlError> {
    let seed = graph
        .seed_node()
        .ok_or(CrawlError::UnknownDocument(graph.seed()))?;
    let root = find_root(graph, seed);
    debug!("Root of rfc{} is rfc{}", seed.id, root.id);
    Ok(materialize(graph, root))
}

/// Execute a crawl with the given options
/// Returns the materialized graph, starting from the seed's root document
pub async fn execute_crawl<S: RelationSource>(
    source: S,
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<GraphView, CrawlError> {
    let CrawlOptions {
        seed,
        max_depth,
        concurrency,
        show_progress_bars,
    } = options;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Crawling rfc{}...", seed));
        Some(Arc::new(pb))
    } else {
        None
    };

    let fetched_count = Arc::new(AtomicUsize::new(0));
    let count_clone = fetched_count.clone();
    let pb_clone = progress_bar.clone();
    let fetch_callback: FetchProgressCallback = Arc::new(move |id: DocumentId| {
        let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref pb) = pb_clone {
            pb.set_message(format!("Crawling... {} documents fetched (rfc{})", count, id));
            pb.tick();
        }
    });

    let crawler = Crawler::new(source)
        .with_max_depth(max_depth)
        .with_concurrency(concurrency)
        .with_progress_callback(fetch_callback);

    let result = crawler.crawl(seed).await.and_then(|graph| build_view(&graph));

    if let Some(ref pb) = progress_bar {
        let total = fetched_count.load(Ordering::Relaxed);
        match result {
            Ok(_) => pb.finish_with_message(format!("Crawl complete! {} documents fetched", total)),
            Err(_) => pb.finish_and_clear(),
        }
    }

    if let (Some(callback), Ok(view)) = (&progress_callback, &result) {
        callback(format!(
            "rfc{} depth {}: {} documents, {} links, root rfc{}",
            seed,
            max_depth,
            view.nodes.len(),
            view.links.len(),
            view.root
        ));
    }

    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchJob {
    pub seed: DocumentId,
    pub max_depth: usize,
}

#[derive(Debug)]
pub struct BatchResult {
    pub job: BatchJob,
    pub outcome: Result<GraphView, CrawlError>,
}

/// Every seed paired with every depth, seeds outermost.
pub fn batch_jobs(seeds: &[DocumentId], depths: &[usize]) -> Vec<BatchJob> {
    seeds
        .iter()
        .flat_map(|&seed| depths.iter().map(move |&max_depth| BatchJob { seed, max_depth }))
        .collect()
}

/// Run one isolated crawl session per job, concurrently.
/// Results come back in job order; a failed job does not affect the others.
pub async fn execute_batch<S: RelationSource + 'static>(
    source: Arc<S>,
    jobs: Vec<BatchJob>,
    concurrency: usize,
    progress_callback: Option<CrawlProgressCallback>,
) -> Vec<BatchResult> {
    info!("Starting batch of {} crawl sessions", jobs.len());

    let mut handles = Vec::with_capacity(jobs.len());
    for job in &jobs {
        let source = source.clone();
        let callback = progress_callback.clone();
        let options = CrawlOptions {
            seed: job.seed,
            max_depth: job.max_depth,
            concurrency,
            show_progress_bars: false,
        };
        handles.push(tokio::spawn(async move {
            execute_crawl(source, options, callback).await
        }));
    }

    let mut results = Vec::with_capacity(jobs.len());
    for (job, handle) in jobs.into_iter().zip(handles) {
        let outcome = handle.await.unwrap_or_else(|e| Err(CrawlError::JoinError(e)));
        if let (Some(callback), Err(e)) = (&progress_callback, &outcome) {
            callback(format!("[!] rfc{} depth {} failed: {}", job.seed, job.max_depth, e));
        }
        results.push(BatchResult { job, outcome });
    }

    results
}
