pub mod crawl;
pub mod error;
pub mod map;
pub mod model;
pub mod report;
pub mod root;

pub use crawl::{
    BatchJob, BatchResult, CrawlOptions, CrawlProgressCallback, Crawler, FetchProgressCallback,
    batch_jobs, build_view, execute_batch, execute_crawl,
};
pub use error::{CrawlError, ReportError};
pub use map::{Category, GraphView, LinkKind, MapLink, MapNode, classify, materialize};
pub use model::{DocumentGraph, DocumentNode};
pub use report::{GraphRenderer, ReportFormat};
pub use rfcgraph_scanner::{DocumentId, RelationKind, RelationSet, Relations};
pub use root::find_root;

pub fn print_banner() {
    println!(
        r#"
        __                             _
   _ __/ _| ___ __ _ _ __ __ _ _ __ | |__
  | '__| |_ / __/ _` | '__/ _` | '_ \| '_ \
  | |  |  _| (_| (_| | | | (_| | |_) | | | |
  |_|  |_|  \___\__, |_|  \__,_| .__/|_| |_|
                |___/          |_|
        RFC update / obsolete lineage mapper
   "#
    );
}
