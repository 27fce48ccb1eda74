#[path = "commands.rs"]
pub mod commands;
// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    CliSource, SourceArgs, build_source, init_tracing, open_report, output_path, parse_seed,
    resolve_output_dir, write_report,
};

// Re-export crawl functionality from rfcgraph-core
pub use rfcgraph_core::crawl::{
    BatchJob, CrawlOptions, CrawlProgressCallback, batch_jobs, execute_batch, execute_crawl,
};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
