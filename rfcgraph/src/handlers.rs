use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use rfcgraph_core::crawl::{CrawlOptions, batch_jobs, execute_batch, execute_crawl};
use rfcgraph_core::report::{default_file_name, render, save_report};
use rfcgraph_core::{DocumentId, GraphView, ReportFormat};
use rfcgraph_scanner::{MemorySource, RelationSet, RelationSource, RfcEditorSource, ScanError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Level;

/// Where relation data comes from for one invocation.
pub enum CliSource {
    Remote(RfcEditorSource),
    Offline(MemorySource),
}

impl RelationSource for CliSource {
    async fn fetch(&self, id: DocumentId) -> Result<RelationSet, ScanError> {
        match self {
            CliSource::Remote(source) => source.fetch(id).await,
            CliSource::Offline(source) => source.fetch(id).await,
        }
    }
}

/// Source settings shared by `graph` and `batch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArgs {
    pub relations_file: Option<PathBuf>,
    pub base_url: String,
    pub timeout: u64,
}

impl SourceArgs {
    /// Defaults come from the argument definitions in `commands`.
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            relations_file: matches.get_one::<PathBuf>("relations-file").cloned(),
            base_url: matches.get_one::<String>("base-url").cloned().unwrap_or_default(),
            timeout: matches.get_one::<u64>("timeout").copied().unwrap_or_default(),
        }
    }
}

/// A relations file wins over the network.
pub fn build_source(args: &SourceArgs) -> Result<CliSource, ScanError> {
    match &args.relations_file {
        Some(path) => Ok(CliSource::Offline(MemorySource::from_json_file(path)?)),
        None => Ok(CliSource::Remote(RfcEditorSource::with_timeout(
            &args.base_url,
            args.timeout,
        )?)),
    }
}

/// Clap value parser for document ids.
pub fn parse_seed(value: &str) -> Result<DocumentId, String> {
    value.parse::<DocumentId>().map_err(|e| e.to_string())
}

pub fn resolve_output_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

pub fn output_path(dir: &Path, seed: DocumentId, max_depth: usize, format: ReportFormat) -> PathBuf {
    dir.join(default_file_name(seed, max_depth, format))
}

/// Render `view` and save it under `dir`, creating the directory if needed.
pub fn write_report(view: &GraphView, format: ReportFormat, dir: &Path) -> Result<PathBuf> {
    let content = render(view, format).context("Failed to render report")?;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    let path = output_path(dir, view.seed, view.max_depth, format);
    save_report(&content, &path)
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    Ok(path)
}

/// Logs go to stderr so `--stdout` output stays clean.
pub fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    // A second call in the same process keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Open an HTML report in the default browser. Other formats are left alone.
pub fn open_report(path: &Path, format: ReportFormat) -> Result<bool> {
    if format != ReportFormat::Html {
        return Ok(false);
    }
    open::that(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(true)
}

fn report_format(matches: &ArgMatches) -> Result<ReportFormat> {
    let name = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or_default();
    ReportFormat::from_str(name).with_context(|| format!("Unknown report format '{}'", name))
}

fn output_dir(matches: &ArgMatches) -> PathBuf {
    let raw = matches
        .get_one::<String>("output-dir")
        .map(String::as_str)
        .unwrap_or_default();
    resolve_output_dir(raw)
}

fn concurrency(matches: &ArgMatches) -> usize {
    matches.get_one::<usize>("concurrency").copied().unwrap_or_default()
}

fn fail(e: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "✗".red().bold(), e);
    std::process::exit(1);
}

fn print_summary(view: &GraphView) {
    let counts = view
        .category_counts()
        .iter()
        .map(|(category, count)| format!("{} {}", count, category.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "{} {} documents, {} links, root {} ({})",
        "→".blue(),
        view.nodes.len().to_string().cyan(),
        view.links.len().to_string().cyan(),
        format!("rfc{}", view.root).bright_white(),
        counts
    );
}

pub async fn handle_graph(sub_matches: &ArgMatches, quiet: bool) {
    if let Err(e) = run_graph(sub_matches, quiet).await {
        fail(e);
    }
}

async fn run_graph(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    init_tracing(sub_matches.get_flag("debug"));

    let seed = *sub_matches
        .get_one::<DocumentId>("RFC")
        .context("A seed document is required")?;
    let max_depth = sub_matches.get_one::<usize>("depth").copied().unwrap_or_default();
    let to_stdout = sub_matches.get_flag("stdout");
    let auto_open = sub_matches.get_flag("auto-open");
    let format = report_format(sub_matches)?;
    let source = build_source(&SourceArgs::from_matches(sub_matches))?;

    let options = CrawlOptions {
        seed,
        max_depth,
        concurrency: concurrency(sub_matches),
        show_progress_bars: !quiet && !to_stdout,
    };

    let view = execute_crawl(source, options, None)
        .await
        .with_context(|| format!("Crawl of rfc{} failed", seed))?;

    if to_stdout {
        print!("{}", render(&view, format).context("Failed to render report")?);
        return Ok(());
    }

    let path = write_report(&view, format, &output_dir(sub_matches))?;
    if !quiet {
        print_summary(&view);
    }
    println!(
        "{} Report saved to {}",
        "✓".green().bold(),
        path.display().to_string().bright_white()
    );

    if auto_open {
        match open_report(&path, format) {
            Ok(true) => {}
            Ok(false) => eprintln!(
                "{} --auto-open only applies to html reports",
                "⚠".yellow().bold()
            ),
            // The report is already on disk
            Err(e) => eprintln!("{} {:#}", "⚠".yellow().bold(), e),
        }
    }
    Ok(())
}

pub async fn handle_batch(sub_matches: &ArgMatches, quiet: bool) {
    match run_batch(sub_matches, quiet).await {
        Ok(0) => {}
        Ok(failed) => {
            eprintln!("{} {} batch job(s) failed", "✗".red().bold(), failed);
            std::process::exit(1);
        }
        Err(e) => fail(e),
    }
}

/// Returns the number of failed jobs.
async fn run_batch(sub_matches: &ArgMatches, quiet: bool) -> Result<usize> {
    init_tracing(sub_matches.get_flag("debug"));

    let seeds: Vec<DocumentId> = sub_matches
        .get_many::<DocumentId>("seeds")
        .context("At least one seed document is required")?
        .copied()
        .collect();
    let depths: Vec<usize> = sub_matches
        .get_many::<usize>("depths")
        .map(|values| values.copied().collect())
        .unwrap_or_else(|| vec![0]);
    let format = report_format(sub_matches)?;
    let dir = output_dir(sub_matches);
    let source = Arc::new(build_source(&SourceArgs::from_matches(sub_matches))?);

    let jobs = batch_jobs(&seeds, &depths);
    if !quiet {
        println!(
            "{} Running {} crawl session(s) for {} seed(s)",
            "→".blue(),
            jobs.len().to_string().cyan(),
            seeds.len().to_string().cyan()
        );
    }

    let progress_callback = if quiet {
        None
    } else {
        let callback: rfcgraph_core::CrawlProgressCallback = Arc::new(|msg: String| {
            println!("  {}", msg);
        });
        Some(callback)
    };

    let results = execute_batch(source, jobs, concurrency(sub_matches), progress_callback).await;

    let mut failed = 0;
    for result in results {
        let view = match result.outcome {
            Ok(view) => view,
            Err(e) => {
                // Without a progress callback nothing has reported it yet
                if quiet {
                    eprintln!(
                        "{} rfc{} depth {} failed: {}",
                        "✗".red().bold(),
                        result.job.seed,
                        result.job.max_depth,
                        e
                    );
                }
                failed += 1;
                continue;
            }
        };
        match write_report(&view, format, &dir) {
            Ok(path) => println!(
                "{} rfc{} depth {} → {}",
                "✓".green().bold(),
                result.job.seed,
                result.job.max_depth,
                path.display().to_string().bright_white()
            ),
            Err(e) => {
                eprintln!("{} {:#}", "✗".red().bold(), e);
                failed += 1;
            }
        }
    }

    Ok(failed)
}
