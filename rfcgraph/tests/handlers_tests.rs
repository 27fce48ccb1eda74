use rfcgraph::commands::command_argument_builder;
use rfcgraph::handlers::*;
use rfcgraph::{CrawlOptions, execute_crawl};
use rfcgraph_core::{DocumentId, ReportFormat};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

const RELATIONS: &str = r#"{
    "1034": {"title": "Domain names - concepts and facilities", "updated_by": [4033]},
    "4033": {"title": "DNS Security Introduction and Requirements", "updates": [1034]}
}"#;

fn relations_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", RELATIONS).unwrap();
    file
}

fn offline_args(path: &Path) -> SourceArgs {
    SourceArgs {
        relations_file: Some(path.to_path_buf()),
        base_url: rfcgraph_scanner::DEFAULT_BASE_URL.to_string(),
        timeout: 10,
    }
}

#[test]
fn test_parse_seed_forms() {
    assert_eq!(parse_seed("1034"), Ok(DocumentId::new(1034)));
    assert_eq!(parse_seed("rfc1034"), Ok(DocumentId::new(1034)));
    assert_eq!(parse_seed("RFC 2535"), Ok(DocumentId::new(2535)));
}

#[test]
fn test_parse_seed_invalid() {
    assert!(parse_seed("").is_err());
    assert!(parse_seed("rfc").is_err());
    assert!(parse_seed("not-a-number").is_err());
}

#[test]
fn test_resolve_output_dir_plain_path() {
    assert_eq!(resolve_output_dir("reports/out"), PathBuf::from("reports/out"));
    assert_eq!(resolve_output_dir("."), PathBuf::from("."));
}

#[test]
fn test_resolve_output_dir_expands_tilde() {
    let resolved = resolve_output_dir("~/reports");
    assert!(resolved.ends_with("reports"));
}

#[test]
fn test_output_path() {
    let path = output_path(Path::new("/tmp/graphs"), DocumentId::new(1034), 3, ReportFormat::Html);
    assert_eq!(path, PathBuf::from("/tmp/graphs/rfc1034-depth-3-dependency.html"));
}

#[test]
fn test_build_source_prefers_relations_file() {
    let file = relations_file();
    let source = build_source(&offline_args(file.path())).unwrap();
    assert!(matches!(source, CliSource::Offline(ref memory) if memory.len() == 2));
}

#[test]
fn test_build_source_missing_relations_file() {
    let args = offline_args(Path::new("/nonexistent/relations.json"));
    assert!(build_source(&args).is_err());
}

#[test]
fn test_build_source_invalid_base_url() {
    let args = SourceArgs {
        relations_file: None,
        base_url: "not a url".to_string(),
        timeout: 10,
    };
    assert!(build_source(&args).is_err());
}

#[tokio::test]
async fn test_offline_crawl_and_write_report() {
    let file = relations_file();
    let source = build_source(&offline_args(file.path())).unwrap();

    let view = execute_crawl(source, CrawlOptions::new(DocumentId::new(4033)), None)
        .await
        .unwrap();
    assert_eq!(view.root, DocumentId::new(1034));
    assert_eq!(view.nodes.len(), 2);

    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("graphs");
    let path = write_report(&view, ReportFormat::Text, &nested).unwrap();

    assert_eq!(path, nested.join("rfc4033-depth-0-dependency.txt"));
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("Root:       rfc1034"));
    assert!(content.contains("rfc1034 -- rfc4033 (update)"));
}

#[test]
fn test_open_report_skips_non_html() {
    let file = NamedTempFile::new().unwrap();
    assert!(!open_report(file.path(), ReportFormat::Text).unwrap());
    assert!(!open_report(file.path(), ReportFormat::Dot).unwrap());
}

// ============================================================================
// Argument Parsing Tests
// ============================================================================

fn graph_matches(args: &[&str]) -> Result<clap::ArgMatches, clap::Error> {
    let argv = ["rfcgraph", "graph"].into_iter().chain(args.iter().copied());
    command_argument_builder()
        .try_get_matches_from(argv)
        .map(|matches| matches.subcommand_matches("graph").unwrap().clone())
}

#[test]
fn test_graph_auto_open_flag() {
    let matches = graph_matches(&["1034", "--auto-open"]).unwrap();
    assert!(matches.get_flag("auto-open"));

    let matches = graph_matches(&["1034"]).unwrap();
    assert!(!matches.get_flag("auto-open"));
}

#[test]
fn test_graph_stdout_conflicts_with_auto_open() {
    let err = graph_matches(&["1034", "--stdout", "--auto-open"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
}

#[test]
fn test_source_args_take_clap_defaults() {
    let matches = graph_matches(&["rfc4033"]).unwrap();
    let args = SourceArgs::from_matches(&matches);

    assert_eq!(args.relations_file, None);
    assert_eq!(args.base_url, rfcgraph_scanner::DEFAULT_BASE_URL);
    assert_eq!(args.timeout, 10);
    assert_eq!(matches.get_one::<DocumentId>("RFC"), Some(&DocumentId::new(4033)));
}
