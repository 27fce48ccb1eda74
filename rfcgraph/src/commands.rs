use crate::CLAP_STYLING;
use clap::{arg, command};
use crate::handlers::parse_seed;
use rfcgraph_scanner::DEFAULT_BASE_URL;

/// Flags shared by every subcommand that crawls.
fn crawl_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        arg!(-f --"format" <FORMAT>)
            .required(false)
            .help("Report format: html, json, dot, text")
            .value_parser(["html", "json", "dot", "text"])
            .default_value("html"),
    )
    .arg(
        arg!(-o --"output-dir" <DIR>)
            .required(false)
            .help("Directory the report is written to")
            .default_value("."),
    )
    .arg(
        arg!(--"debug")
            .required(false)
            .help("Log per-document crawl detail to stderr")
            .action(clap::ArgAction::SetTrue),
    )
    .arg(
        arg!(--"base-url" <URL>)
            .required(false)
            .help("Where the RFC pages are served from")
            .default_value(DEFAULT_BASE_URL),
    )
    .arg(
        arg!(--"timeout" <SECONDS>)
            .required(false)
            .help("Request timeout in seconds")
            .value_parser(clap::value_parser!(u64))
            .default_value("10"),
    )
    .arg(
        arg!(-c --"concurrency" <NUM>)
            .required(false)
            .help("Maximum number of pages fetched at once per crawl")
            .value_parser(clap::value_parser!(usize))
            .default_value("4"),
    )
    .arg(
        arg!(--"relations-file" <PATH>)
            .required(false)
            .help("Read relations from a JSON file instead of rfc-editor.org")
            .value_parser(clap::value_parser!(std::path::PathBuf)),
    )
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("rfcgraph")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("rfcgraph")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(crawl_args(
            command!("graph")
                .about(
                    "Crawl the update / obsolete relations of an RFC and render the lineage \
                graph starting from its root document.",
                )
                .arg(
                    arg!(<RFC>)
                        .required(true)
                        .help("The seed document, e.g. 1034 or rfc1034")
                        .value_parser(parse_seed),
                )
                .arg(
                    arg!(-d --"depth" <DEPTH>)
                        .required(false)
                        .help("Maximum number of hops from the seed (0 = unbounded)")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("0"),
                )
                .arg(
                    arg!(--"stdout")
                        .required(false)
                        .help("Print the report instead of writing it to a file")
                        .action(clap::ArgAction::SetTrue)
                        .conflicts_with("auto-open"),
                )
                .arg(
                    arg!(--"auto-open")
                        .required(false)
                        .help("Open the written HTML report in the default browser")
                        .action(clap::ArgAction::SetTrue),
                ),
        ))
        .subcommand(crawl_args(
            command!("batch")
                .about("Render one graph per seed and depth combination")
                .arg(
                    arg!(-s --"seeds" <RFCS>)
                        .required(true)
                        .help("Comma separated seed documents, e.g. 1034,2535")
                        .value_parser(parse_seed)
                        .value_delimiter(','),
                )
                .arg(
                    arg!(-d --"depths" <DEPTHS>)
                        .required(false)
                        .help("Comma separated crawl depths (0 = unbounded)")
                        .value_parser(clap::value_parser!(usize))
                        .value_delimiter(',')
                        .default_value("0"),
                ),
        ))
}
