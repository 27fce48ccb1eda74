use rfcgraph::commands::command_argument_builder;
use rfcgraph::handlers::{handle_batch, handle_graph};
use rfcgraph_core::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // The banner would end up inside a report printed to stdout
    let to_stdout =
        matches!(chosen_command.subcommand(), Some(("graph", m)) if m.get_flag("stdout"));

    // Show banner unless --quiet flag is set
    if !quiet && !to_stdout {
        print_banner();
    }

    match chosen_command.subcommand() {
        Some(("graph", primary_command)) => handle_graph(primary_command, quiet).await,
        Some(("batch", primary_command)) => handle_batch(primary_command, quiet).await,
        // No subcommand provided, just show the banner
        None => {}
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
