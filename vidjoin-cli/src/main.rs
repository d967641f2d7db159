// ============================================================================
// vidjoin-cli/src/main.rs
// ============================================================================
//
// MAIN ENTRY POINT: vidjoin CLI Application
//
// Parses the command line, initializes logging, installs the terminal
// progress reporter and dispatches to the command implementations. Any error
// is logged and turns into exit code 1.

use clap::Parser;
use vidjoin_cli::logging::init_logging;
use vidjoin_cli::terminal::TerminalReporter;
use vidjoin_cli::{Cli, Commands, run_concat_command, run_probe_command};
use vidjoin_core::progress_reporting::{self, set_progress_reporter};

use std::process;

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    set_progress_reporter(Box::new(TerminalReporter::new(cli.verbose)));

    let result = match cli.command {
        Commands::Concat(args) => run_concat_command(args),
        Commands::Probe(args) => run_probe_command(args),
    };

    if let Err(e) = result {
        progress_reporting::clear_progress();
        progress_reporting::error(&e.to_string());
        log::debug!("Exiting with error: {e:?}");
        process::exit(1);
    }
}
