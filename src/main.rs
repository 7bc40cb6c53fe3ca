//! jira-lite - search, create and update JIRA issues from the terminal.

use std::process::ExitCode;

use clap::Parser;
use jira_lite::{cli, logging};

fn main() -> ExitCode {
    let args = cli::Cli::parse();

    if let Err(e) = logging::init(args.verbose) {
        eprintln!("warning: logging disabled: {}", e);
    }

    match cli::run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e.user_message());
            if let Some(action) = e.suggested_action() {
                eprintln!("{}", action);
            }
            if let Some(dir) = logging::log_directory() {
                eprintln!("Logs: {}", dir.display());
            }
            ExitCode::from(2)
        }
    }
}
