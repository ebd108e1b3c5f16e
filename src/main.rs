use std::fs::OpenOptions;
use std::sync::Mutex;

use cadence::cli::commands::Cli;
use cadence::cli::handlers;
use cadence::io::paths::DataPaths;
use clap::Parser;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "cadence=warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// CLI runs log to stderr
fn init_cli_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter())
        .init();
}

/// The TUI owns the terminal, so it logs to a file in the data dir instead.
/// Logging is skipped if the file cannot be opened.
fn init_tui_logging(paths: &DataPaths) {
    let file = std::fs::create_dir_all(&paths.data_dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(paths.log_file())
    });
    if let Ok(file) = file {
        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(env_filter())
            .init();
    }
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            // No subcommand → launch TUI
            let paths = DataPaths::resolve(cli.data_dir.as_deref());
            init_tui_logging(&paths);
            cadence::tui::run(paths)
        }
        Some(_) => {
            init_cli_logging();
            handlers::dispatch(cli)
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
