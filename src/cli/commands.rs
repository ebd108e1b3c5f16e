use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cad", about = concat!("cadence v", env!("CARGO_PKG_VERSION"), " - recurring todos, most overdue first"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Keep the store, config and logs in this directory
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a source list and remember it for next time
    Open(OpenArgs),
    /// Show the current list, most urgent first
    List(ListArgs),
    /// Mark a task done today
    Done(DoneArgs),
    /// Remove a task's most recent completion
    Undo(TaskArgs),
    /// Show completion intervals for a task
    Stats(TaskArgs),
    /// Show every task ever recorded, including ones no longer listed
    History,
    /// Show or change settings
    Config(ConfigCmd),
    /// View the recovery log
    Recovery(RecoveryCmd),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct OpenArgs {
    /// Path to a list file (one `frequency|title` per line)
    pub path: PathBuf,
}

#[derive(Args)]
pub struct ListArgs {
    /// Hide tasks already done today
    #[arg(long)]
    pub pending: bool,
}

/// A task picked by title
#[derive(Args)]
pub struct TaskArgs {
    /// Task title (exact, or case-insensitive if no exact match)
    pub title: String,
    /// Only consider tasks from this list
    #[arg(long)]
    pub list: Option<String>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct DoneArgs {
    #[command(flatten)]
    pub task: TaskArgs,
    /// Record another completion even if already done today
    #[arg(long)]
    pub again: bool,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective settings (default)
    Show,
    /// Change a setting: day-start <HOUR> or per-day <COUNT>
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub struct ConfigSetArgs {
    pub key: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Print the absolute path to the recovery log
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["cad", "list", "--pending", "--json", "--data-dir", "/tmp/x"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(cli.command, Some(Commands::List(ListArgs { pending: true }))));
    }

    #[test]
    fn done_takes_title_list_and_again() {
        let cli = Cli::try_parse_from(["cad", "done", "Water plants", "--list", "chores.txt", "--again"]).unwrap();
        match cli.command {
            Some(Commands::Done(args)) => {
                assert_eq!(args.task.title, "Water plants");
                assert_eq!(args.task.list.as_deref(), Some("chores.txt"));
                assert!(args.again);
            }
            _ => panic!("expected done"),
        }
    }
}
