use chrono::{Local, NaiveDateTime};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::lock::StoreLock;
use crate::io::paths::DataPaths;
use crate::io::recovery;
use crate::io::session_io::{self, Notice};
use crate::model::session::Session;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let paths = DataPaths::resolve(cli.data_dir.as_deref());

    match cli.command {
        None => {
            // The TUI is launched from main.rs
            Ok(())
        }
        Some(cmd) => match cmd {
            // Read commands
            Commands::List(args) => cmd_list(&paths, args, json),
            Commands::Stats(args) => cmd_stats(&paths, args, json),
            Commands::History => cmd_history(&paths, json),
            Commands::Recovery(args) => cmd_recovery(&paths, args, json),

            // Write commands
            Commands::Open(args) => cmd_open(&paths, args, json),
            Commands::Done(args) => cmd_done(&paths, args),
            Commands::Undo(args) => cmd_undo(&paths, args),
            Commands::Config(args) => cmd_config(&paths, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Open the session with the store lock held. Opening can write the store
/// (reconciling the remembered list), so even read commands take the lock.
fn open_locked(paths: &DataPaths) -> Result<(Session, StoreLock), Box<dyn std::error::Error>> {
    let lock = StoreLock::acquire_default(&paths.data_dir)?;
    let (session, notices) = session_io::open_session(paths, now())?;
    for notice in &notices {
        if let Notice::MissingListFile(_) = notice {
            eprintln!("warning: {}", notice);
        }
    }
    Ok((session, lock))
}

fn require_list(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    if session.list_file.is_none() {
        return Err("no list open (run `cad open <PATH>` first)".into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(paths: &DataPaths, args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (session, _lock) = open_locked(paths)?;
    let today = session.today_at(now());
    let mut views = session.views(today);
    if args.pending {
        views.retain(|v| !v.is_done);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    require_list(&session)?;
    println!(
        "{}",
        format_list_header(session.list_id().as_deref(), session.total_frequency(), session.current.len())
    );
    println!();
    for view in &views {
        println!("{}", format_view_line(view));
    }
    Ok(())
}

fn cmd_stats(paths: &DataPaths, args: TaskArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (session, _lock) = open_locked(paths)?;
    require_list(&session)?;
    let index = session.find_current(&args.title, args.list.as_deref())?;
    let today = session.today_at(now());
    let view = session
        .views(today)
        .into_iter()
        .find(|v| v.index == index)
        .ok_or_else(|| format!("task not found: {}", args.title))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        for line in format_stats(&view) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_history(paths: &DataPaths, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (session, _lock) = open_locked(paths)?;
    let records = session
        .store
        .records()
        .enumerate()
        .map(|(i, r)| (r, session.current.contains(i)));

    if json {
        let output: Vec<HistoryJson> = records.map(|(r, current)| history_to_json(r, current)).collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if session.store.is_empty() {
        println!("no tasks recorded yet");
        return Ok(());
    }
    for (record, current) in records {
        println!("{}", format_history_line(record, current));
    }
    Ok(())
}

fn cmd_recovery(paths: &DataPaths, args: RecoveryCmd, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_path = paths.recovery_log();
    if let Some(RecoveryAction::Path) = args.action {
        println!("{}", log_path.display());
        return Ok(());
    }

    let entries = recovery::read_recovery_entries(&log_path, Some(args.limit.unwrap_or(10)));
    if json {
        println!("{}", serde_json::to_string_pretty(&recovery_to_json(&entries))?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("recovery log is empty");
        return Ok(());
    }
    for entry in &entries {
        print!("{}", entry.to_markdown());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_open(paths: &DataPaths, args: OpenArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, _lock) = open_locked(paths)?;
    let notice = session_io::select_list(paths, &mut session, &args.path, now())?;

    if json {
        if let Notice::Loaded {
            list,
            tasks,
            added,
            updated,
            duplicates,
        } = &notice
        {
            let output = serde_json::json!({
                "list": list,
                "tasks": tasks,
                "added": added,
                "updated": updated,
                "duplicates": duplicates,
                "total_frequency": session.total_frequency(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    } else {
        println!("{}", notice);
    }
    Ok(())
}

fn cmd_done(paths: &DataPaths, args: DoneArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, _lock) = open_locked(paths)?;
    require_list(&session)?;
    let index = session.find_current(&args.task.title, args.task.list.as_deref())?;
    let today = session.today_at(now());

    session_io::mark_done(paths, &mut session, index, today, args.again)?;
    let title = session.store.get(index).map(|r| r.title.as_str()).unwrap_or_default();
    println!("done: {} ({})", title, today);
    Ok(())
}

fn cmd_undo(paths: &DataPaths, args: TaskArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, _lock) = open_locked(paths)?;
    require_list(&session)?;
    let index = session.find_current(&args.title, args.list.as_deref())?;

    let date = session_io::unmark_done(paths, &mut session, index)?;
    let title = session.store.get(index).map(|r| r.title.as_str()).unwrap_or_default();
    println!("undone: {} ({})", title, date);
    Ok(())
}

fn cmd_config(paths: &DataPaths, args: ConfigCmd, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    match args.action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let (config, _) = config_io::read_config(&paths.config_file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config_to_json(&config))?);
            } else {
                for line in format_config(&config) {
                    println!("{}", line);
                }
            }
        }
        ConfigAction::Set(set) => {
            let _lock = StoreLock::acquire_default(&paths.data_dir)?;
            let mut doc = config_io::read_document(&paths.config_file)?;
            let value: u32 = set
                .value
                .parse()
                .map_err(|_| format!("{} expects a whole number, got '{}'", set.key, set.value))?;
            match set.key.as_str() {
                "day-start" => config_io::set_new_day_start(&mut doc, value)?,
                "per-day" => config_io::set_todos_per_day(&mut doc, value)?,
                other => {
                    return Err(format!("unknown setting '{}' (expected: day-start, per-day)", other).into());
                }
            }
            config_io::write_config(&paths.config_file, &doc)?;
            println!("{} = {}", set.key, value);
        }
    }
    Ok(())
}
