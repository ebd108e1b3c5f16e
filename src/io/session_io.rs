use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use toml_edit::DocumentMut;

use crate::io::config_io::{self, ConfigError};
use crate::io::lock::LockError;
use crate::io::paths::DataPaths;
use crate::io::store_io::{self, StoreError};
use crate::model::record::TaskRecord;
use crate::model::session::{LookupError, Session};
use crate::ops::completion::{self, CompletionError, Toggle};
use crate::ops::reconcile::reconcile;
use crate::parse::{ParseError, list_id_for, parse_list};

/// Error type for session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("could not read list {path}: {source}")]
    ReadList {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    ParseList { path: PathBuf, source: ParseError },
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error("no record at position {0}")]
    MissingRecord(usize),
}

/// Something worth telling the user after an open or reload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The remembered list file is gone; it has been forgotten
    MissingListFile(PathBuf),
    Loaded {
        list: String,
        tasks: usize,
        added: usize,
        updated: usize,
        duplicates: usize,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::MissingListFile(path) => {
                write!(f, "list file {} not found; open a list to continue", path.display())
            }
            Notice::Loaded {
                list,
                tasks,
                added,
                updated,
                duplicates,
            } => {
                write!(f, "{}: {} tasks", list, tasks)?;
                if *added > 0 {
                    write!(f, ", {} new", added)?;
                }
                if *updated > 0 {
                    write!(f, ", {} updated", updated)?;
                }
                if *duplicates > 0 {
                    write!(f, ", {} duplicate lines ignored", duplicates)?;
                }
                Ok(())
            }
        }
    }
}

/// Read config and store, then restore the remembered list if it still
/// exists. Callers hold the store lock: reconciling may write the store.
pub fn open_session(paths: &DataPaths, now: NaiveDateTime) -> Result<(Session, Vec<Notice>), SessionError> {
    let (config, mut doc) = config_io::read_config(&paths.config_file)?;
    let store = store_io::load_store(paths)?;
    let mut session = Session::new(config, store);
    let mut notices = Vec::new();

    if let Some(file) = session.config.list.file.clone() {
        notices.push(restore_list(paths, &mut session, &mut doc, file, now)?);
    }

    Ok((session, notices))
}

/// Load a remembered list, or forget it when the file is gone. A missing
/// file leaves the session with an empty current list.
fn restore_list(
    paths: &DataPaths,
    session: &mut Session,
    doc: &mut DocumentMut,
    file: PathBuf,
    now: NaiveDateTime,
) -> Result<Notice, SessionError> {
    if file.exists() {
        return load_list(paths, session, &file, now);
    }
    tracing::warn!(path = %file.display(), "remembered list file is missing");
    config_io::set_list_file(doc, None);
    config_io::write_config(&paths.config_file, doc)?;
    session.config.list.file = None;
    Ok(Notice::MissingListFile(file))
}

/// Parse `file` and reconcile it into a copy of the store. The copy is
/// saved when it changed and only then replaces the session's store, so a
/// failed save leaves the session as it was.
pub fn load_list(
    paths: &DataPaths,
    session: &mut Session,
    file: &Path,
    now: NaiveDateTime,
) -> Result<Notice, SessionError> {
    let source = fs::read_to_string(file).map_err(|e| SessionError::ReadList {
        path: file.to_path_buf(),
        source: e,
    })?;
    let list = list_id_for(file);
    let entries = parse_list(&source, &list).map_err(|e| SessionError::ParseList {
        path: file.to_path_buf(),
        source: e,
    })?;

    let today = session.today_at(now);
    let mut store = session.store.clone();
    let outcome = reconcile(&mut store, entries, today);
    if outcome.dirty() {
        store_io::save_store(paths, &store)?;
    }

    let notice = Notice::Loaded {
        list,
        tasks: outcome.current.len(),
        added: outcome.added,
        updated: outcome.updated,
        duplicates: outcome.duplicates,
    };
    session.store = store;
    session.current = outcome.current;
    session.list_file = Some(file.to_path_buf());
    tracing::info!(%notice, "list loaded");
    Ok(notice)
}

/// Load a new list and remember it for the next start. Nothing is
/// remembered if the list cannot be loaded.
pub fn select_list(
    paths: &DataPaths,
    session: &mut Session,
    file: &Path,
    now: NaiveDateTime,
) -> Result<Notice, SessionError> {
    let file = fs::canonicalize(file).map_err(|e| SessionError::ReadList {
        path: file.to_path_buf(),
        source: e,
    })?;
    let notice = load_list(paths, session, &file, now)?;

    let mut doc = config_io::read_document(&paths.config_file)?;
    config_io::set_list_file(&mut doc, Some(&file));
    config_io::write_config(&paths.config_file, &doc)?;
    session.config.list.file = Some(file);
    Ok(notice)
}

/// Re-read config, store and the open list from disk
pub fn reload(paths: &DataPaths, session: &mut Session, now: NaiveDateTime) -> Result<Vec<Notice>, SessionError> {
    let (config, mut doc) = config_io::read_config(&paths.config_file)?;
    let store = store_io::load_store(paths)?;

    let mut fresh = Session::new(config, store);
    let mut notices = Vec::new();
    if let Some(file) = session.list_file.clone() {
        notices.push(restore_list(paths, &mut fresh, &mut doc, file, now)?);
    }
    *session = fresh;
    Ok(notices)
}

/// Apply `change` to a copy of one record, save, then commit.
fn update_record<T>(
    paths: &DataPaths,
    session: &mut Session,
    index: usize,
    change: impl FnOnce(&mut TaskRecord) -> Result<T, CompletionError>,
) -> Result<T, SessionError> {
    let mut store = session.store.clone();
    let record = store.get_mut(index).ok_or(SessionError::MissingRecord(index))?;
    let result = change(record)?;
    store_io::save_store(paths, &store)?;
    session.store = store;
    Ok(result)
}

pub fn toggle_done(
    paths: &DataPaths,
    session: &mut Session,
    index: usize,
    today: NaiveDate,
) -> Result<Toggle, SessionError> {
    let toggle = update_record(paths, session, index, |r| Ok(completion::toggle_done(r, today)))?;
    tracing::info!(index, ?toggle, "toggled completion");
    Ok(toggle)
}

pub fn mark_done(
    paths: &DataPaths,
    session: &mut Session,
    index: usize,
    today: NaiveDate,
    again: bool,
) -> Result<(), SessionError> {
    update_record(paths, session, index, |r| completion::mark_done(r, today, again))?;
    tracing::info!(index, %today, "marked done");
    Ok(())
}

/// Remove the latest completion, returning its date
pub fn unmark_done(paths: &DataPaths, session: &mut Session, index: usize) -> Result<NaiveDate, SessionError> {
    let date = update_record(paths, session, index, completion::unmark_done)?;
    tracing::info!(index, %date, "removed completion");
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config_io::read_config;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2026-10-18 10:00", "%Y-%m-%d %H:%M").unwrap()
    }

    fn today() -> NaiveDate {
        now().date()
    }

    struct Fixture {
        _tmp: TempDir,
        paths: DataPaths,
        list: PathBuf,
    }

    fn fixture(list: &str) -> Fixture {
        let tmp = TempDir::new().unwrap();
        let paths = DataPaths::in_dir(&tmp.path().join("data"));
        let list_path = tmp.path().join("chores.txt");
        fs::write(&list_path, list).unwrap();
        Fixture {
            list: fs::canonicalize(&list_path).unwrap(),
            paths,
            _tmp: tmp,
        }
    }

    #[test]
    fn fresh_open_is_empty() {
        let f = fixture("");
        let (session, notices) = open_session(&f.paths, now()).unwrap();
        assert!(session.store.is_empty());
        assert!(session.current.is_empty());
        assert!(notices.is_empty());
        assert!(!f.paths.store_file().exists());
    }

    #[test]
    fn select_list_reconciles_saves_and_remembers() {
        let f = fixture("3|Water plants\n1|Call mom\n");
        let (mut session, _) = open_session(&f.paths, now()).unwrap();

        let notice = select_list(&f.paths, &mut session, &f.list, now()).unwrap();
        assert_eq!(
            notice,
            Notice::Loaded {
                list: "chores.txt".into(),
                tasks: 2,
                added: 2,
                updated: 0,
                duplicates: 0,
            }
        );
        assert_eq!(session.total_frequency(), 4);
        assert_eq!(session.list_id().as_deref(), Some("chores.txt"));

        let (config, _) = read_config(&f.paths.config_file).unwrap();
        assert_eq!(config.list.file, Some(f.list.clone()));
        assert_eq!(store_io::load_store(&f.paths).unwrap().len(), 2);
    }

    #[test]
    fn reopening_restores_the_list_without_writing() {
        let f = fixture("3|Water plants\n");
        let (mut session, _) = open_session(&f.paths, now()).unwrap();
        select_list(&f.paths, &mut session, &f.list, now()).unwrap();
        let written = fs::read_to_string(f.paths.store_file()).unwrap();

        let (again, notices) = open_session(&f.paths, now()).unwrap();
        assert_eq!(again.current, session.current);
        assert!(matches!(notices.as_slice(), [Notice::Loaded { added: 0, .. }]));
        assert!(!f.paths.backup_file().exists());
        assert_eq!(fs::read_to_string(f.paths.store_file()).unwrap(), written);
    }

    #[test]
    fn missing_remembered_list_is_forgotten() {
        let f = fixture("3|Water plants\n");
        let (mut session, _) = open_session(&f.paths, now()).unwrap();
        select_list(&f.paths, &mut session, &f.list, now()).unwrap();
        fs::remove_file(&f.list).unwrap();

        let (session, notices) = open_session(&f.paths, now()).unwrap();
        assert_eq!(notices, vec![Notice::MissingListFile(f.list.clone())]);
        assert!(session.current.is_empty());
        assert_eq!(session.store.len(), 1);
        let (config, _) = read_config(&f.paths.config_file).unwrap();
        assert!(config.list.file.is_none());
    }

    #[test]
    fn bad_list_changes_nothing() {
        let f = fixture("x|Broken\n");
        let (mut session, _) = open_session(&f.paths, now()).unwrap();
        let err = select_list(&f.paths, &mut session, &f.list, now()).unwrap_err();
        assert!(matches!(err, SessionError::ParseList { .. }));
        assert!(session.list_file.is_none());
        assert!(!f.paths.store_file().exists());
        assert!(!f.paths.config_file.exists());
    }

    #[test]
    fn completions_persist() {
        let f = fixture("3|Water plants\n");
        let (mut session, _) = open_session(&f.paths, now()).unwrap();
        select_list(&f.paths, &mut session, &f.list, now()).unwrap();
        let index = session.find_current("Water plants", None).unwrap();

        assert_eq!(
            toggle_done(&f.paths, &mut session, index, today()).unwrap(),
            Toggle::Marked(today())
        );
        let saved = store_io::load_store(&f.paths).unwrap();
        assert_eq!(saved.get(index).unwrap().done_dates, vec![today()]);

        let err = mark_done(&f.paths, &mut session, index, today(), false).unwrap_err();
        assert!(matches!(err, SessionError::Completion(CompletionError::AlreadyDoneToday(_))));

        assert_eq!(unmark_done(&f.paths, &mut session, index).unwrap(), today());
        assert!(store_io::load_store(&f.paths).unwrap().get(index).unwrap().done_dates.is_empty());
    }

    #[test]
    fn reload_picks_up_list_edits() {
        let f = fixture("3|Water plants\n");
        let (mut session, _) = open_session(&f.paths, now()).unwrap();
        select_list(&f.paths, &mut session, &f.list, now()).unwrap();

        fs::write(&f.list, "5|Water plants\n1|Sweep\n").unwrap();
        let notices = reload(&f.paths, &mut session, now()).unwrap();
        assert!(matches!(
            notices.as_slice(),
            [Notice::Loaded { added: 1, updated: 1, .. }]
        ));
        assert_eq!(session.total_frequency(), 6);
    }

    #[test]
    fn reload_forgets_a_deleted_list() {
        let f = fixture("3|Water plants\n");
        let (mut session, _) = open_session(&f.paths, now()).unwrap();
        select_list(&f.paths, &mut session, &f.list, now()).unwrap();
        fs::remove_file(&f.list).unwrap();

        let notices = reload(&f.paths, &mut session, now()).unwrap();
        assert_eq!(notices, vec![Notice::MissingListFile(f.list.clone())]);
        assert!(session.current.is_empty());
        assert!(session.list_file.is_none());
        assert_eq!(session.store.len(), 1);
        let (config, _) = read_config(&f.paths.config_file).unwrap();
        assert!(config.list.file.is_none());
    }

    #[test]
    fn notice_text() {
        let notice = Notice::Loaded {
            list: "chores.txt".into(),
            tasks: 4,
            added: 1,
            updated: 0,
            duplicates: 2,
        };
        assert_eq!(notice.to_string(), "chores.txt: 4 tasks, 1 new, 2 duplicate lines ignored");
    }
}
