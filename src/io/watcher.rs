use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from the watcher to the TUI event loop.
#[derive(Debug, PartialEq, Eq)]
pub enum ListEvent {
    /// The watched list file was written, replaced or removed.
    Changed,
}

/// Watches one source list file.
///
/// Editors usually save by writing a new file and renaming it over the old
/// one, so the parent directory is watched and events are filtered by name.
pub struct ListWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<ListEvent>,
    path: PathBuf,
}

impl ListWatcher {
    pub fn start(list_file: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let dir = match list_file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let name: Option<OsString> = list_file.file_name().map(|n| n.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };
                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }
                let relevant = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == name);
                if relevant {
                    let _ = tx.send(ListEvent::Changed);
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::debug!(path = %list_file.display(), "watching list file");
        Ok(ListWatcher {
            _watcher: watcher,
            rx,
            path: list_file.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drain pending events. Bursts from a single save collapse into one.
    pub fn poll(&self) -> Option<ListEvent> {
        let mut changed = None;
        while let Ok(evt) = self.rx.try_recv() {
            changed = Some(evt);
        }
        changed
    }
}
