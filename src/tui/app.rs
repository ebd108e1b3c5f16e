use std::io;
use std::time::Duration;

use chrono::{Local, NaiveDate, NaiveDateTime};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::lock::StoreLock;
use crate::io::paths::DataPaths;
use crate::io::session_io::{self, SessionError};
use crate::io::store_io;
use crate::io::watcher::ListWatcher;
use crate::model::record::RecordKey;
use crate::model::session::{LookupError, Session};
use crate::ops::completion::Toggle;
use crate::ops::rank::TaskView;

use super::input;
use super::render;
use super::theme::Theme;

/// Main application state
pub struct App {
    pub paths: DataPaths,
    pub session: Session,
    /// Ranked rows, rebuilt after every change
    pub views: Vec<TaskView>,
    /// Effective day the views were computed for
    pub today: NaiveDate,
    /// Index into `views`
    pub cursor: usize,
    pub scroll_offset: usize,
    pub theme: Theme,
    /// Transient message for the status row
    pub notice: Option<String>,
    pub should_quit: bool,
    watcher: Option<ListWatcher>,
}

impl App {
    pub fn new(paths: DataPaths, session: Session, now: NaiveDateTime) -> Self {
        let theme = Theme::from_config(&session.config.ui);
        let today = session.today_at(now);
        let views = session.views(today);
        App {
            paths,
            session,
            views,
            today,
            cursor: 0,
            scroll_offset: 0,
            theme,
            notice: None,
            should_quit: false,
            watcher: None,
        }
    }

    pub fn selected(&self) -> Option<&TaskView> {
        self.views.get(self.cursor)
    }

    fn selected_key(&self) -> Option<RecordKey> {
        self.selected().map(|v| RecordKey::new(v.list.clone(), v.title.clone()))
    }

    pub fn set_notice(&mut self, msg: impl Into<String>) {
        self.notice = Some(msg.into());
    }

    pub fn move_cursor(&mut self, delta: isize) {
        if self.views.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.views.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    pub fn cursor_to_top(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_to_bottom(&mut self) {
        self.cursor = self.views.len().saturating_sub(1);
    }

    /// Rebuild the views, keeping the cursor on `follow` when it is still
    /// listed.
    fn rebuild(&mut self, follow: Option<RecordKey>) {
        self.views = self.session.views(self.today);
        let found = follow.and_then(|key| {
            self.views
                .iter()
                .position(|v| v.list == key.source_list_id && v.title == key.title)
        });
        match found {
            Some(pos) => self.cursor = pos,
            None => self.cursor = self.cursor.min(self.views.len().saturating_sub(1)),
        }
    }

    /// Advance the effective day when the clock passes the day boundary
    pub fn tick(&mut self, now: NaiveDateTime) {
        let today = self.session.today_at(now);
        if today != self.today {
            tracing::info!(%today, "new day");
            self.today = today;
            let key = self.selected_key();
            self.rebuild(key);
        }
    }

    /// Flip the selected task's done state and save.
    ///
    /// The store is re-read under the lock first so completions recorded by
    /// `cad` meanwhile are not overwritten.
    pub fn toggle_selected(&mut self) {
        let Some(key) = self.selected_key() else {
            return;
        };
        match self.toggle_locked(&key) {
            Ok(Toggle::Marked(_)) => self.set_notice(format!("done: {}", key.title)),
            Ok(Toggle::Unmarked(_)) => self.set_notice(format!("not done: {}", key.title)),
            Err(e) => {
                tracing::error!(error = %e, "toggle failed");
                self.set_notice(format!("error: {}", e));
            }
        }
        self.rebuild(Some(key));
    }

    fn toggle_locked(&mut self, key: &RecordKey) -> Result<Toggle, SessionError> {
        let _lock = StoreLock::acquire_default(&self.paths.data_dir)?;
        self.session.store = store_io::load_store(&self.paths)?;
        let index = self
            .session
            .store
            .index_of(key)
            .ok_or_else(|| LookupError::NotFound(key.title.clone()))?;
        session_io::toggle_done(&self.paths, &mut self.session, index, self.today)
    }

    /// Re-read everything from disk
    pub fn reload(&mut self, now: NaiveDateTime) {
        let key = self.selected_key();
        let result = StoreLock::acquire_default(&self.paths.data_dir)
            .map_err(SessionError::from)
            .and_then(|_lock| session_io::reload(&self.paths, &mut self.session, now));
        match result {
            Ok(notices) => {
                self.theme = Theme::from_config(&self.session.config.ui);
                self.today = self.session.today_at(now);
                self.watch_list();
                match notices.last() {
                    Some(n) => self.set_notice(n.to_string()),
                    None => self.set_notice("reloaded"),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "reload failed");
                self.set_notice(format!("error: {}", e));
            }
        }
        self.rebuild(key);
    }

    /// (Re)start watching the open list file
    pub fn watch_list(&mut self) {
        let Some(file) = self.session.list_file.clone() else {
            self.watcher = None;
            return;
        };
        if self.watcher.as_ref().is_some_and(|w| w.path() == file.as_path()) {
            return;
        }
        match ListWatcher::start(&file) {
            Ok(w) => self.watcher = Some(w),
            Err(e) => {
                tracing::warn!(error = %e, path = %file.display(), "could not watch list file");
                self.watcher = None;
            }
        }
    }

    /// Reload when the list file changed on disk
    pub fn check_watcher(&mut self, now: NaiveDateTime) {
        let changed = self.watcher.as_ref().and_then(|w| w.poll()).is_some();
        if changed {
            tracing::debug!("list file changed on disk");
            self.reload(now);
        }
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Run the TUI application
pub fn run(paths: DataPaths) -> Result<(), Box<dyn std::error::Error>> {
    let (session, notices) = {
        let _lock = StoreLock::acquire_default(&paths.data_dir)?;
        session_io::open_session(&paths, now())?
    };

    let mut app = App::new(paths, session, now());
    if let Some(n) = notices.last() {
        app.set_notice(n.to_string());
    }
    app.watch_list();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key, now());
        }

        app.check_watcher(now());
        app.tick(now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
