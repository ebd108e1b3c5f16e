use std::fs;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::paths::DataPaths;
use crate::io::session_io;
use crate::model::session::Session;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Mid-morning, well past the default day start
pub fn fixed_now() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2026-10-18 10:00", "%Y-%m-%d %H:%M").unwrap()
}

/// A data dir plus a `chores.txt` list file, both in a temp dir.
pub struct Fixture {
    _tmp: TempDir,
    pub paths: DataPaths,
    pub list: PathBuf,
}

impl Fixture {
    /// Open the list the way `cad open` does and build an App on it
    pub fn app(&self) -> App {
        let (mut session, _) = session_io::open_session(&self.paths, fixed_now()).unwrap();
        session_io::select_list(&self.paths, &mut session, &self.list, fixed_now()).unwrap();
        App::new(self.paths.clone(), session, fixed_now())
    }
}

pub fn fixture(list: &str) -> Fixture {
    let tmp = TempDir::new().unwrap();
    let paths = DataPaths::in_dir(&tmp.path().join("data"));
    let list_path = tmp.path().join("chores.txt");
    fs::write(&list_path, list).unwrap();
    Fixture {
        _tmp: tmp,
        paths,
        list: list_path,
    }
}

/// An App with nothing loaded. Never touches disk unless a key is pressed.
pub fn empty_app() -> App {
    App::new(
        DataPaths::in_dir(std::path::Path::new("/nonexistent/cadence")),
        Session::default(),
        fixed_now(),
    )
}
