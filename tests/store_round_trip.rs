//! Store and list files read from disk and written back unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use cadence::io::paths::DataPaths;
use cadence::io::session_io;
use cadence::io::store_io::{load_store, serialize_store};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn store_fixture_round_trips() {
    let paths = DataPaths::in_dir(&fixtures_dir());
    let original = fs::read_to_string(paths.store_file()).unwrap();

    let store = load_store(&paths).unwrap();
    assert_eq!(store.len(), 2);
    let first = store.get(0).unwrap();
    assert_eq!(first.title, "Water plants");
    assert_eq!(
        first.done_dates,
        vec![date("2026-09-03"), date("2026-09-03"), date("2026-09-09")]
    );

    assert_eq!(serialize_store(&store).unwrap(), original);
}

#[test]
fn record_without_done_dates_loads() {
    let tmp = tempfile::TempDir::new().unwrap();
    let paths = DataPaths::in_dir(tmp.path());
    fs::write(
        paths.store_file(),
        r#"[{"sourceListId":"chores.txt","title":"Sweep","frequency":2,"addedDate":"2026-09-01"}]"#,
    )
    .unwrap();

    let store = load_store(&paths).unwrap();
    assert!(store.get(0).unwrap().done_dates.is_empty());
    assert!(serialize_store(&store).unwrap().contains("\"doneDates\": []"));
}

#[test]
fn opening_a_list_twice_changes_nothing() {
    let tmp = tempfile::TempDir::new().unwrap();
    let paths = DataPaths::in_dir(&tmp.path().join("data"));
    let list = tmp.path().join("chores.txt");
    fs::copy(fixtures_dir().join("chores.txt"), &list).unwrap();
    let now = date("2026-10-18").and_hms_opt(10, 0, 0).unwrap();

    let (mut session, _) = session_io::open_session(&paths, now).unwrap();
    let notice = session_io::select_list(&paths, &mut session, &list, now).unwrap();
    assert_eq!(notice.to_string(), "chores.txt: 3 tasks, 3 new, 1 duplicate lines ignored");
    let first = fs::read_to_string(paths.store_file()).unwrap();

    let (mut session, _) = session_io::open_session(&paths, now).unwrap();
    let notice = session_io::select_list(&paths, &mut session, &list, now).unwrap();
    assert_eq!(notice.to_string(), "chores.txt: 3 tasks, 1 duplicate lines ignored");
    assert_eq!(fs::read_to_string(paths.store_file()).unwrap(), first);
    assert_eq!(session.total_frequency(), 6);
}
