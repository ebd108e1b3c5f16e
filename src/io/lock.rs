use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const LOCK_FILE: &str = ".lock";
const RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Exclusive hold on the data directory.
///
/// Taken around every load-modify-save of the store so the TUI and CLI
/// never interleave writes. The lock file itself stays on disk; only the
/// flock marks ownership. The holder's pid is written into it so a waiter
/// can say who it was waiting on.
pub struct StoreLock {
    _file: File,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("store is busy: {} still holds {path}", holder_name(.holder))]
    Timeout { path: PathBuf, holder: Option<u32> },
}

fn holder_name(holder: &Option<u32>) -> String {
    match holder {
        Some(pid) => format!("cadence process {}", pid),
        None => "another cadence process".to_string(),
    }
}

impl StoreLock {
    /// Acquire the lock, retrying until `timeout` runs out.
    pub fn acquire(data_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = data_dir.join(LOCK_FILE);
        let create_error = |source| LockError::CreateError {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(data_dir).map_err(create_error)?;
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(create_error)?;

        let deadline = Instant::now() + timeout;
        while try_lock(&file).is_err() {
            if Instant::now() >= deadline {
                let holder = read_holder(&mut file);
                tracing::warn!(path = %path.display(), ?holder, "timed out waiting for store lock");
                return Err(LockError::Timeout { path, holder });
            }
            std::thread::sleep(RETRY_INTERVAL);
        }

        if let Err(e) = write_holder(&mut file) {
            tracing::debug!(error = %e, "could not record lock holder");
        }
        Ok(StoreLock { _file: file })
    }

    pub fn acquire_default(data_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(data_dir, Duration::from_secs(5))
    }
}

fn write_holder(file: &mut File) -> std::io::Result<()> {
    file.set_len(0)?;
    file.rewind()?;
    write!(file, "{}", std::process::id())?;
    file.flush()
}

fn read_holder(file: &mut File) -> Option<u32> {
    let mut text = String::new();
    file.rewind().ok()?;
    file.read_to_string(&mut text).ok()?;
    text.trim().parse().ok()
}

#[cfg(unix)]
fn try_lock(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;
    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> std::io::Result<()> {
    Ok(())
}
