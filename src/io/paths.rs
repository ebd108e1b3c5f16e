use std::path::{Path, PathBuf};

const APP_DIR: &str = "cadence";

/// Where cadence keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    /// Directory holding the store, its backup, the lock and the logs
    pub data_dir: PathBuf,
    /// The TOML settings file
    pub config_file: PathBuf,
}

impl DataPaths {
    /// Platform locations, or everything under `dir` when given.
    pub fn resolve(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => DataPaths::in_dir(dir),
            None => DataPaths {
                data_dir: base_dir(dirs::data_dir()).join(APP_DIR),
                config_file: base_dir(dirs::config_dir()).join(APP_DIR).join("config.toml"),
            },
        }
    }

    /// Keep every file in one directory
    pub fn in_dir(dir: &Path) -> Self {
        DataPaths {
            data_dir: dir.to_path_buf(),
            config_file: dir.join("config.toml"),
        }
    }

    pub fn store_file(&self) -> PathBuf {
        self.data_dir.join("store.json")
    }

    pub fn backup_file(&self) -> PathBuf {
        self.data_dir.join("store.json.bak")
    }

    pub fn recovery_log(&self) -> PathBuf {
        self.data_dir.join(".recovery.log")
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("cadence.log")
    }
}

fn base_dir(platform: Option<PathBuf>) -> PathBuf {
    platform
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}
