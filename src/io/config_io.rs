use std::fs;
use std::path::{Path, PathBuf};

use crate::io::recovery::atomic_write;
use crate::model::config::Config;

/// Error type for reading and editing config.toml
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    EditError(#[from] toml_edit::TomlError),
    #[error("{0}")]
    Invalid(String),
}

/// Read the config, returning both the parsed config and the raw
/// toml_edit document for round-trip-safe editing. A missing file yields the
/// defaults and an empty document.
pub fn read_config(path: &Path) -> Result<(Config, toml_edit::DocumentMut), ConfigError> {
    let text = read_text(path)?;
    let config: Config = toml::from_str(&text)?;
    validate(&config)?;
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Only the editable document, without validating values. Lets a bad
/// setting be corrected with `cad config set`.
pub fn read_document(path: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    Ok(read_text(path)?.parse()?)
}

fn read_text(path: &Path) -> Result<String, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        atomic_write(path, doc.to_string().as_bytes())
    };
    write().map_err(|e| ConfigError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), "wrote config");
    Ok(())
}

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.day.new_day_start > 23 {
        return Err(ConfigError::Invalid(format!(
            "day.new_day_start must be an hour from 0 to 23, got {}",
            config.day.new_day_start
        )));
    }
    if config.day.todos_per_day == 0 {
        return Err(ConfigError::Invalid(
            "day.todos_per_day must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn ensure_table(doc: &mut toml_edit::DocumentMut, name: &str) {
    if !doc.contains_key(name) {
        doc[name] = toml_edit::Item::Table(toml_edit::Table::new());
    }
}

/// Remember (or forget) the current list file
pub fn set_list_file(doc: &mut toml_edit::DocumentMut, file: Option<&Path>) {
    match file {
        Some(file) => {
            ensure_table(doc, "list");
            doc["list"]["file"] = toml_edit::value(file.display().to_string());
        }
        None => {
            if let Some(list) = doc.get_mut("list").and_then(|item| item.as_table_mut()) {
                list.remove("file");
            }
        }
    }
}

pub fn set_new_day_start(doc: &mut toml_edit::DocumentMut, hour: u32) -> Result<(), ConfigError> {
    if hour > 23 {
        return Err(ConfigError::Invalid(format!(
            "day-start must be an hour from 0 to 23, got {}",
            hour
        )));
    }
    ensure_table(doc, "day");
    doc["day"]["new_day_start"] = toml_edit::value(i64::from(hour));
    Ok(())
}

pub fn set_todos_per_day(doc: &mut toml_edit::DocumentMut, count: u32) -> Result<(), ConfigError> {
    if count == 0 {
        return Err(ConfigError::Invalid(
            "per-day must be at least 1".to_string(),
        ));
    }
    ensure_table(doc, "day");
    doc["day"]["todos_per_day"] = toml_edit::value(i64::from(count));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_config() -> &'static str {
        r##"# personal settings
[day]
new_day_start = 5   # I stay up late
todos_per_day = 2

[ui.colors]
text = "#B0AAFF"
"##
    }

    #[test]
    fn round_trip_preserves_formatting() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, sample_config()).unwrap();

        let (config, doc) = read_config(&path).unwrap();
        assert_eq!(config.day.new_day_start, 5);
        assert_eq!(config.ui.colors.get("text").map(String::as_str), Some("#B0AAFF"));

        write_config(&path, &doc).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), sample_config());
    }

    #[test]
    fn missing_file_is_defaults() {
        let tmp = TempDir::new().unwrap();
        let (config, doc) = read_config(&tmp.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(doc.to_string().is_empty());
    }

    #[test]
    fn set_list_file_then_clear() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        set_list_file(&mut doc, Some(Path::new("/home/me/chores.txt")));
        let config: Config = toml::from_str(&doc.to_string()).unwrap();
        assert_eq!(config.list.file, Some(PathBuf::from("/home/me/chores.txt")));
        assert!(doc.to_string().contains("# I stay up late"));

        set_list_file(&mut doc, None);
        let config: Config = toml::from_str(&doc.to_string()).unwrap();
        assert!(config.list.file.is_none());
    }

    #[test]
    fn setters_validate_and_keep_comments() {
        let mut doc: toml_edit::DocumentMut = sample_config().parse().unwrap();
        set_new_day_start(&mut doc, 3).unwrap();
        set_todos_per_day(&mut doc, 4).unwrap();
        let text = doc.to_string();
        assert!(text.starts_with("# personal settings"));

        let config: Config = toml::from_str(&text).unwrap();
        assert_eq!(config.day.new_day_start, 3);
        assert_eq!(config.day.todos_per_day, 4);

        assert!(set_new_day_start(&mut doc, 24).is_err());
        assert!(set_todos_per_day(&mut doc, 0).is_err());
    }

    #[test]
    fn out_of_range_values_are_rejected_on_read() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[day]\ntodos_per_day = 0\n").unwrap();
        assert!(matches!(read_config(&path), Err(ConfigError::Invalid(_))));

        let mut doc = read_document(&path).unwrap();
        set_todos_per_day(&mut doc, 2).unwrap();
        write_config(&path, &doc).unwrap();
        assert_eq!(read_config(&path).unwrap().0.day.todos_per_day, 2);
    }
}
