use std::path::Path;

/// One task as declared in a source list, before reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub source_list_id: String,
    pub title: String,
    pub frequency: u32,
}

/// Error type for source list parsing
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: invalid frequency '{value}': {source}")]
    InvalidFrequency {
        line: usize,
        value: String,
        source: std::num::ParseIntError,
    },
    #[error("line {line}: frequency must be at least 1")]
    ZeroFrequency { line: usize },
}

/// The identifier a list file is recorded under: its file name.
pub fn list_id_for(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Parse a source list: one `frequency|title` per line.
///
/// Lines that do not split into exactly two fields, or whose title is blank,
/// are skipped. A frequency that is not a positive integer fails the whole
/// parse.
pub fn parse_list(source: &str, source_list_id: &str) -> Result<Vec<ListEntry>, ParseError> {
    let mut entries = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        let line_no = idx + 1;
        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() != 2 {
            if !line.trim().is_empty() {
                tracing::debug!(line = line_no, "skipping malformed list line");
            }
            continue;
        }

        let title = fields[1].trim();
        if title.is_empty() {
            tracing::debug!(line = line_no, "skipping list line with empty title");
            continue;
        }

        let raw = fields[0].trim().trim_start_matches('\u{feff}');
        let frequency: u32 = raw.parse().map_err(|e| ParseError::InvalidFrequency {
            line: line_no,
            value: raw.to_string(),
            source: e,
        })?;
        if frequency == 0 {
            return Err(ParseError::ZeroFrequency { line: line_no });
        }

        entries.push(ListEntry {
            source_list_id: source_list_id.to_string(),
            title: title.to_string(),
            frequency,
        });
    }

    Ok(entries)
}
