use std::path::{Path, PathBuf};

use hypecycle_common::types::EvidenceRecord;

/// Errors reading a record file.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Failed to read record file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse record file {path}: {detail}")]
    Parse { path: PathBuf, detail: String },
}

/// Read evidence records from a JSON file.
///
/// A `.jsonl` file holds one record per line (blank lines ignored); any
/// other file holds a single JSON array of records.
pub fn load_records(path: &Path) -> Result<Vec<EvidenceRecord>, InputError> {
    let content = std::fs::read_to_string(path).map_err(|e| InputError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let records = if path.extension().is_some_and(|ext| ext == "jsonl") {
        parse_lines(&content).map_err(|detail| InputError::Parse {
            path: path.to_path_buf(),
            detail,
        })?
    } else {
        serde_json::from_str(&content).map_err(|e| InputError::Parse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?
    };

    tracing::debug!(path = %path.display(), records = records.len(), "Record file loaded");
    Ok(records)
}

fn parse_lines(content: &str) -> Result<Vec<EvidenceRecord>, String> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| serde_json::from_str(line).map_err(|e| format!("line {}: {}", i + 1, e)))
        .collect()
}
