use std::collections::HashMap;
use std::path::{Path, PathBuf};

use hypecycle_common::config::SystemConfig;

use super::validation;

/// Complete engine configuration loaded from the config directory.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Parsed analysis.toml, with lexicon files applied.
    pub system: SystemConfig,
    /// Base config directory path.
    pub config_dir: PathBuf,
}

/// Load all configuration from the given config directory.
///
/// Fails loudly with every problem listed if anything is misconfigured.
/// The binary refuses to analyze anything on validation failure.
pub fn load_config(config_dir: &Path) -> Result<EngineConfig, ConfigError> {
    tracing::info!(config_dir = %config_dir.display(), "Loading configuration");

    // 1. Load and parse analysis.toml
    let system_path = config_dir.join("analysis.toml");
    let mut system = load_system_config(&system_path)?;

    // 2. Lexicon files in config/lexicons/*.txt replace the inline lists
    let lexicons = load_lexicons(&config_dir.join("lexicons"))?;
    apply_lexicons(&mut system, lexicons);

    let config = EngineConfig {
        system,
        config_dir: config_dir.to_path_buf(),
    };

    // 3. Validate everything
    validation::validate(&config)?;

    tracing::info!(
        config_dir = %config.config_dir.display(),
        basic_keywords = config.system.analysis.basic_keywords.len(),
        applied_keywords = config.system.analysis.applied_keywords.len(),
        stop_words = config.system.analysis.stop_words.len(),
        "Configuration loaded successfully"
    );

    Ok(config)
}

fn load_system_config(path: &Path) -> Result<SystemConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Read `*.txt` word lists, one term per line. Blank lines and `#` comments
/// are ignored. Keyed by file stem.
fn load_lexicons(lexicons_dir: &Path) -> Result<HashMap<String, Vec<String>>, ConfigError> {
    let mut lexicons = HashMap::new();

    if !lexicons_dir.exists() {
        tracing::debug!(
            path = %lexicons_dir.display(),
            "Lexicons directory does not exist, using inline word lists"
        );
        return Ok(lexicons);
    }

    let entries = std::fs::read_dir(lexicons_dir).map_err(|e| ConfigError::FileRead {
        path: lexicons_dir.to_path_buf(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::FileRead {
            path: lexicons_dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "txt") {
            let name = path
                .file_stem()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();

            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileRead {
                path: path.clone(),
                source: e,
            })?;

            let terms = parse_word_list(&content);
            tracing::debug!(lexicon = %name, terms = terms.len(), "Loaded lexicon");
            lexicons.insert(name, terms);
        }
    }

    Ok(lexicons)
}

fn parse_word_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.to_lowercase())
        .collect()
}

fn apply_lexicons(system: &mut SystemConfig, lexicons: HashMap<String, Vec<String>>) {
    let analysis = &mut system.analysis;

    for (name, terms) in lexicons {
        match name.as_str() {
            "basic" => analysis.basic_keywords = terms,
            "applied" => analysis.applied_keywords = terms,
            "stop_words" => analysis.stop_words = terms,
            other => {
                tracing::warn!(lexicon = %other, "Ignoring unrecognized lexicon file");
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {detail}")]
    Parse { path: PathBuf, detail: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}
