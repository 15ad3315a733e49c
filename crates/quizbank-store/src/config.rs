//! quizbank configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizbank_core::SchedulerOptions;

use crate::fs::FsLibraryStore;

/// Top-level quizbank configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizbankConfig {
    /// Directory holding `<id>.toml` library files.
    #[serde(default = "default_library_dir")]
    pub library_dir: PathBuf,
    /// JSON file that finished sessions are appended to.
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,
    /// Bias toward weak material (`true`) or ask in library order (`false`).
    #[serde(default = "default_true")]
    pub randomize: bool,
    /// Fixed shuffle seed, for reproducible sessions.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_library_dir() -> PathBuf {
    PathBuf::from("./libraries")
}
fn default_history_file() -> PathBuf {
    PathBuf::from("./quiz-history.json")
}
fn default_true() -> bool {
    true
}

impl Default for QuizbankConfig {
    fn default() -> Self {
        Self {
            library_dir: default_library_dir(),
            history_file: default_history_file(),
            randomize: true,
            seed: None,
        }
    }
}

impl QuizbankConfig {
    pub fn scheduler_options(&self) -> SchedulerOptions {
        SchedulerOptions {
            randomized: self.randomize,
            seed: self.seed,
        }
    }

    /// A filesystem store over the configured library directory.
    pub fn library_store(&self) -> FsLibraryStore {
        FsLibraryStore::new(&self.library_dir)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted verbatim and never expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + len];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizbank.toml` in the current directory
/// 2. `~/.config/quizbank/config.toml`
///
/// Environment variable overrides: `QUIZBANK_LIBRARY_DIR`, `QUIZBANK_HISTORY_FILE`.
pub fn load_config() -> Result<QuizbankConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizbankConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizbank.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<QuizbankConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => QuizbankConfig::default(),
    };

    // Apply env var overrides
    if let Ok(dir) = std::env::var("QUIZBANK_LIBRARY_DIR") {
        config.library_dir = PathBuf::from(dir);
    }
    if let Ok(file) = std::env::var("QUIZBANK_HISTORY_FILE") {
        config.history_file = PathBuf::from(file);
    }

    config.library_dir = resolve_path(&config.library_dir);
    config.history_file = resolve_path(&config.history_file);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizbank"))
}
