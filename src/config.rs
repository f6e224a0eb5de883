//! Configuration for chardex paths.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variable (CHARDEX_DATA_DIR)
//! 2. Config file (.chardex/config.yaml)
//! 3. Defaults (./app/static/characterData, /media/images/characters)
//!
//! Config file discovery:
//! - Searches current directory and parents for .chardex/config.yaml
//! - `data_dir` in the config file is relative to the project root
//!   (the parent of the .chardex/ directory)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "CHARDEX_DATA_DIR";

/// Default data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "app/static/characterData";

/// Default public prefix for character portraits
pub const DEFAULT_MEDIA_ROOT: &str = "/media/images/characters";

pub const DEFAULT_RECORD_EXTENSION: &str = "json";
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub files: FilesConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Character data directory (relative to project root)
    pub data_dir: Option<String>,
    /// URL prefix for portrait images
    pub media_root: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilesConfig {
    /// Extension of record files, without the dot
    pub record_extension: Option<String>,
    /// Extension of portrait images, without the dot
    pub image_extension: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Directory holding one record file per character
    pub data_dir: PathBuf,
    /// Public prefix under which `{id}.{image_extension}` lives
    pub media_root: String,
    pub record_extension: String,
    pub image_extension: String,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Defaults rooted at the given working directory
    pub fn defaults(cwd: &Path) -> Self {
        Self {
            data_dir: cwd.join(DEFAULT_DATA_DIR),
            media_root: DEFAULT_MEDIA_ROOT.to_string(),
            record_extension: DEFAULT_RECORD_EXTENSION.to_string(),
            image_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
            config_file: None,
        }
    }

    /// Replace the data directory (CLI override)
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}

/// Find config file by searching the given directory and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".chardex").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Strip a leading dot so both "json" and ".json" are accepted
fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_string()
}

/// Merge config sources in priority order
fn resolve(
    cwd: &Path,
    config_file: Option<PathBuf>,
    env_data_dir: Option<String>,
) -> Result<ResolvedConfig> {
    let mut resolved = ResolvedConfig::defaults(cwd);

    if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;

        // Base directory is the parent of .chardex/ (i.e., grandparent of config.yaml)
        let base_dir = config_path
            .parent()
            .and_then(|p| p.parent())
            .unwrap_or(cwd);

        if let Some(ref data_dir) = config.paths.data_dir {
            resolved.data_dir = resolve_path(base_dir, data_dir);
        }
        if let Some(media_root) = config.paths.media_root {
            resolved.media_root = media_root.trim_end_matches('/').to_string();
        }
        if let Some(ref ext) = config.files.record_extension {
            resolved.record_extension = normalize_extension(ext);
        }
        if let Some(ref ext) = config.files.image_extension {
            resolved.image_extension = normalize_extension(ext);
        }
    }

    if let Some(env_dir) = env_data_dir.filter(|d| !d.is_empty()) {
        resolved.data_dir = PathBuf::from(env_dir);
    }

    resolved.config_file = config_file;
    Ok(resolved)
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let config_file = find_config_file(&cwd);
    resolve(&cwd, config_file, std::env::var(DATA_DIR_ENV).ok())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
