use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::{BuildOptions, TabOrder};
use crate::highlight::Highlighter;
use crate::matcher::MatcherKind;

const APP_DIR_NAME: &str = "tabhop";
const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid toml config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid json5 config: {0}")]
    Json5(#[from] json5::Error),
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Re-anchor the selection on every arrow move, not only on confirm and
    /// folder toggles.
    pub follow_cursor: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub open: String,
    pub close: String,
    /// Write `&`, `<` and `>` in row text as HTML entities.
    pub escape_html: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            open: "<mark>".to_string(),
            close: "</mark>".to_string(),
            escape_html: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub matcher: MatcherKind,
    pub tab_order: TabOrder,
    pub pin_previous_tab: bool,
    pub expand_all_on_open: bool,
    pub log_level: String,
    pub selection: SelectionConfig,
    pub highlight: HighlightConfig,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            matcher: MatcherKind::Strict,
            tab_order: TabOrder::WindowIndex,
            pin_previous_tab: false,
            expand_all_on_open: true,
            log_level: "info".to_string(),
            selection: SelectionConfig::default(),
            highlight: HighlightConfig::default(),
            config_path: default_config_path(),
        }
    }
}

impl Config {
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            matcher: self.matcher,
            tab_order: self.tab_order,
            pin_previous_tab: self.pin_previous_tab,
        }
    }

    pub fn highlighter(&self) -> Highlighter {
        Highlighter::new(&self.highlight.open, &self.highlight.close)
            .escaping_html(self.highlight.escape_html)
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("TABHOP_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }

    let base = if cfg!(target_os = "windows") {
        std::env::var_os("APPDATA").map(PathBuf::from)
    } else {
        std::env::var_os("XDG_DATA_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME")
                    .map(|home| PathBuf::from(home).join(".local").join("share"))
            })
    };

    base.unwrap_or_else(std::env::temp_dir).join(APP_DIR_NAME)
}

pub fn default_config_path() -> PathBuf {
    stable_app_data_dir().join(CONFIG_FILE_NAME)
}

/// Reads the config at `path` (or the default location).
///
/// `.json` and `.json5` files are parsed as JSON5, anything else as TOML.
/// A missing file yields the defaults bound to that path.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

    if !path.exists() {
        return Ok(Config {
            config_path: path,
            ..Config::default()
        });
    }

    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let mut cfg = parse(&raw, &path)?;
    cfg.config_path = path;
    validate(&cfg)?;
    Ok(cfg)
}

fn parse(raw: &str, path: &Path) -> Result<Config, ConfigError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json") || ext.eq_ignore_ascii_case("json5"))
        .unwrap_or(false);

    if is_json {
        Ok(json5::from_str(raw)?)
    } else {
        Ok(toml::from_str(raw)?)
    }
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    let encoded = toml::to_string_pretty(cfg)?;
    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(&cfg.config_path, encoded).map_err(|source| ConfigError::Write {
        path: cfg.config_path.clone(),
        source,
    })
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.highlight.open.is_empty() || cfg.highlight.close.is_empty() {
        return Err(ConfigError::Invalid(
            "highlight markers must not be empty".into(),
        ));
    }

    if !LOG_LEVELS.contains(&cfg.log_level.to_ascii_lowercase().as_str()) {
        return Err(ConfigError::Invalid(format!(
            "unknown log_level '{}'",
            cfg.log_level
        )));
    }

    if cfg.config_path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("config_path is required".into()));
    }

    Ok(())
}
