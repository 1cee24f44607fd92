use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::example::Example;

pub const DEFAULT_SHARE_BASE_URL: &str = "http://localhost:5173/";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL that share links are built on
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,

    /// tracing filter used when RUST_LOG is not set
    #[serde(default)]
    pub log_filter: Option<String>,

    #[serde(default)]
    pub examples: Vec<Example>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            share_base_url: default_share_base_url(),
            log_filter: None,
            examples: Vec::new(),
        }
    }
}

fn default_share_base_url() -> String {
    DEFAULT_SHARE_BASE_URL.to_string()
}

pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => Config::default(),
    }
}

pub fn load_from(path: &Path) -> Config {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    match toml::from_str::<Config>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config file");
            Config::default()
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("CALLDATA_LENS_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("calldata-lens").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("calldata-lens").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "calldata-lens", "calldata-lens")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("calldata-lens"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("calldata-lens"));
    }
    directories::ProjectDirs::from("io", "calldata-lens", "calldata-lens")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn last_session_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("last_session.url"))
}
