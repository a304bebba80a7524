//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::headers::{HeaderError, HeaderMap, SynonymTable};
use crate::core::remote::RemoteSettings;
use crate::core::workspace::Workspace;

pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/100";
pub const DEFAULT_REPORT_TITLE: &str = "Stock Count Sheet";

/// Stocktake configuration with layered hierarchy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Image shown for items without an image URL
    pub placeholder_image: Option<String>,

    /// Heading of the printable count sheet
    pub report_title: Option<String>,

    /// Default output format for list commands
    pub default_format: Option<String>,

    /// Remote spreadsheet connection
    pub remote: RemoteSettings,

    /// Extra header synonyms per canonical field
    pub headers: SynonymTable,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load_for(workspace: Option<&Workspace>) -> Self {
        // 1. Built-in defaults (already in Default impl)
        let mut config = Config::default();

        // 2. Global user config (~/.config/stk/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Workspace config (.stk/config.yaml)
        if let Some(ws) = workspace {
            if let Some(local) = Self::read_file(&ws.config_path()) {
                config.merge(local);
            }
        }

        // 4. Environment variables
        config.apply_env(|key| std::env::var(key).ok());

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read config file");
                return None;
            }
        };
        // An empty or fully commented file deserializes to null
        if contents.lines().all(|l| l.trim().is_empty() || l.trim_start().starts_with('#')) {
            return Some(Config::default());
        }
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => {
                debug!(path = %path.display(), "loaded config file");
                Some(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                None
            }
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("STK_PLACEHOLDER_IMAGE") {
            self.placeholder_image = Some(v);
        }
        if let Some(v) = var("STK_REMOTE_URL") {
            self.remote.base_url = Some(v);
        }
        if let Some(v) = var("STK_SPREADSHEET_ID") {
            self.remote.spreadsheet_id = Some(v);
        }
        if let Some(v) = var("STK_SHEET") {
            self.remote.sheet = Some(v);
        }
        if let Some(v) = var("STK_REMOTE_TOKEN") {
            self.remote.token = Some(v);
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "stk")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.placeholder_image.is_some() {
            self.placeholder_image = other.placeholder_image;
        }
        if other.report_title.is_some() {
            self.report_title = other.report_title;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        self.remote.merge(other.remote);
        for (field, names) in other.headers {
            self.headers.entry(field).or_default().extend(names);
        }
    }

    pub fn placeholder_image(&self) -> &str {
        self.placeholder_image
            .as_deref()
            .unwrap_or(DEFAULT_PLACEHOLDER_IMAGE)
    }

    pub fn report_title(&self) -> &str {
        self.report_title.as_deref().unwrap_or(DEFAULT_REPORT_TITLE)
    }

    /// Built-in header synonyms extended with the configured ones
    pub fn header_map(&self) -> Result<HeaderMap, HeaderError> {
        let mut map = HeaderMap::builtin()?;
        map.extend(&self.headers);
        Ok(map)
    }

    /// Copy safe for printing: the access token is masked
    pub fn redacted(&self) -> Config {
        let mut copy = self.clone();
        if let Some(token) = copy.remote.token.as_mut() {
            *token = "********".to_string();
        }
        copy
    }
}
