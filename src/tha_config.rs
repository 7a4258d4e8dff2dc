// Configuration management
// Board dimensions, frame tick and language, persisted as TOML

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::tha_board::{Board, Result as BoardResult};

/// User configuration
/// Persisted to disk as TOML
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub width: usize,     // Board columns
    pub height: usize,    // Board rows
    pub treasures: usize, // Treasures hidden per board
    pub tick_ms: u64,     // Frame interval in milliseconds
    pub language: String, // Language code ("en" or "de")
}

impl Default for Config {
    fn default() -> Self {
        // Auto-detect system language on first run
        let system_lang = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
        let lang = if system_lang.to_lowercase().starts_with("de") {
            "de".to_string()
        } else {
            "en".to_string()
        };

        Config {
            width: 6,
            height: 6,
            treasures: 15,
            tick_ms: 100,
            language: lang,
        }
    }
}

impl Config {
    /// Check the dimensions against the board limits
    pub fn validate(&self) -> BoardResult<()> {
        Board::new(self.width, self.height, self.treasures).map(|_| ())
    }

    /// An empty board with the configured dimensions
    pub fn new_board(&self) -> BoardResult<Board> {
        Board::new(self.width, self.height, self.treasures)
    }
}

/// Get the configuration file path
/// Uses the platform config directory (e.g. ~/.config/thaid/thaid.toml on Linux)
/// Falls back to current directory if ProjectDirs is unavailable
pub fn config_path() -> Option<PathBuf> {
    if let Some(proj) = ProjectDirs::from("com", "xhbl", "thaid") {
        let mut path = proj.config_dir().to_path_buf();
        path.push("thaid.toml");
        return Some(path);
    }
    env::current_dir().ok().map(|mut path| {
        path.push("thaid.toml");
        path
    })
}

fn parse_config(s: &str) -> Option<Config> {
    match toml::from_str::<Config>(s) {
        Ok(cfg) => match cfg.validate() {
            Ok(()) => Some(cfg),
            Err(e) => {
                warn!(error = %e, "config rejected, using defaults");
                None
            }
        },
        Err(e) => {
            warn!(error = %e, "config unreadable, using defaults");
            None
        }
    }
}

/// Where the running configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    Loaded,   // Parsed from the user's file
    Created,  // No file yet, defaults written
    Rejected, // File unreadable or invalid, running on defaults
}

impl ConfigSource {
    /// A rejected file stays untouched so the user can fix it
    pub fn writable(self) -> bool {
        self != ConfigSource::Rejected
    }
}

fn load_from(path: &Path) -> (Config, ConfigSource) {
    if !path.exists() {
        let cfg = Config::default();
        save_to(path, &cfg, ConfigSource::Created);
        return (cfg, ConfigSource::Created);
    }
    match fs::read_to_string(path) {
        Ok(s) => match parse_config(&s) {
            Some(cfg) => {
                info!(path = %path.display(), "config loaded");
                (cfg, ConfigSource::Loaded)
            }
            None => (Config::default(), ConfigSource::Rejected),
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "config unreadable, using defaults");
            (Config::default(), ConfigSource::Rejected)
        }
    }
}

/// Load configuration from disk, or create default if not found
pub fn load_or_create_config() -> (Config, ConfigSource) {
    match config_path() {
        Some(path) => load_from(&path),
        None => (Config::default(), ConfigSource::Created),
    }
}

// Returns whether the file was written
fn save_to(path: &Path, cfg: &Config, source: ConfigSource) -> bool {
    if !source.writable() {
        debug!(path = %path.display(), "config left untouched");
        return false;
    }
    match toml::to_string(cfg) {
        Ok(s) => {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            match fs::write(path, s) {
                Ok(()) => true,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "config not saved");
                    false
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "config not serialized");
            false
        }
    }
}

/// Save configuration to disk as TOML, unless it was loaded from a rejected file
pub fn save_config(cfg: &Config, source: ConfigSource) {
    if let Some(path) = config_path() {
        save_to(&path, cfg, source);
    }
}
