// File logging; the terminal itself belongs to the UI

use chrono::{Local, NaiveDate};
use directories::ProjectDirs;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn log_file_name(date: NaiveDate) -> String {
    format!("thaid-{}.log", date.format("%Y-%m-%d"))
}

/// Daily log file under the platform data directory
pub fn log_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "xhbl", "thaid")?;
    Some(proj.data_dir().join(log_file_name(Local::now().date_naive())))
}

/// Install the global subscriber. Filter comes from RUST_LOG, default `info`.
/// Returns the log path, or None when logging stays off.
pub fn init() -> Option<PathBuf> {
    let path = log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .ok()?;
    Some(path)
}
