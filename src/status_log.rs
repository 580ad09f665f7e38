//! Append-only status log file
//!
//! Every status transition is written as `[YYYY-MM-DD HH:MM:SS] message`
//! and mirrored to `tracing`. The file is opened in append mode per write
//! and never truncated.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const LOG_FILE: &str = "VpnEndpointInspector_log.txt";

#[derive(Debug, Clone)]
pub struct StatusLog {
    path: PathBuf,
}

impl StatusLog {
    pub fn new() -> Self {
        Self {
            path: std::env::temp_dir().join(LOG_FILE),
        }
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
        if let Err(e) = self.append(message) {
            warn!("Failed to write status log {}: {}", self.path.display(), e);
        }
    }

    fn append(&self, message: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        writeln!(file, "{}", format_line(&timestamp, message))
    }
}

impl Default for StatusLog {
    fn default() -> Self {
        Self::new()
    }
}

fn format_line(timestamp: &str, message: &str) -> String {
    format!("[{}] {}", timestamp, message)
}
