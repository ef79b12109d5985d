//! JSONL snapshot trail configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_trail_dir() -> PathBuf {
    PathBuf::from(".holes/trail")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrailConfig {
    /// Whether appended snapshots are written to the trail.
    #[serde(default)]
    pub enabled: bool,

    /// Directory holding `snapshots.jsonl`.
    #[serde(default = "default_trail_dir")]
    pub dir: PathBuf,
}

impl TrailConfig {
    /// The trail directory when writing is enabled, `None` otherwise.
    #[must_use]
    pub fn active_dir(&self) -> Option<PathBuf> {
        self.enabled.then(|| self.dir.clone())
    }
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_trail_dir(),
        }
    }
}
